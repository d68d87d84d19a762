//! Scope tree
//!
//! Scopes live in an arena indexed by `ScopeId`. The tree is owned through
//! each scope's `children` list; `parent` and `owner` are plain ids, so there
//! are no reference cycles.
//!
//! During traversal the tree also keeps the stack of *active* scopes.
//! `enter_scope` pushes a child of the current top, `exit_scope` pops it.
//! Exited scopes stay in the arena for resolution.

use crate::position::Span;
use serde::Serialize;

/// Unique identifier for a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ScopeId(pub u32);

impl ScopeId {
    /// The root scope ID
    pub fn root() -> Self {
        Self(0)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScopeKind {
    /// Script-level root
    Global,
    /// Root of a file with imports or exports
    Module,
    /// Function, method, arrow function or class static block
    Function,
    /// Block, loop header, catch clause or switch body
    Block,
    Class,
    Enum,
    /// Namespace or module body
    TsModule,
    /// Bare signature: function type, call/construct/method signature, overload
    FunctionType,
}

impl ScopeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScopeKind::Global => "global",
            ScopeKind::Module => "module",
            ScopeKind::Function => "function",
            ScopeKind::Block => "block",
            ScopeKind::Class => "class",
            ScopeKind::Enum => "enum",
            ScopeKind::TsModule => "namespace",
            ScopeKind::FunctionType => "function-type",
        }
    }

    /// Scopes that own the variables declared inside them
    pub fn is_variable_scope(&self) -> bool {
        matches!(self, ScopeKind::Global | ScopeKind::Module | ScopeKind::Function)
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lexical scope
#[derive(Debug, Clone, Serialize)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// Nearest enclosing Function/Global/Module scope (itself for those kinds)
    pub owner: ScopeId,
    pub children: Vec<ScopeId>,
    /// Byte range of the node that introduced the scope
    pub span: Span,
    /// `declare global { ... }`
    pub global_augmentation: bool,
}

/// Arena of scopes plus the active scope stack
#[derive(Debug)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    stack: Vec<ScopeId>,
}

impl ScopeTree {
    /// Create a tree holding only the root scope
    pub fn new(root_kind: ScopeKind, span: Span) -> Self {
        let root = Scope {
            id: ScopeId::root(),
            kind: root_kind,
            parent: None,
            owner: ScopeId::root(),
            children: Vec::new(),
            span,
            global_augmentation: false,
        };
        Self {
            scopes: vec![root],
            stack: vec![ScopeId::root()],
        }
    }

    /// Push a new scope as a child of the current one
    pub fn enter_scope(&mut self, kind: ScopeKind, span: Span) -> ScopeId {
        let parent = self.current();
        let id = ScopeId(self.scopes.len() as u32);
        let owner = if kind.is_variable_scope() {
            id
        } else {
            self.scopes[parent.index()].owner
        };
        self.scopes.push(Scope {
            id,
            kind,
            parent: Some(parent),
            owner,
            children: Vec::new(),
            span,
            global_augmentation: false,
        });
        self.scopes[parent.index()].children.push(id);
        self.stack.push(id);
        id
    }

    /// Pop the current scope. A no-op when only the root remains.
    pub fn exit_scope(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    pub fn mark_global_augmentation(&mut self, scope: ScopeId) {
        if let Some(s) = self.scopes.get_mut(scope.index()) {
            s.global_augmentation = true;
        }
    }

    /// Innermost active scope
    pub fn current(&self) -> ScopeId {
        self.stack.last().copied().unwrap_or_else(ScopeId::root)
    }

    /// Number of active scopes, including the root
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn root(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn get(&self, scope: ScopeId) -> Option<&Scope> {
        self.scopes.get(scope.index())
    }

    pub fn kind(&self, scope: ScopeId) -> Option<ScopeKind> {
        self.get(scope).map(|s| s.kind)
    }

    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.get(scope).and_then(|s| s.parent)
    }

    /// Owning variable scope; unknown ids map to the root
    pub fn owner(&self, scope: ScopeId) -> ScopeId {
        self.get(scope).map(|s| s.owner).unwrap_or_else(ScopeId::root)
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Scope chain from `scope` up to the root, innermost first
    pub fn scope_chain(&self, scope: ScopeId) -> Vec<ScopeId> {
        let mut chain = vec![scope];
        let mut current = scope;
        while let Some(parent) = self.parent(current) {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Whether `ancestor` encloses `scope` (and is not `scope` itself)
    pub fn is_strict_ancestor(&self, ancestor: ScopeId, scope: ScopeId) -> bool {
        let mut current = self.parent(scope);
        while let Some(s) = current {
            if s == ancestor {
                return true;
            }
            current = self.parent(s);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> ScopeTree {
        ScopeTree::new(ScopeKind::Global, Span::new(0, 100))
    }

    #[test]
    fn test_scope_hierarchy() {
        let mut tree = tree();

        let class_scope = tree.enter_scope(ScopeKind::Class, Span::new(0, 50));
        let method_scope = tree.enter_scope(ScopeKind::Function, Span::new(10, 40));

        assert_eq!(tree.parent(method_scope), Some(class_scope));
        assert_eq!(tree.parent(class_scope), Some(ScopeId::root()));
        assert_eq!(tree.parent(ScopeId::root()), None);
        assert_eq!(tree.root().children, vec![class_scope]);
    }

    #[test]
    fn test_owner_variable_scope() {
        let mut tree = tree();

        let func = tree.enter_scope(ScopeKind::Function, Span::new(0, 50));
        let block = tree.enter_scope(ScopeKind::Block, Span::new(5, 45));
        let inner = tree.enter_scope(ScopeKind::Block, Span::new(6, 40));

        assert_eq!(tree.owner(ScopeId::root()), ScopeId::root());
        assert_eq!(tree.owner(func), func);
        assert_eq!(tree.owner(block), func);
        assert_eq!(tree.owner(inner), func);

        tree.exit_scope();
        tree.exit_scope();
        tree.exit_scope();
        let class_scope = tree.enter_scope(ScopeKind::Class, Span::new(60, 90));
        assert_eq!(tree.owner(class_scope), ScopeId::root());
    }

    #[test]
    fn test_exit_at_root_is_noop() {
        let mut tree = tree();
        tree.exit_scope();
        tree.exit_scope();
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.current(), ScopeId::root());

        let block = tree.enter_scope(ScopeKind::Block, Span::new(1, 2));
        assert_eq!(tree.current(), block);
        tree.exit_scope();
        tree.exit_scope();
        assert_eq!(tree.depth(), 1);
        // exited scopes are retained
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_scope_chain() {
        let mut tree = tree();

        let s1 = tree.enter_scope(ScopeKind::Class, Span::new(0, 90));
        let s2 = tree.enter_scope(ScopeKind::Function, Span::new(1, 80));
        let s3 = tree.enter_scope(ScopeKind::Block, Span::new(2, 70));

        assert_eq!(tree.scope_chain(s3), vec![s3, s2, s1, ScopeId::root()]);
        assert!(tree.is_strict_ancestor(s1, s3));
        assert!(tree.is_strict_ancestor(ScopeId::root(), s1));
        assert!(!tree.is_strict_ancestor(s3, s3));
        assert!(!tree.is_strict_ancestor(s3, s1));
    }
}
