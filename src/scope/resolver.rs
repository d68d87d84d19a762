//! Resolver - binds references to declarations
//!
//! Runs once, after the whole file has been traversed, so declarations that
//! appear later in the text are visible to earlier references.
//!
//! Resolution algorithm:
//! 1. Start at the reference's own scope
//! 2. Look up `(name, namespace)`; the table holds one declaration per key
//! 3. Walk outward through parents; the innermost match wins
//! 4. No match → unbound (ambient name)

use super::references::Reference;
use super::table::SymbolTable;
use super::tree::{ScopeId, ScopeTree};
use crate::binding::Binding;
use crate::symbol::{DeclId, Namespace};

/// Name resolver over one file's scope tree and symbol table
pub struct Resolver<'a> {
    tree: &'a ScopeTree,
    table: &'a SymbolTable,
}

impl<'a> Resolver<'a> {
    pub fn new(tree: &'a ScopeTree, table: &'a SymbolTable) -> Self {
        Self { tree, table }
    }

    /// Resolve every reference; unbound references produce no binding
    pub fn resolve_all(&self, references: &[Reference]) -> Vec<Binding> {
        references
            .iter()
            .filter_map(|reference| {
                self.resolve_reference(reference.from_scope, &reference.name, reference.namespace)
                    .map(|declaration| Binding::new(reference.id, declaration))
            })
            .collect()
    }

    /// Resolve a single name from a scope
    pub fn resolve_reference(&self, scope: ScopeId, name: &str, namespace: Namespace) -> Option<DeclId> {
        self.table
            .lookup(self.tree, scope, name, namespace)
            .map(|decl| decl.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Position, Span};
    use crate::scope::references::RefId;
    use crate::scope::tree::ScopeKind;
    use crate::symbol::{DeclKind, Declaration, HoistPolicy, Site};

    fn site(at: usize) -> Option<Site> {
        Some(Site {
            span: Span::new(at, at + 1),
            position: Position::new(1, at as u32 + 1),
            extent: Span::new(at, at + 1),
        })
    }

    fn reference(id: u32, name: &str, scope: ScopeId, namespace: Namespace) -> Reference {
        Reference {
            id: RefId(id),
            name: name.to_string(),
            span: Span::new(50, 51),
            position: Position::new(1, 51),
            from_scope: scope,
            namespace,
            is_type_query: false,
            is_initializing_occurrence: false,
            is_named_export: false,
        }
    }

    #[test]
    fn test_resolve_local() {
        let mut tree = ScopeTree::new(ScopeKind::Global, Span::new(0, 100));
        let func = tree.enter_scope(ScopeKind::Function, Span::new(0, 90));

        let mut table = SymbolTable::new(true, HoistPolicy::default());
        let local = table.declare(Declaration::new("local_var", DeclKind::Variable, func, site(5)));

        let resolver = Resolver::new(&tree, &table);
        assert_eq!(resolver.resolve_reference(func, "local_var", Namespace::Value), Some(local));
        assert_eq!(resolver.resolve_reference(ScopeId::root(), "local_var", Namespace::Value), None);
    }

    #[test]
    fn test_innermost_wins() {
        let mut tree = ScopeTree::new(ScopeKind::Global, Span::new(0, 100));
        let func = tree.enter_scope(ScopeKind::Function, Span::new(0, 90));
        let block = tree.enter_scope(ScopeKind::Block, Span::new(10, 80));

        let mut table = SymbolTable::new(true, HoistPolicy::default());
        table.declare(Declaration::new("x", DeclKind::Variable, ScopeId::root(), site(1)));
        let shadowing = table.declare(Declaration::new("x", DeclKind::Variable, func, site(12)));

        let resolver = Resolver::new(&tree, &table);
        let bindings = resolver.resolve_all(&[reference(0, "x", block, Namespace::Value)]);
        assert_eq!(bindings, vec![Binding::new(RefId(0), shadowing)]);
    }

    #[test]
    fn test_namespaces_resolve_independently() {
        let tree = ScopeTree::new(ScopeKind::Module, Span::new(0, 100));
        let mut table = SymbolTable::new(true, HoistPolicy::default());
        let alias = table.declare(Declaration::new("Foo", DeclKind::TypeAlias, ScopeId::root(), site(5)));
        let value = table.declare(Declaration::new("Foo", DeclKind::Variable, ScopeId::root(), site(30)));

        let resolver = Resolver::new(&tree, &table);
        let bindings = resolver.resolve_all(&[
            reference(0, "Foo", ScopeId::root(), Namespace::Type),
            reference(1, "Foo", ScopeId::root(), Namespace::Value),
            reference(2, "Bar", ScopeId::root(), Namespace::Value),
        ]);
        assert_eq!(
            bindings,
            vec![Binding::new(RefId(0), alias), Binding::new(RefId(1), value)]
        );
    }
}
