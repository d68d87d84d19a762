//! Symbol table
//!
//! Holds every declaration of one file, indexed per scope by
//! `(name, namespace)`. The index keeps the *first* declaration for each key,
//! which is what resolution binds to. All same-named declarations of a scope
//! are also kept in insertion order so that later ones can be checked against
//! the merge policy; collisions are logged as they are found.

use super::merge::{self, MergeCounts};
use super::tree::{ScopeId, ScopeTree};
use crate::symbol::{DeclId, DeclKind, Declaration, HoistPolicy, Namespace, Namespaces};
use std::collections::HashMap;

/// How a same-scope collision is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionKind {
    Redeclared,
    /// The earlier declaration is a pre-registered global
    RedeclaredAsBuiltin,
    /// The earlier declaration is a plain variable, the later one is not
    RedeclaredBySyntax,
}

/// A declaration that conflicts with an earlier one in the same scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    /// The later declaration; diagnostics point here
    pub declaration: DeclId,
    /// The earlier declaration it collides with
    pub previous: DeclId,
    pub kind: CollisionKind,
}

/// Declarations of one file plus the collisions found while inserting them
#[derive(Debug, Default)]
pub struct SymbolTable {
    declarations: Vec<Declaration>,
    /// (scope, name, namespace) → first declaration
    index: HashMap<(ScopeId, String, Namespace), DeclId>,
    /// (scope, name) → all declarations, in insertion order
    groups: HashMap<(ScopeId, String), Vec<DeclId>>,
    collisions: Vec<Collision>,
    ignore_declaration_merge: bool,
    hoist: HoistPolicy,
}

impl SymbolTable {
    pub fn new(ignore_declaration_merge: bool, hoist: HoistPolicy) -> Self {
        Self {
            ignore_declaration_merge,
            hoist,
            ..Self::default()
        }
    }

    /// Pre-register built-in globals in the root scope
    pub fn register_builtins<'n>(&mut self, root: ScopeId, names: impl IntoIterator<Item = &'n str>) {
        for name in names {
            self.declare(Declaration::builtin(name, root));
        }
    }

    /// Insert a declaration, checking it against same-named ones in its scope
    pub fn declare(&mut self, mut decl: Declaration) -> DeclId {
        let id = DeclId(self.declarations.len() as u32);
        decl.id = id;
        decl.hoistable = decl.is_builtin() || self.hoist.hoists(decl.kind);

        let key = (decl.scope, decl.name.clone());
        if decl.kind.is_redeclarable() {
            self.check_collisions(&mut decl, &key);
        }

        for namespace in decl.namespaces.iter() {
            let slot = (decl.scope, decl.name.clone(), namespace);
            // user declarations take over slots held by built-ins
            let replace = match self.index.get(&slot) {
                None => true,
                Some(existing) => {
                    self.declarations[existing.0 as usize].is_builtin() && !decl.is_builtin()
                }
            };
            if replace {
                self.index.insert(slot, id);
            }
        }

        self.groups.entry(key).or_default().push(id);
        self.declarations.push(decl);
        id
    }

    fn check_collisions(&mut self, decl: &mut Declaration, key: &(ScopeId, String)) {
        let Some(group) = self.groups.get(key) else {
            return;
        };

        let priors: Vec<&Declaration> = group
            .iter()
            .map(|id| &self.declarations[id.0 as usize])
            .filter(|prior| prior.kind.is_redeclarable() && prior.namespaces.intersects(decl.namespaces))
            .collect();

        let builtin = priors.iter().find(|p| p.is_builtin()).map(|p| p.id);
        let syntactic: Vec<&Declaration> = priors.into_iter().filter(|p| !p.is_builtin()).collect();

        let mut found = Vec::new();
        if let Some(previous) = builtin {
            found.push(Collision {
                declaration: decl.id,
                previous,
                kind: CollisionKind::RedeclaredAsBuiltin,
            });
        }

        if let Some(first) = syntactic.first() {
            let counts = MergeCounts::tally(syntactic.iter().map(|p| p.kind));
            if merge::conflicts(decl.kind, &counts, self.ignore_declaration_merge) {
                let kind = if first.kind == DeclKind::Variable && decl.kind != DeclKind::Variable {
                    CollisionKind::RedeclaredBySyntax
                } else {
                    CollisionKind::Redeclared
                };
                found.push(Collision {
                    declaration: decl.id,
                    previous: first.id,
                    kind,
                });
            } else {
                decl.merge_group = Some(first.merge_group.unwrap_or(first.id));
            }
        }

        self.collisions.extend(found);
    }

    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        self.declarations.get(id.0 as usize)
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Declarations of one scope, in insertion order
    pub fn declarations_in(&self, scope: ScopeId) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter().filter(move |d| d.scope == scope)
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Look up a declaration in a scope (not walking parents)
    pub fn lookup_local(&self, scope: ScopeId, name: &str, namespace: Namespace) -> Option<&Declaration> {
        self.index
            .get(&(scope, name.to_string(), namespace))
            .and_then(|id| self.get(*id))
    }

    /// Look up a declaration walking up the scope chain; innermost wins
    pub fn lookup(&self, tree: &ScopeTree, scope: ScopeId, name: &str, namespace: Namespace) -> Option<&Declaration> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(decl) = self.lookup_local(s, name, namespace) {
                return Some(decl);
            }
            current = tree.parent(s);
        }
        None
    }

    /// Any same-named declaration of a scope, preferring the given namespaces
    pub fn lookup_any_local(&self, scope: ScopeId, name: &str, preferred: Namespaces) -> Option<&Declaration> {
        let preferred_hit = preferred
            .iter()
            .find_map(|ns| self.lookup_local(scope, name, ns));
        preferred_hit.or_else(|| {
            Namespace::all()
                .iter()
                .find_map(|ns| self.lookup_local(scope, name, *ns))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{Position, Span};
    use crate::scope::tree::ScopeKind;
    use crate::symbol::Site;

    fn site(start: usize) -> Option<Site> {
        Some(Site {
            span: Span::new(start, start + 1),
            position: Position::new(1, start as u32 + 1),
            extent: Span::new(start, start + 10),
        })
    }

    fn decl(name: &str, kind: DeclKind, scope: ScopeId, at: usize) -> Declaration {
        Declaration::new(name, kind, scope, site(at))
    }

    #[test]
    fn test_same_scope_variables_collide_once() {
        let mut table = SymbolTable::new(true, HoistPolicy::default());
        let first = table.declare(decl("a", DeclKind::Variable, ScopeId::root(), 4));
        let second = table.declare(decl("a", DeclKind::Variable, ScopeId::root(), 15));

        assert_eq!(
            table.collisions(),
            &[Collision {
                declaration: second,
                previous: first,
                kind: CollisionKind::Redeclared,
            }]
        );
        // resolution keeps the first declaration
        assert_eq!(
            table.lookup_local(ScopeId::root(), "a", Namespace::Value).map(|d| d.id),
            Some(first)
        );
    }

    #[test]
    fn test_type_and_value_coexist() {
        let mut table = SymbolTable::new(true, HoistPolicy::default());
        let ty = table.declare(decl("T", DeclKind::TypeAlias, ScopeId::root(), 0));
        let value = table.declare(decl("T", DeclKind::Variable, ScopeId::root(), 20));

        assert!(table.collisions().is_empty());
        assert_eq!(table.lookup_local(ScopeId::root(), "T", Namespace::Type).map(|d| d.id), Some(ty));
        assert_eq!(table.lookup_local(ScopeId::root(), "T", Namespace::Value).map(|d| d.id), Some(value));
    }

    #[test]
    fn test_interface_merge_policy() {
        let mut merged = SymbolTable::new(true, HoistPolicy::default());
        let first = merged.declare(decl("A", DeclKind::Interface, ScopeId::root(), 0));
        let second = merged.declare(decl("A", DeclKind::Interface, ScopeId::root(), 20));
        assert!(merged.collisions().is_empty());
        assert_eq!(merged.get(second).and_then(|d| d.merge_group), Some(first));

        let mut strict = SymbolTable::new(false, HoistPolicy::default());
        strict.declare(decl("A", DeclKind::Interface, ScopeId::root(), 0));
        strict.declare(decl("A", DeclKind::Interface, ScopeId::root(), 20));
        assert_eq!(strict.collisions().len(), 1);
    }

    #[test]
    fn test_collision_kinds() {
        let mut table = SymbolTable::new(true, HoistPolicy::default());
        table.declare(decl("a", DeclKind::Variable, ScopeId::root(), 0));
        table.declare(decl("a", DeclKind::FunctionName, ScopeId::root(), 10));
        assert_eq!(table.collisions()[0].kind, CollisionKind::RedeclaredBySyntax);

        let mut table = SymbolTable::new(true, HoistPolicy::default());
        table.register_builtins(ScopeId::root(), ["Object"]);
        table.declare(decl("Object", DeclKind::Variable, ScopeId::root(), 4));
        assert_eq!(table.collisions().len(), 1);
        assert_eq!(table.collisions()[0].kind, CollisionKind::RedeclaredAsBuiltin);
    }

    #[test]
    fn test_user_declaration_replaces_builtin_in_index() {
        let mut table = SymbolTable::new(true, HoistPolicy::default());
        table.register_builtins(ScopeId::root(), ["Map"]);
        let user = table.declare(decl("Map", DeclKind::Variable, ScopeId::root(), 6));
        assert_eq!(
            table.lookup_local(ScopeId::root(), "Map", Namespace::Value).map(|d| d.id),
            Some(user)
        );
    }

    #[test]
    fn test_lookup_walks_scope_chain() {
        let mut tree = ScopeTree::new(ScopeKind::Global, Span::new(0, 100));
        let func = tree.enter_scope(ScopeKind::Function, Span::new(10, 90));
        let block = tree.enter_scope(ScopeKind::Block, Span::new(20, 80));

        let mut table = SymbolTable::new(true, HoistPolicy::default());
        let outer = table.declare(decl("x", DeclKind::Variable, ScopeId::root(), 4));
        let inner = table.declare(decl("x", DeclKind::Parameter, func, 12));

        assert_eq!(table.lookup(&tree, block, "x", Namespace::Value).map(|d| d.id), Some(inner));
        assert_eq!(table.lookup(&tree, ScopeId::root(), "x", Namespace::Value).map(|d| d.id), Some(outer));
        assert!(table.lookup(&tree, block, "x", Namespace::Type).is_none());
    }

    #[test]
    fn test_hoistable_follows_policy() {
        let mut table = SymbolTable::new(true, HoistPolicy::Functions);
        let f = table.declare(decl("f", DeclKind::FunctionName, ScopeId::root(), 0));
        let v = table.declare(decl("v", DeclKind::Variable, ScopeId::root(), 10));
        assert!(table.get(f).map(|d| d.hoistable).unwrap_or(false));
        assert!(!table.get(v).map(|d| d.hoistable).unwrap_or(true));
    }
}
