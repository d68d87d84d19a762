//! Single forward traversal
//!
//! Walks the syntax tree once with a `TreeCursor`. Each node is entered before
//! its children and exited after them. Entering a scope-introducing node pushes
//! one scope and records the node's id; exiting that same node pops it, so the
//! stack is balanced regardless of how the tree is shaped.
//!
//! Declarations are inserted when their declaring construct is entered. Name
//! tokens that were declared (or that are not references at all, like import
//! aliases) are remembered by node id so the identifier visit that follows
//! skips them.

use super::patterns::{bound_identifiers, bound_names, has_token, leftmost_identifier, parameter_pattern};
use super::{AnalysisOptions, VarScoping};
use crate::position::{Position, Span};
use crate::scope::builtins::BUILTIN_GLOBALS;
use crate::scope::{Occurrence, Reference, ReferenceCollector, ScopeId, ScopeKind, ScopeTree, SymbolTable, TypeOracle};
use crate::symbol::{DeclKind, Declaration, Namespace, Namespaces, Site};
use std::collections::{HashMap, HashSet};
use tracing::trace;
use tree_sitter::Node;

/// What the identifier visit does with a name token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameSlot {
    /// Declared name; not a reference
    Binding,
    /// Declared variable name; recorded as an initializing occurrence
    Initializing,
    /// Not a reference (alias slot, mapped type key, intrinsic element, ...)
    Ignored,
}

/// Function-like nodes whose body block shares the function's scope
const FUNCTION_KINDS: &[&str] = &[
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
    "class_static_block",
];

/// Bare signatures with a parameter list but no body
const SIGNATURE_KINDS: &[&str] = &[
    "function_type",
    "constructor_type",
    "call_signature",
    "construct_signature",
    "method_signature",
    "abstract_method_signature",
];

pub(crate) struct Walker<'s, 'o> {
    source: &'s [u8],
    var_scoping: VarScoping,
    scopes: ScopeTree,
    table: SymbolTable,
    collector: ReferenceCollector<'o>,
    /// Ids of the nodes that pushed the active scopes, innermost last
    scope_nodes: Vec<usize>,
    slots: HashMap<usize, NameSlot>,
    named_exports: HashSet<usize>,
    /// Type parameters of the enclosing interfaces and type aliases, which
    /// bind without a scope of their own
    type_param_frames: Vec<(usize, Vec<String>)>,
}

pub(crate) struct WalkResult {
    pub scopes: ScopeTree,
    pub table: SymbolTable,
    pub references: Vec<Reference>,
}

impl<'s, 'o> Walker<'s, 'o> {
    pub fn new(
        root: Node<'_>,
        source: &'s [u8],
        options: &AnalysisOptions,
        oracle: Option<&'o dyn TypeOracle>,
    ) -> Self {
        let root_kind = if is_module(root) {
            ScopeKind::Module
        } else {
            ScopeKind::Global
        };
        let scopes = ScopeTree::new(root_kind, Span::of(root));

        let mut table = SymbolTable::new(options.ignore_declaration_merge, options.hoist);
        if options.builtin_globals {
            table.register_builtins(ScopeId::root(), BUILTIN_GLOBALS.iter().copied());
        }

        Self {
            source,
            var_scoping: options.var_scoping,
            scopes,
            table,
            collector: ReferenceCollector::new(oracle),
            scope_nodes: vec![root.id()],
            slots: HashMap::new(),
            named_exports: HashSet::new(),
            type_param_frames: Vec::new(),
        }
    }

    /// Visit every node under `root`
    pub fn walk(&mut self, root: Node<'_>) {
        let mut cursor = root.walk();
        loop {
            self.enter(cursor.node());
            if cursor.goto_first_child() {
                continue;
            }
            loop {
                self.exit(cursor.node());
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return;
                }
            }
        }
    }

    /// Number of scopes still active; 1 after a complete walk
    pub fn depth(&self) -> usize {
        self.scopes.depth()
    }

    pub fn finish(self) -> WalkResult {
        WalkResult {
            scopes: self.scopes,
            table: self.table,
            references: self.collector.into_references(),
        }
    }

    fn enter(&mut self, node: Node<'_>) {
        if !node.is_named() {
            return;
        }

        match node.kind() {
            "function_declaration" | "generator_function_declaration" => {
                self.declare_name_of(node, DeclKind::FunctionName);
                self.push(node, ScopeKind::Function);
            }
            "function_signature" => {
                self.declare_name_of(node, DeclKind::FunctionSignature);
                self.push(node, ScopeKind::FunctionType);
            }
            "function_expression" | "function" | "generator_function" => {
                self.push(node, ScopeKind::Function);
                self.declare_self_binding(node, DeclKind::FunctionName);
            }
            "arrow_function" => {
                self.push(node, ScopeKind::Function);
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.declare_pattern(param, DeclKind::Parameter, node);
                }
            }
            "method_definition" | "class_static_block" => {
                self.push(node, ScopeKind::Function);
            }
            "class_declaration" | "abstract_class_declaration" => {
                self.declare_name_of(node, DeclKind::ClassName);
                self.push(node, ScopeKind::Class);
            }
            "class" => {
                self.push(node, ScopeKind::Class);
                self.declare_self_binding(node, DeclKind::ClassName);
            }
            "enum_declaration" => {
                self.declare_name_of(node, DeclKind::EnumName);
                self.push(node, ScopeKind::Enum);
            }
            "enum_body" => self.declare_enum_members(node),
            "interface_declaration" => {
                self.declare_name_of(node, DeclKind::Interface);
                self.push_type_params(node);
            }
            "type_alias_declaration" => {
                self.declare_name_of(node, DeclKind::TypeAlias);
                self.push_type_params(node);
            }
            "internal_module" | "module" => {
                if let Some(ident) = node.child_by_field_name("name").and_then(leftmost_identifier) {
                    self.declare(ident, DeclKind::TsModule, node);
                }
                self.push(node, ScopeKind::TsModule);
            }
            "ambient_declaration" => {
                if is_global_augmentation(node) {
                    let scope = self.push(node, ScopeKind::TsModule);
                    self.scopes.mark_global_augmentation(scope);
                }
            }
            "statement_block" => {
                if !self.shares_parent_scope(node) {
                    self.push(node, ScopeKind::Block);
                }
            }
            "for_statement" | "switch_body" => {
                self.push(node, ScopeKind::Block);
            }
            "for_in_statement" => {
                self.push(node, ScopeKind::Block);
                self.declare_loop_variables(node);
            }
            "catch_clause" => {
                self.push(node, ScopeKind::Block);
                if let Some(param) = node.child_by_field_name("parameter") {
                    self.declare_pattern(param, DeclKind::CatchParam, node);
                }
            }
            kind if SIGNATURE_KINDS.contains(&kind) => {
                self.push(node, ScopeKind::FunctionType);
            }
            "formal_parameters" => self.declare_parameters(node),
            "variable_declarator" => self.declare_variable(node),
            "type_parameter" => self.declare_type_parameter(node),
            "import_statement" => self.declare_imports(node),
            "import_alias" => {
                if let Some(ident) = first_named_of_kind(node, "identifier") {
                    self.declare(ident, DeclKind::Import, node);
                }
            }
            "export_statement" => self.mark_exports(node),
            "namespace_export" => self.ignore_children(node, "identifier"),
            "index_signature" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.ignore(name);
                }
            }
            "mapped_type_clause" => {
                if let Some(name) = node.child_by_field_name("name") {
                    self.ignore(name);
                }
            }
            "infer_type" => self.ignore_children(node, "type_identifier"),
            "jsx_opening_element" | "jsx_closing_element" | "jsx_self_closing_element" => {
                if let Some(name) = node.child_by_field_name("name") {
                    if self.is_intrinsic_element(name) {
                        self.ignore(name);
                    }
                }
            }
            "identifier"
            | "type_identifier"
            | "shorthand_property_identifier"
            | "shorthand_property_identifier_pattern" => self.visit_identifier(node),
            _ => {}
        }
    }

    fn exit(&mut self, node: Node<'_>) {
        if self.type_param_frames.last().is_some_and(|(id, _)| *id == node.id()) {
            self.type_param_frames.pop();
        }
        if self.scope_nodes.last() == Some(&node.id()) {
            self.scope_nodes.pop();
            self.scopes.exit_scope();
        }
    }

    fn push(&mut self, node: Node<'_>, kind: ScopeKind) -> ScopeId {
        let id = self.scopes.enter_scope(kind, Span::of(node));
        self.scope_nodes.push(node.id());
        id
    }

    /// A body block reuses the scope its function, namespace or
    /// `declare global` already pushed
    fn shares_parent_scope(&self, block: Node<'_>) -> bool {
        let Some(parent) = block.parent() else {
            return false;
        };
        if self.scope_nodes.last() != Some(&parent.id()) {
            return false;
        }
        FUNCTION_KINDS.contains(&parent.kind())
            || matches!(parent.kind(), "internal_module" | "module" | "ambient_declaration")
    }

    // --- declarations ---

    fn new_declaration(&self, ident: Node<'_>, kind: DeclKind, extent: Node<'_>, scope: ScopeId) -> Option<Declaration> {
        let name = ident.utf8_text(self.source).ok().filter(|n| !n.is_empty())?;
        let site = Site {
            span: Span::of(ident),
            position: Position::start_of(ident),
            extent: Span::of(extent),
        };
        Some(Declaration::new(name, kind, scope, Some(site)))
    }

    fn insert(&mut self, ident: Node<'_>, decl: Declaration, slot: NameSlot) {
        self.slots.insert(ident.id(), slot);
        trace!(name = %decl.name, kind = %decl.kind, scope = decl.scope.0, "declare");
        self.table.declare(decl);
    }

    fn declare(&mut self, ident: Node<'_>, kind: DeclKind, extent: Node<'_>) {
        if let Some(decl) = self.new_declaration(ident, kind, extent, self.scopes.current()) {
            self.insert(ident, decl, NameSlot::Binding);
        }
    }

    /// Declare the node's `name` field in the current scope
    fn declare_name_of(&mut self, node: Node<'_>, kind: DeclKind) {
        if let Some(name) = node.child_by_field_name("name") {
            if matches!(name.kind(), "identifier" | "type_identifier") {
                self.declare(name, kind, node);
            }
        }
    }

    /// Name of a class or function expression, bound in its own scope
    fn declare_self_binding(&mut self, node: Node<'_>, kind: DeclKind) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        if let Some(decl) = self.new_declaration(name, kind, node, self.scopes.current()) {
            self.insert(name, decl.with_self_binding(), NameSlot::Binding);
        }
    }

    fn declare_pattern(&mut self, pattern: Node<'_>, kind: DeclKind, extent: Node<'_>) {
        for ident in bound_identifiers(pattern) {
            self.declare(ident, kind, extent);
        }
    }

    fn declare_parameters(&mut self, params: Node<'_>) {
        let mut cursor = params.walk();
        let list: Vec<Node<'_>> = params.named_children(&mut cursor).collect();
        for param in list {
            if let Some(pattern) = parameter_pattern(param) {
                self.declare_pattern(pattern, DeclKind::Parameter, param);
            }
        }
    }

    fn variable_scope(&self, is_var: bool) -> ScopeId {
        let current = self.scopes.current();
        match self.var_scoping {
            VarScoping::Function if is_var => self.scopes.owner(current),
            _ => current,
        }
    }

    fn declare_variables(&mut self, pattern: Node<'_>, extent: Node<'_>, init: Option<Span>, is_var: bool) {
        let scope = self.variable_scope(is_var);
        for bound in bound_names(pattern) {
            if let Some(decl) = self.new_declaration(bound.ident, DeclKind::Variable, extent, scope) {
                let decl = decl.with_init_range(init).with_default_ranges(bound.defaults);
                self.insert(bound.ident, decl, NameSlot::Initializing);
            }
        }
    }

    fn declare_variable(&mut self, declarator: Node<'_>) {
        let Some(name) = declarator.child_by_field_name("name") else {
            return;
        };
        let init = declarator.child_by_field_name("value").map(Span::of);
        let is_var = declarator
            .parent()
            .is_some_and(|decl| decl.kind() == "variable_declaration");
        self.declare_variables(name, declarator, init, is_var);
    }

    /// `for (const x of xs)` binds `x` in the loop scope; a bare
    /// `for (x of xs)` assigns and is an ordinary reference
    fn declare_loop_variables(&mut self, node: Node<'_>) {
        let Some(kind) = node.child_by_field_name("kind") else {
            return;
        };
        let Some(left) = node.child_by_field_name("left") else {
            return;
        };
        let init = node.child_by_field_name("right").map(Span::of);
        let is_var = kind.kind() == "var";
        self.declare_variables(left, node, init, is_var);
    }

    fn declare_enum_members(&mut self, body: Node<'_>) {
        let mut cursor = body.walk();
        let members: Vec<Node<'_>> = body.named_children(&mut cursor).collect();
        for member in members {
            let name = match member.kind() {
                "property_identifier" => Some(member),
                "enum_assignment" => member
                    .child_by_field_name("name")
                    .filter(|n| n.kind() == "property_identifier"),
                _ => None,
            };
            if let Some(name) = name {
                self.declare(name, DeclKind::EnumMember, member);
            }
        }
    }

    /// Type parameters bind only when their owner introduced a scope
    fn declare_type_parameter(&mut self, node: Node<'_>) {
        let Some(name) = node.child_by_field_name("name") else {
            return;
        };
        let owner = node.parent().and_then(|list| list.parent());
        let owner_has_scope = owner.is_some_and(|o| self.scope_nodes.last() == Some(&o.id()));
        if owner_has_scope {
            self.declare(name, DeclKind::TypeParameter, node);
        } else {
            self.ignore(name);
        }
    }

    fn push_type_params(&mut self, node: Node<'_>) {
        let Some(params) = node.child_by_field_name("type_parameters") else {
            return;
        };
        let mut cursor = params.walk();
        let names: Vec<String> = params
            .named_children(&mut cursor)
            .filter(|p| p.kind() == "type_parameter")
            .filter_map(|p| p.child_by_field_name("name"))
            .filter_map(|name| name.utf8_text(self.source).ok())
            .map(str::to_string)
            .collect();
        if !names.is_empty() {
            self.type_param_frames.push((node.id(), names));
        }
    }

    /// A type name bound by an enclosing interface or type alias
    fn is_scopeless_type_param(&self, node: Node<'_>) -> bool {
        if node.kind() != "type_identifier" || self.type_param_frames.is_empty() {
            return false;
        }
        let Ok(name) = node.utf8_text(self.source) else {
            return false;
        };
        self.type_param_frames
            .iter()
            .any(|(_, names)| names.iter().any(|n| n == name))
    }

    fn declare_imports(&mut self, stmt: Node<'_>) {
        let type_only = has_token(stmt, "type");
        let mut cursor = stmt.walk();
        let children: Vec<Node<'_>> = stmt.named_children(&mut cursor).collect();
        for child in children {
            match child.kind() {
                "import_clause" => self.declare_import_clause(child, type_only),
                "import_require_clause" => {
                    if let Some(ident) = first_named_of_kind(child, "identifier") {
                        self.declare_import(ident, stmt, type_only);
                    }
                }
                _ => {}
            }
        }
    }

    fn declare_import_clause(&mut self, clause: Node<'_>, type_only: bool) {
        let mut cursor = clause.walk();
        let parts: Vec<Node<'_>> = clause.named_children(&mut cursor).collect();
        for part in parts {
            match part.kind() {
                "identifier" => self.declare_import(part, clause, type_only),
                "namespace_import" => {
                    if let Some(ident) = first_named_of_kind(part, "identifier") {
                        self.declare_import(ident, part, type_only);
                    }
                }
                "named_imports" => {
                    let mut inner = part.walk();
                    let specifiers: Vec<Node<'_>> = part
                        .named_children(&mut inner)
                        .filter(|s| s.kind() == "import_specifier")
                        .collect();
                    for specifier in specifiers {
                        self.declare_import_specifier(specifier, type_only);
                    }
                }
                _ => {}
            }
        }
    }

    fn declare_import_specifier(&mut self, specifier: Node<'_>, type_only: bool) {
        let type_only = type_only || has_token(specifier, "type");
        let name = specifier.child_by_field_name("name");
        let local = match specifier.child_by_field_name("alias") {
            Some(alias) => {
                if let Some(name) = name {
                    self.ignore(name);
                }
                Some(alias)
            }
            None => name,
        };
        if let Some(local) = local.filter(|n| n.kind() == "identifier") {
            self.declare_import(local, specifier, type_only);
        }
    }

    fn declare_import(&mut self, ident: Node<'_>, extent: Node<'_>, type_only: bool) {
        let namespaces = if type_only {
            Namespaces::TYPE
        } else {
            Namespaces::BOTH
        };
        if let Some(decl) = self.new_declaration(ident, DeclKind::Import, extent, self.scopes.current()) {
            self.insert(ident, decl.with_namespaces(namespaces), NameSlot::Binding);
        }
    }

    // --- references ---

    fn mark_exports(&mut self, stmt: Node<'_>) {
        let re_export = stmt.child_by_field_name("source").is_some();
        let mut cursor = stmt.walk();
        let clauses: Vec<Node<'_>> = stmt
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "export_clause")
            .collect();
        for clause in clauses {
            let mut inner = clause.walk();
            let specifiers: Vec<Node<'_>> = clause.named_children(&mut inner).collect();
            for specifier in specifiers {
                if let Some(alias) = specifier.child_by_field_name("alias") {
                    self.ignore(alias);
                }
                if let Some(name) = specifier.child_by_field_name("name") {
                    if re_export {
                        self.ignore(name);
                    } else {
                        self.named_exports.insert(name.id());
                    }
                }
            }
        }
    }

    fn ignore(&mut self, node: Node<'_>) {
        self.slots.insert(node.id(), NameSlot::Ignored);
    }

    fn ignore_children(&mut self, node: Node<'_>, kind: &str) {
        let mut cursor = node.walk();
        let names: Vec<Node<'_>> = node
            .named_children(&mut cursor)
            .filter(|c| c.kind() == kind)
            .collect();
        for name in names {
            self.ignore(name);
        }
    }

    /// Lowercase JSX tags name host elements, not bindings
    fn is_intrinsic_element(&self, name: Node<'_>) -> bool {
        name.kind() == "identifier"
            && name
                .utf8_text(self.source)
                .ok()
                .and_then(|text| text.chars().next())
                .is_some_and(|c| c.is_ascii_lowercase())
    }

    fn visit_identifier(&mut self, node: Node<'_>) {
        let initializing = match self.slots.get(&node.id()) {
            Some(NameSlot::Binding) | Some(NameSlot::Ignored) => return,
            Some(NameSlot::Initializing) => true,
            None => false,
        };
        if self.is_scopeless_type_param(node) {
            return;
        }

        let namespace = if node.kind() == "type_identifier" || is_type_qualifier(node) {
            Namespace::Type
        } else {
            Namespace::Value
        };
        let occurrence = Occurrence {
            namespace,
            initializing,
            named_export: self.named_exports.contains(&node.id()),
        };
        self.collector
            .record(node, self.source, self.scopes.current(), occurrence);
    }
}

/// A program with a top-level import or export is a module
fn is_module(root: Node<'_>) -> bool {
    let mut cursor = root.walk();
    let found = root
        .named_children(&mut cursor)
        .any(|child| matches!(child.kind(), "import_statement" | "export_statement"));
    found
}

/// `declare global { ... }`
fn is_global_augmentation(node: Node<'_>) -> bool {
    has_token(node, "global") && first_named_of_kind(node, "statement_block").is_some()
}

fn first_named_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.named_children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Leftmost part of a qualified type name (`A` in `A.B.T`)
fn is_type_qualifier(node: Node<'_>) -> bool {
    let mut child = node;
    while let Some(parent) = child.parent() {
        match parent.kind() {
            "nested_identifier" | "member_expression" => child = parent,
            "nested_type_identifier" => return true,
            _ => return false,
        }
    }
    false
}
