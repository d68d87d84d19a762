//! Reference collector
//!
//! Records every identifier use site together with the scope it occurs in.
//! Whether a use sits in a type-only position is answered by a `TypeOracle`
//! when one is supplied, and otherwise by walking up the syntax tree until a
//! type-annotation context or a scope boundary is found. Walk results are
//! memoized per node, so every ancestor is classified at most once.

use super::tree::ScopeId;
use crate::position::{Position, Span};
use crate::symbol::Namespace;
use serde::Serialize;
use std::collections::HashMap;
use tree_sitter::Node;

/// Index of a reference in the collector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RefId(pub u32);

/// An identifier use site
#[derive(Debug, Clone, Serialize)]
pub struct Reference {
    pub id: RefId,
    pub name: String,
    pub span: Span,
    pub position: Position,
    pub from_scope: ScopeId,
    /// Namespace the name is looked up in
    pub namespace: Namespace,
    /// The use sits in a type-only position (annotation, `typeof` query, ...)
    pub is_type_query: bool,
    /// The identifier names a variable in its own declarator or pattern
    pub is_initializing_occurrence: bool,
    /// Local name in `export { name }`
    pub is_named_export: bool,
}

/// How an identifier occurrence should be recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub namespace: Namespace,
    pub initializing: bool,
    pub named_export: bool,
}

impl Occurrence {
    pub fn value() -> Self {
        Self {
            namespace: Namespace::Value,
            initializing: false,
            named_export: false,
        }
    }
}

/// External type-checker seam.
///
/// Return `Some(true)` when the identifier at `node` is a type-only use,
/// `Some(false)` when it is a value use, and `None` to defer to the
/// syntactic heuristic.
pub trait TypeOracle: Send + Sync {
    fn is_type_only(&self, node: Node<'_>, source: &[u8]) -> Option<bool>;
}

/// Ancestor kinds that make everything below them a type context
const TYPE_CONTEXT_KINDS: &[&str] = &[
    "type_annotation",
    "opting_type_annotation",
    "omitting_type_annotation",
    "asserts_annotation",
    "type_predicate_annotation",
    "type_predicate",
    "type_query",
    "type_alias_declaration",
    "interface_declaration",
    "interface_body",
    "extends_type_clause",
    "implements_clause",
    "generic_type",
    "type_arguments",
    "type_parameters",
    "mapped_type_clause",
    "conditional_type",
    "lookup_type",
    "index_type_query",
    "function_type",
    "constructor_type",
    "object_type",
    "union_type",
    "intersection_type",
    "array_type",
    "tuple_type",
    "readonly_type",
    "parenthesized_type",
    "literal_type",
    "template_literal_type",
    "infer_type",
];

/// Ancestor kinds past which a type context cannot extend
const SCOPE_BOUNDARY_KINDS: &[&str] = &[
    "program",
    "statement_block",
    "class_body",
    "class_declaration",
    "abstract_class_declaration",
    "class",
    "function_declaration",
    "generator_function_declaration",
    "function_expression",
    "function",
    "generator_function",
    "arrow_function",
    "method_definition",
    "enum_body",
    "switch_body",
];

/// Memoized type-context classification for one traversal
#[derive(Debug, Default)]
pub struct TypeContextCache {
    cache: HashMap<usize, bool>,
}

impl TypeContextCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `node` sits in a type-only position
    pub fn is_type_context(&mut self, node: Node<'_>) -> bool {
        if node.kind() == "type_identifier" {
            return true;
        }

        let mut visited = Vec::new();
        let mut current = node.parent();
        let result = loop {
            let Some(ancestor) = current else {
                break false;
            };
            if let Some(&known) = self.cache.get(&ancestor.id()) {
                break known;
            }
            visited.push(ancestor.id());
            if TYPE_CONTEXT_KINDS.contains(&ancestor.kind()) {
                break true;
            }
            if SCOPE_BOUNDARY_KINDS.contains(&ancestor.kind()) {
                break false;
            }
            current = ancestor.parent();
        };

        for id in visited {
            self.cache.insert(id, result);
        }
        result
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Collects references during traversal
pub struct ReferenceCollector<'a> {
    references: Vec<Reference>,
    type_context: TypeContextCache,
    oracle: Option<&'a dyn TypeOracle>,
}

impl<'a> ReferenceCollector<'a> {
    pub fn new(oracle: Option<&'a dyn TypeOracle>) -> Self {
        Self {
            references: Vec::new(),
            type_context: TypeContextCache::new(),
            oracle,
        }
    }

    /// Record an identifier use. Returns `None` when the node has no text.
    pub fn record(
        &mut self,
        node: Node<'_>,
        source: &[u8],
        from_scope: ScopeId,
        occurrence: Occurrence,
    ) -> Option<RefId> {
        let name = node.utf8_text(source).ok()?;
        if name.is_empty() {
            return None;
        }

        let is_type_query = match self.oracle.and_then(|o| o.is_type_only(node, source)) {
            Some(answer) => answer,
            None => self.type_context.is_type_context(node),
        };

        let id = RefId(self.references.len() as u32);
        self.references.push(Reference {
            id,
            name: name.to_string(),
            span: Span::of(node),
            position: Position::start_of(node),
            from_scope,
            namespace: occurrence.namespace,
            is_type_query,
            is_initializing_occurrence: occurrence.initializing,
            is_named_export: occurrence.named_export,
        });
        Some(id)
    }

    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    pub fn into_references(self) -> Vec<Reference> {
        self.references
    }
}
