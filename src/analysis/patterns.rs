//! Binding-pattern helpers
//!
//! Destructuring patterns are expanded to the identifiers they bind. Default
//! values and computed keys are left for the walker to visit as references.

use crate::position::Span;
use tree_sitter::Node;

/// An identifier bound by a pattern
#[derive(Debug, Clone)]
pub struct BoundName<'t> {
    pub ident: Node<'t>,
    /// Default values of the `x = ...` elements enclosing the identifier
    pub defaults: Vec<Span>,
}

/// Identifiers bound by a pattern, in source order
pub fn bound_identifiers<'t>(pattern: Node<'t>) -> Vec<Node<'t>> {
    bound_names(pattern).into_iter().map(|name| name.ident).collect()
}

/// Like `bound_identifiers`, keeping the default values around each name
pub fn bound_names<'t>(pattern: Node<'t>) -> Vec<BoundName<'t>> {
    let mut names = Vec::new();
    let mut defaults = Vec::new();
    collect(pattern, &mut defaults, &mut names);
    names
}

fn collect<'t>(node: Node<'t>, defaults: &mut Vec<Span>, names: &mut Vec<BoundName<'t>>) {
    match node.kind() {
        "identifier" | "shorthand_property_identifier_pattern" => names.push(BoundName {
            ident: node,
            defaults: defaults.clone(),
        }),
        "pair_pattern" => {
            if let Some(value) = node.child_by_field_name("value") {
                collect(value, defaults, names);
            }
        }
        "assignment_pattern" | "object_assignment_pattern" => {
            let Some(left) = node.child_by_field_name("left") else {
                return;
            };
            let default = node.child_by_field_name("right").map(Span::of);
            if let Some(span) = default {
                defaults.push(span);
            }
            collect(left, defaults, names);
            if default.is_some() {
                defaults.pop();
            }
        }
        "object_pattern" | "array_pattern" | "rest_pattern" => {
            let mut cursor = node.walk();
            let children: Vec<Node<'t>> = node.named_children(&mut cursor).collect();
            for child in children {
                collect(child, defaults, names);
            }
        }
        _ => {}
    }
}

/// The parameter node's binding pattern.
///
/// TypeScript wraps each parameter in `required_parameter` or
/// `optional_parameter`; JavaScript puts the pattern directly in the list.
pub fn parameter_pattern(param: Node<'_>) -> Option<Node<'_>> {
    match param.kind() {
        "required_parameter" | "optional_parameter" => param.child_by_field_name("pattern"),
        _ => Some(param),
    }
}

/// Leftmost identifier of a possibly dotted name (`A.B.C` → `A`)
pub fn leftmost_identifier(node: Node<'_>) -> Option<Node<'_>> {
    match node.kind() {
        "identifier" => Some(node),
        "nested_identifier" | "member_expression" => node
            .child_by_field_name("object")
            .or_else(|| node.named_child(0))
            .and_then(leftmost_identifier),
        _ => None,
    }
}

/// Whether `node` has an anonymous child token of the given kind
pub fn has_token(node: Node<'_>, token: &str) -> bool {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token);
    found
}
