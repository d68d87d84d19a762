//! Bindings - resolved reference → declaration pairs
//!
//! A binding is computed once by the resolver and never changes. References
//! with no binding are treated as ambient names and ignored by every rule.

use crate::scope::RefId;
use crate::symbol::DeclId;
use serde::Serialize;

/// A reference resolved to the declaration it refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Binding {
    pub reference: RefId,
    pub declaration: DeclId,
}

impl Binding {
    pub fn new(reference: RefId, declaration: DeclId) -> Self {
        Self {
            reference,
            declaration,
        }
    }
}
