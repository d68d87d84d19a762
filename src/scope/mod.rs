//! Lexical scope and symbol-resolution engine
//!
//! One traversal fills the scope tree, the symbol table and the reference
//! collector together. The resolver runs once afterwards and binds each
//! reference to its nearest compatible declaration.

pub mod builtins;
pub mod merge;
pub mod references;
pub mod resolver;
pub mod table;
pub mod tree;

pub use references::{Occurrence, RefId, Reference, ReferenceCollector, TypeOracle};
pub use resolver::Resolver;
pub use table::{Collision, CollisionKind, SymbolTable};
pub use tree::{Scope, ScopeId, ScopeKind, ScopeTree};
