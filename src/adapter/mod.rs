//! Language Adapter Framework
//!
//! Each language provides a tree-sitter grammar. The scope engine only ever
//! sees syntax trees; everything language-specific stays behind the adapter.

pub mod framework;
pub mod typescript;
pub mod javascript;

pub use framework::{LanguageAdapter, AdapterRegistry, default_registry};
pub use javascript::JavaScriptAdapter;
pub use typescript::TypeScriptAdapter;
