//! Core adapter framework
//!
//! Defines the trait every language front-end implements and the registry
//! that picks one by file extension.

use crate::{Error, Result};
use std::path::Path;
use tree_sitter::{Language, Parser, Tree};

/// Trait for language adapters
///
/// Each language adapter is responsible for:
/// 1. Identifying files it can parse
/// 2. Supplying the tree-sitter grammar for them
/// 3. Producing a syntax tree the scope engine can walk
pub trait LanguageAdapter: Send + Sync {
    /// Get the language name (for display)
    fn language_name(&self) -> &str;

    /// Get file extensions this adapter handles
    fn file_extensions(&self) -> &[&str];

    /// Check if this adapter can handle a file
    fn can_handle(&self, path: &Path) -> bool {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            self.file_extensions().contains(&ext)
        } else {
            false
        }
    }

    /// The tree-sitter grammar
    fn language(&self) -> Language;

    /// Parse source text into a syntax tree.
    ///
    /// Trees with error nodes are returned as-is; only a parser that yields
    /// no tree at all is an error.
    fn parse(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language())
            .map_err(|e| Error::Adapter(format!("Failed to set language: {}", e)))?;

        parser
            .parse(source, None)
            .ok_or_else(|| Error::Parse(format!("{} parser produced no tree", self.language_name())))
    }
}

/// Registry of language adapters
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn LanguageAdapter>>,
}

impl AdapterRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter
    pub fn register(&mut self, adapter: impl LanguageAdapter + 'static) {
        self.adapters.push(Box::new(adapter));
    }

    /// Find an adapter for a file
    pub fn find_adapter(&self, path: &Path) -> Option<&dyn LanguageAdapter> {
        self.adapters
            .iter()
            .find(|a| a.can_handle(path))
            .map(|a| a.as_ref())
    }

    /// Get all registered adapters
    pub fn adapters(&self) -> &[Box<dyn LanguageAdapter>] {
        &self.adapters
    }

    /// Parse a file using the appropriate adapter
    pub fn parse_file(&self, path: &Path, content: &str) -> Result<Tree> {
        let adapter = self
            .find_adapter(path)
            .ok_or_else(|| Error::UnsupportedFile(path.display().to_string()))?;
        adapter.parse(content)
    }
}

/// Create a default registry with all built-in adapters
pub fn default_registry() -> AdapterRegistry {
    let mut registry = AdapterRegistry::new();
    registry.register(super::typescript::TypeScriptAdapter::typescript());
    registry.register(super::typescript::TypeScriptAdapter::tsx());
    registry.register(super::javascript::JavaScriptAdapter::new());
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestAdapter;

    impl LanguageAdapter for TestAdapter {
        fn language_name(&self) -> &str { "test" }
        fn file_extensions(&self) -> &[&str] { &["test"] }
        fn language(&self) -> Language {
            tree_sitter_javascript::LANGUAGE.into()
        }
    }

    #[test]
    fn test_registry() {
        let mut registry = AdapterRegistry::new();
        registry.register(TestAdapter);

        assert!(registry.find_adapter(Path::new("foo.test")).is_some());
        assert!(registry.find_adapter(Path::new("foo.other")).is_none());
    }

    #[test]
    fn test_default_registry_routes_extensions() {
        let registry = default_registry();
        let name = |p: &str| registry.find_adapter(Path::new(p)).map(|a| a.language_name().to_string());

        assert_eq!(name("src/a.ts").as_deref(), Some("TypeScript"));
        assert_eq!(name("types/index.d.ts").as_deref(), Some("TypeScript"));
        assert_eq!(name("lib/util.mts").as_deref(), Some("TypeScript"));
        assert_eq!(name("ui/App.tsx").as_deref(), Some("TSX"));
        assert_eq!(name("legacy.js").as_deref(), Some("JavaScript"));
        assert_eq!(name("legacy.cjs").as_deref(), Some("JavaScript"));
        assert!(name("README.md").is_none());
    }

    #[test]
    fn test_unsupported_file() {
        let registry = default_registry();
        let err = registry.parse_file(Path::new("notes.txt"), "hello").unwrap_err();
        assert!(matches!(err, Error::UnsupportedFile(_)));
    }
}
