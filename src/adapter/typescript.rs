//! TypeScript language adapters
//!
//! The TypeScript grammar ships two dialects: plain TypeScript and TSX. They
//! differ only in the grammar and the extensions they claim.

use super::framework::LanguageAdapter;
use tree_sitter::Language;

pub struct TypeScriptAdapter {
    name: &'static str,
    extensions: &'static [&'static str],
    language: Language,
}

impl TypeScriptAdapter {
    /// `.ts`, `.mts`, `.cts` (declaration files included)
    pub fn typescript() -> Self {
        Self {
            name: "TypeScript",
            extensions: &["ts", "mts", "cts"],
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }

    pub fn tsx() -> Self {
        Self {
            name: "TSX",
            extensions: &["tsx"],
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl LanguageAdapter for TypeScriptAdapter {
    fn language_name(&self) -> &str {
        self.name
    }

    fn file_extensions(&self) -> &[&str] {
        self.extensions
    }

    fn language(&self) -> Language {
        self.language.clone()
    }
}
