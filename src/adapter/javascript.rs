//! JavaScript language adapter
//!
//! Plain JavaScript (JSX included) goes through the same scope engine; the
//! grammar simply never produces type nodes.

use super::framework::LanguageAdapter;
use tree_sitter::Language;

pub struct JavaScriptAdapter;

impl JavaScriptAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JavaScriptAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAdapter for JavaScriptAdapter {
    fn language_name(&self) -> &str {
        "JavaScript"
    }

    fn file_extensions(&self) -> &[&str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn language(&self) -> Language {
        tree_sitter_javascript::LANGUAGE.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze, AnalysisOptions};
    use crate::symbol::DeclKind;

    #[test]
    fn test_javascript_parameters_are_declared() {
        let source = "function f(a, b = 1, ...rest) { return a + b; }";
        let tree = JavaScriptAdapter::new().parse(source).unwrap();
        let analysis = analyze(&tree, source, &AnalysisOptions::default(), None);

        let params: Vec<&str> = analysis
            .table()
            .declarations()
            .iter()
            .filter(|d| d.kind == DeclKind::Parameter)
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(params, vec!["a", "b", "rest"]);
    }

    #[test]
    fn test_jsx_host_elements_are_not_references() {
        let source = "const view = <div><Item /></div>;";
        let tree = JavaScriptAdapter::new().parse(source).unwrap();
        let analysis = analyze(&tree, source, &AnalysisOptions::default(), None);

        let names: Vec<&str> = analysis
            .references()
            .iter()
            .filter(|r| !r.is_initializing_occurrence)
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names, vec!["Item"]);
    }
}
