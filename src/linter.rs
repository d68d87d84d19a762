//! Per-file lint pipeline
//!
//! parse → analyze (scope tree, symbol table, references) → resolve →
//! classify → sort. Each file gets fresh engine state; a `Linter` itself only
//! holds options and the configured rules, so it can be shared across worker
//! threads.

use crate::adapter::LanguageAdapter;
use crate::analysis::{analyze, Analysis, AnalysisOptions, VarScoping};
use crate::diagnostic::{Diagnostic, RuleName};
use crate::rules::{
    NoRedeclare, NoRedeclareOptions, NoShadow, NoShadowOptions, NoUseBeforeDefine, NoUseBeforeDefineOptions, Rule,
};
use crate::scope::TypeOracle;
use crate::Result;
use serde::Serialize;
use tracing::{debug, warn};
use tree_sitter::Tree;

/// Options for every rule plus the engine knobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintOptions {
    /// Rules to run, in report order
    pub rules: Vec<RuleName>,
    pub var_scoping: VarScoping,
    pub no_redeclare: NoRedeclareOptions,
    pub no_shadow: NoShadowOptions,
    pub no_use_before_define: NoUseBeforeDefineOptions,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            rules: RuleName::all().to_vec(),
            var_scoping: VarScoping::default(),
            no_redeclare: NoRedeclareOptions::default(),
            no_shadow: NoShadowOptions::default(),
            no_use_before_define: NoUseBeforeDefineOptions::default(),
        }
    }
}

impl LintOptions {
    pub fn with_rules(mut self, rules: Vec<RuleName>) -> Self {
        self.rules = rules;
        self
    }

    fn is_enabled(&self, rule: RuleName) -> bool {
        self.rules.contains(&rule)
    }

    /// Engine knobs derived from the enabled rules' options
    pub fn analysis_options(&self) -> AnalysisOptions {
        let redeclare = self.is_enabled(RuleName::NoRedeclare);
        let shadow = self.is_enabled(RuleName::NoShadow);
        AnalysisOptions {
            var_scoping: self.var_scoping,
            ignore_declaration_merge: self.no_redeclare.ignore_declaration_merge,
            hoist: self.no_shadow.hoist,
            builtin_globals: (redeclare && self.no_redeclare.builtin_globals)
                || (shadow && self.no_shadow.builtin_globals),
        }
    }
}

/// Diagnostics for one file
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub path: String,
    pub diagnostics: Vec<Diagnostic>,
    pub has_syntax_errors: bool,
}

impl FileReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Number of diagnostics reported by one rule
    pub fn count(&self, rule: RuleName) -> usize {
        self.diagnostics.iter().filter(|d| d.rule == rule).count()
    }
}

/// Runs the configured rules over files
pub struct Linter {
    options: LintOptions,
    rules: Vec<Box<dyn Rule>>,
}

impl Linter {
    pub fn new(options: LintOptions) -> Self {
        let rules = options
            .rules
            .iter()
            .map(|rule| -> Box<dyn Rule> {
                match rule {
                    RuleName::NoRedeclare => Box::new(NoRedeclare::new(options.no_redeclare.clone())),
                    RuleName::NoShadow => Box::new(NoShadow::new(options.no_shadow.clone())),
                    RuleName::NoUseBeforeDefine => Box::new(NoUseBeforeDefine::new(options.no_use_before_define)),
                }
            })
            .collect();
        Self { options, rules }
    }

    pub fn options(&self) -> &LintOptions {
        &self.options
    }

    /// Build the analysis of an already parsed tree
    pub fn analyze(&self, tree: &Tree, source: &str, oracle: Option<&dyn TypeOracle>) -> Analysis {
        analyze(tree, source, &self.options.analysis_options(), oracle)
    }

    /// Sorted diagnostics for an already parsed tree
    pub fn lint_tree(&self, tree: &Tree, source: &str, oracle: Option<&dyn TypeOracle>) -> Vec<Diagnostic> {
        let analysis = self.analyze(tree, source, oracle);
        let mut diagnostics: Vec<Diagnostic> = self
            .rules
            .iter()
            .flat_map(|rule| {
                let found = rule.check(&analysis);
                debug!("{}: {} diagnostics", rule.name(), found.len());
                found
            })
            .collect();
        diagnostics.sort();
        diagnostics
    }

    /// Parse and lint one file's source
    pub fn lint_source(&self, adapter: &dyn LanguageAdapter, path: &str, source: &str) -> Result<FileReport> {
        let tree = adapter.parse(source)?;
        let has_syntax_errors = tree.root_node().has_error();
        if has_syntax_errors {
            warn!("{} has syntax errors; results may be incomplete", path);
        }

        let diagnostics = self.lint_tree(&tree, source, None);
        debug!("Checked {} ({} diagnostics)", path, diagnostics.len());

        Ok(FileReport {
            path: path.to_string(),
            diagnostics,
            has_syntax_errors,
        })
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(LintOptions::default())
    }
}
