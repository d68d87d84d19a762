//! # Scopelint - scope-aware lint rules for TypeScript
//!
//! A lexical scope and symbol-resolution engine over tree-sitter syntax trees.
//!
//! Scopelint provides:
//! - A scope tree builder, symbol table and reference collector driven by one traversal
//! - A resolver binding every identifier use to its declaration
//! - Three classifiers: redeclaration, shadowing and use-before-define
//! - Tree-sitter based parsing with pluggable language adapters

pub mod position;
pub mod symbol;
pub mod binding;
pub mod diagnostic;
pub mod scope;
pub mod analysis;
pub mod rules;
pub mod linter;
pub mod adapter;
pub mod output;
pub mod config;
pub mod ignore;
pub mod ui;


// Re-exports for convenient access
pub use analysis::{Analysis, AnalysisOptions, VarScoping};
pub use binding::Binding;
pub use diagnostic::{Diagnostic, MessageId, RuleName};
pub use linter::{FileReport, LintOptions, Linter};
pub use position::{Position, Span};
pub use symbol::{DeclKind, Declaration, HoistPolicy, Namespace};

/// Result type alias for Scopelint operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Scopelint operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Adapter error: {0}")]
    Adapter(String),

    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),

    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

/// Message sent from parallel check workers to the coordinator
#[derive(Debug)]
pub enum FileMessage {
    Checked {
        relative_path: String,
        report: FileReport,
    },
    Error(String, String),
}
