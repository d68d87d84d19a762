//! Classifiers over a finished analysis
//!
//! Each rule reads the scope tree, the symbol table and the bindings of one
//! file and reports diagnostics. Rules never mutate the analysis.

pub mod no_redeclare;
pub mod no_shadow;
pub mod no_use_before_define;

pub use no_redeclare::{NoRedeclare, NoRedeclareOptions};
pub use no_shadow::{NoShadow, NoShadowOptions};
pub use no_use_before_define::{NoUseBeforeDefine, NoUseBeforeDefineOptions};

use crate::analysis::Analysis;
use crate::diagnostic::{Diagnostic, RuleName};

/// A lint rule
pub trait Rule: Send + Sync {
    fn name(&self) -> RuleName;

    /// Diagnostics for one file, in any order
    fn check(&self, analysis: &Analysis) -> Vec<Diagnostic>;
}
