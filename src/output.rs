use clap::ValueEnum;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("SCOPELINT_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored, grouped by file, with a summary table
    #[default]
    Human,
    /// One JSON document on stdout
    Json,
}

impl OutputFormat {
    pub fn is_human(&self) -> bool {
        *self == OutputFormat::Human
    }
}
