pub mod icons;
pub mod output;
pub mod progress;
pub mod progress_message;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{
    diagnostic_line, dim, error, file_header, header, muted, section, success, summary_row,
};
pub use progress::ProgressManager;
pub use progress_message::{ProgressMessage, ProgressPhase};
pub use table::{rule_summary_table, TableBuilder};
pub use theme::{theme, Theme};
