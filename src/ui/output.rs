use crate::diagnostic::Diagnostic;
use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{} {}", Icons::SEARCH, text.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(theme().error.clone()));
}

pub fn section(title: &str) {
    println!();
    println!("━{}━", title.style(theme().header.clone()));
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}

pub fn muted(text: &str) -> String {
    text.style(theme().muted.clone()).to_string()
}

pub fn file_header(path: &str, problems: usize) {
    println!();
    println!(
        "{} {} {}",
        Icons::FILE,
        path.style(theme().path.clone()),
        muted(&format!("({} problem{})", problems, if problems == 1 { "" } else { "s" }))
    );
}

/// `  12:7  'x' is already declared in the upper scope on line 3 column 5.  no-shadow`
pub fn diagnostic_line(diagnostic: &Diagnostic) {
    let location = format!("{}:{}", diagnostic.line, diagnostic.column);
    println!(
        "  {:>8}  {}  {}",
        location.style(theme().location.clone()),
        diagnostic.description,
        diagnostic.rule.as_str().style(theme().rule.clone())
    );
}

pub fn summary_row(label: &str, value: &str) {
    println!("  {} {}", label.style(theme().dim.clone()), value);
}
