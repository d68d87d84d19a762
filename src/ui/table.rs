use crate::diagnostic::RuleName;
use crate::linter::FileReport;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct RuleSummaryRow {
    #[tabled(rename = "Rule")]
    pub rule: String,
    #[tabled(rename = "Problems")]
    pub problems: usize,
    #[tabled(rename = "Files")]
    pub files: usize,
}

pub struct TableBuilder {
    rows: Vec<RuleSummaryRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, rule: &str, problems: usize, files: usize) {
        self.rows.push(RuleSummaryRow {
            rule: rule.to_string(),
            problems,
            files,
        });
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-rule totals over `reports`, one row per enabled rule.
pub fn rule_summary_table(rules: &[RuleName], reports: &[FileReport]) -> String {
    let mut builder = TableBuilder::new();
    for rule in rules {
        let problems: usize = reports.iter().map(|r| r.count(*rule)).sum();
        let files = reports.iter().filter(|r| r.count(*rule) > 0).count();
        builder.add_row(rule.as_str(), problems, files);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, MessageId};
    use crate::position::Position;

    fn report(path: &str, ids: &[MessageId]) -> FileReport {
        FileReport {
            path: path.to_string(),
            diagnostics: ids
                .iter()
                .map(|id| Diagnostic::new(*id, "x", Position::new(1, 1), Position::new(1, 2), None))
                .collect(),
            has_syntax_errors: false,
        }
    }

    #[test]
    fn test_empty_builder_renders_nothing() {
        assert!(TableBuilder::new().build().is_empty());
    }

    #[test]
    fn test_rule_summary_counts() {
        let reports = vec![
            report("a.ts", &[MessageId::Redeclared, MessageId::NoShadow]),
            report("b.ts", &[MessageId::NoShadowGlobal]),
        ];
        let table = rule_summary_table(&[RuleName::NoRedeclare, RuleName::NoShadow], &reports);
        assert!(table.contains("no-redeclare"));
        assert!(table.contains("no-shadow"));
        assert!(!table.contains("no-use-before-define"));
        assert!(table.contains('2'));
    }
}
