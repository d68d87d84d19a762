//! Diagnostics produced by the rules
//!
//! A diagnostic names the rule, a stable message id, the offending identifier
//! and its location. Descriptions are rendered from fixed templates so the
//! same input always yields byte-identical output.

use crate::position::{Position, Span};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The rules this crate implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleName {
    NoRedeclare,
    NoShadow,
    NoUseBeforeDefine,
}

impl RuleName {
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleName::NoRedeclare => "no-redeclare",
            RuleName::NoShadow => "no-shadow",
            RuleName::NoUseBeforeDefine => "no-use-before-define",
        }
    }

    pub fn all() -> &'static [RuleName] {
        &[RuleName::NoRedeclare, RuleName::NoShadow, RuleName::NoUseBeforeDefine]
    }
}

impl FromStr for RuleName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "no-redeclare" | "redeclare" => Ok(RuleName::NoRedeclare),
            "no-shadow" | "shadow" => Ok(RuleName::NoShadow),
            "no-use-before-define" | "use-before-define" => Ok(RuleName::NoUseBeforeDefine),
            _ => Err(Error::InvalidOption(format!("Unknown rule: {}", s))),
        }
    }
}

impl std::fmt::Display for RuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable message identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageId {
    Redeclared,
    RedeclaredAsBuiltin,
    RedeclaredBySyntax,
    NoShadow,
    NoShadowGlobal,
    NoUseBeforeDefine,
}

impl MessageId {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageId::Redeclared => "redeclared",
            MessageId::RedeclaredAsBuiltin => "redeclaredAsBuiltin",
            MessageId::RedeclaredBySyntax => "redeclaredBySyntax",
            MessageId::NoShadow => "noShadow",
            MessageId::NoShadowGlobal => "noShadowGlobal",
            MessageId::NoUseBeforeDefine => "noUseBeforeDefine",
        }
    }

    pub fn rule(&self) -> RuleName {
        match self {
            MessageId::Redeclared | MessageId::RedeclaredAsBuiltin | MessageId::RedeclaredBySyntax => {
                RuleName::NoRedeclare
            }
            MessageId::NoShadow | MessageId::NoShadowGlobal => RuleName::NoShadow,
            MessageId::NoUseBeforeDefine => RuleName::NoUseBeforeDefine,
        }
    }

    /// Render the description. `previous` is the shadowed declaration's position.
    pub fn describe(&self, name: &str, previous: Option<Position>) -> String {
        match self {
            MessageId::Redeclared => format!("'{}' is already defined.", name),
            MessageId::RedeclaredAsBuiltin => {
                format!("'{}' is already defined as a built-in global variable.", name)
            }
            MessageId::RedeclaredBySyntax => {
                format!("'{}' is already defined by a variable declaration.", name)
            }
            MessageId::NoShadow => match previous {
                Some(pos) => format!(
                    "'{}' is already declared in the upper scope on line {} column {}.",
                    name, pos.line, pos.column
                ),
                None => format!("'{}' is already declared in the upper scope.", name),
            },
            MessageId::NoShadowGlobal => format!("'{}' is already a global variable.", name),
            MessageId::NoUseBeforeDefine => format!("'{}' was used before it was defined.", name),
        }
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single finding. Field order is the sort order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub line: u32,
    pub column: u32,
    pub rule: RuleName,
    pub message_id: MessageId,
    pub description: String,
    /// The identifier the diagnostic is about
    pub name: String,
    pub end_line: u32,
    pub end_column: u32,
}

impl Diagnostic {
    pub fn new(message_id: MessageId, name: &str, start: Position, end: Position, previous: Option<Position>) -> Self {
        Self {
            line: start.line,
            column: start.column,
            rule: message_id.rule(),
            message_id,
            description: message_id.describe(name, previous),
            name: name.to_string(),
            end_line: end.line,
            end_column: end.column,
        }
    }

    /// Diagnostic on a name token whose end is on the same line
    pub fn on_token(message_id: MessageId, name: &str, start: Position, span: Span, previous: Option<Position>) -> Self {
        let width = (span.end - span.start) as u32;
        let end = Position::new(start.line, start.column + width);
        Self::new(message_id, name, start, end, previous)
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_name_roundtrip() {
        for rule in RuleName::all() {
            let parsed: RuleName = rule.as_str().parse().unwrap();
            assert_eq!(*rule, parsed);
        }
        assert_eq!(RuleName::from_str("shadow").unwrap(), RuleName::NoShadow);
        assert!(RuleName::from_str("no-unused-vars").is_err());
    }

    #[test]
    fn test_descriptions() {
        assert_eq!(MessageId::Redeclared.describe("a", None), "'a' is already defined.");
        assert_eq!(
            MessageId::NoShadow.describe("x", Some(Position::new(1, 5))),
            "'x' is already declared in the upper scope on line 1 column 5."
        );
        assert_eq!(
            MessageId::NoShadowGlobal.describe("Object", None),
            "'Object' is already a global variable."
        );
        assert_eq!(
            MessageId::NoUseBeforeDefine.describe("a", None),
            "'a' was used before it was defined."
        );
    }

    #[test]
    fn test_sort_order_is_positional() {
        let later = Diagnostic::new(MessageId::Redeclared, "a", Position::new(2, 1), Position::new(2, 2), None);
        let earlier = Diagnostic::new(MessageId::NoShadow, "b", Position::new(1, 9), Position::new(1, 10), None);
        let mut diagnostics = vec![later.clone(), earlier.clone()];
        diagnostics.sort();
        assert_eq!(diagnostics, vec![earlier, later]);
    }

    #[test]
    fn test_json_shape() {
        let diagnostic = Diagnostic::on_token(
            MessageId::RedeclaredAsBuiltin,
            "Object",
            Position::new(3, 5),
            Span::new(40, 46),
            None,
        );
        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["messageId"], "redeclaredAsBuiltin");
        assert_eq!(json["rule"], "no-redeclare");
        assert_eq!(json["endColumn"], 11);
    }
}
