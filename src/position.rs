//! Source positions
//!
//! Two coordinate systems are used throughout the engine:
//! - `Position`: 1-based line/column, what diagnostics report
//! - `Span`: half-open byte range, what ordering and containment checks use
//!
//! Columns count bytes, the same unit tree-sitter reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use tree_sitter::{Node, Point};

/// A 1-based line/column location in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed)
    pub line: u32,
    /// Column number (1-indexed, in bytes)
    pub column: u32,
}

impl Position {
    /// Create a new position
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Convert a 0-based tree-sitter point
    pub fn from_point(point: Point) -> Self {
        Self {
            line: point.row as u32 + 1,
            column: point.column as u32 + 1,
        }
    }

    /// Position of the first byte of a node
    pub fn start_of(node: Node<'_>) -> Self {
        Self::from_point(node.start_position())
    }

    /// Position just past the last byte of a node
    pub fn end_of(node: Node<'_>) -> Self {
        Self::from_point(node.end_position())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Byte range covered by a node
    pub fn of(node: Node<'_>) -> Self {
        Self {
            start: node.start_byte(),
            end: node.end_byte(),
        }
    }

    /// Whether `other` lies entirely inside this span
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Whether this span ends at or before `other` starts
    pub fn precedes(&self, other: Span) -> bool {
        self.end <= other.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_point_is_one_based() {
        let pos = Position::from_point(Point { row: 0, column: 4 });
        assert_eq!(pos, Position::new(1, 5));
        assert_eq!(pos.to_string(), "1:5");
    }

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(3, 2) < Position::new(3, 10));
    }

    #[test]
    fn test_span_containment() {
        let outer = Span::new(10, 40);
        assert!(outer.contains(Span::new(10, 40)));
        assert!(outer.contains(Span::new(12, 20)));
        assert!(!outer.contains(Span::new(5, 20)));
        assert!(!outer.contains(Span::new(35, 41)));
    }

    #[test]
    fn test_span_precedes() {
        assert!(Span::new(0, 3).precedes(Span::new(3, 5)));
        assert!(!Span::new(0, 4).precedes(Span::new(3, 5)));
    }
}
