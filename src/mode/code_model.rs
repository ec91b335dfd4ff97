//! Guest code models
//!
//! A code model answers indentation and folding questions for one guest language. The
//! controller resolves the model for a row from the row's state prefix and forwards the
//! call unchanged.

mod brackets;

pub use brackets::{BracketCodeModel, Flavor};

use crate::mode::session::{EditSession, Position};
use serde::Serialize;

/// Fold marker shown in the gutter for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoldWidget {
    None,
    Start,
    End,
}

/// A foldable region, from the end of its opening row to its closing position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FoldRange {
    pub start: Position,
    pub end: Position,
}

impl FoldRange {
    pub fn new(start_row: usize, start_column: usize, end_row: usize, end_column: usize) -> Self {
        Self {
            start: Position::new(start_row, start_column),
            end: Position::new(end_row, end_column),
        }
    }
}

/// Folding strategy for a session
pub trait FoldingRules {
    fn fold_widget(&self, session: &dyn EditSession, row: usize) -> FoldWidget;

    fn fold_range(&self, session: &dyn EditSession, row: usize) -> Option<FoldRange>;
}

/// Language-specific indentation and folding for a guest region
pub trait CodeModel: FoldingRules {
    /// Indentation for the line after `line` (at `row`), using `tab` as one level.
    fn next_line_indent(&self, state: &str, line: &str, tab: &str, row: usize) -> String;
}
