//! Host-language behaviour
//!
//! What the controller falls back to outside guest chunks, or inside a chunk whose
//! language has no registered code model. Held by composition: the controller calls it
//! explicitly on the host path.

use crate::mode::code_model::{FoldRange, FoldWidget, FoldingRules};
use crate::mode::grammar::{Language, START_STATE};
use crate::mode::session::EditSession;
use once_cell::sync::Lazy;
use regex::Regex;

static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(?:([-+*])|(\d+)\.)(\s+)").unwrap());

static ATX_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})(?:\s|$)").unwrap());

/// Leading spaces and tabs of a line
pub fn leading_indent(line: &str) -> &str {
    let end = line
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Indentation and folding for the host language
pub trait HostBehavior: FoldingRules {
    fn language(&self) -> Language;

    fn next_line_indent(&self, state: &str, line: &str, tab: &str) -> String;
}

/// HTML keeps the indentation of the current line
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlHost;

impl FoldingRules for HtmlHost {
    fn fold_widget(&self, _session: &dyn EditSession, _row: usize) -> FoldWidget {
        FoldWidget::None
    }

    fn fold_range(&self, _session: &dyn EditSession, _row: usize) -> Option<FoldRange> {
        None
    }
}

impl HostBehavior for HtmlHost {
    fn language(&self) -> Language {
        Language::Html
    }

    fn next_line_indent(&self, _state: &str, line: &str, _tab: &str) -> String {
        leading_indent(line).to_string()
    }
}

/// Markdown continues list markers and folds sections under ATX headers
#[derive(Debug, Clone)]
pub struct MarkdownHost {
    list_state: String,
}

impl MarkdownHost {
    /// `list_state` is the grammar state lines of a list are tokenized in
    pub fn new(list_state: &str) -> Self {
        Self {
            list_state: list_state.to_string(),
        }
    }

    /// Header level of `row`, when it is a header line tokenized in the top-level state
    fn header_level(&self, session: &dyn EditSession, row: usize) -> Option<usize> {
        if session.state(row) != Some(START_STATE) {
            return None;
        }
        let line = session.line(row)?;
        ATX_HEADER.captures(line).map(|caps| caps[1].len())
    }
}

impl FoldingRules for MarkdownHost {
    fn fold_widget(&self, session: &dyn EditSession, row: usize) -> FoldWidget {
        match self.header_level(session, row) {
            Some(_) => FoldWidget::Start,
            None => FoldWidget::None,
        }
    }

    fn fold_range(&self, session: &dyn EditSession, row: usize) -> Option<FoldRange> {
        let level = self.header_level(session, row)?;
        let count = session.line_count();
        let next_section = (row + 1..count)
            .find(|&r| self.header_level(session, r).is_some_and(|l| l <= level))
            .unwrap_or(count);

        // trailing blank lines stay visible
        let mut last = next_section.checked_sub(1)?;
        while last > row && session.line(last).is_some_and(|l| l.trim().is_empty()) {
            last -= 1;
        }
        if last <= row {
            return None;
        }
        let start_col = session.line(row)?.len();
        let end_col = session.line(last)?.len();
        Some(FoldRange::new(row, start_col, last, end_col))
    }
}

impl HostBehavior for MarkdownHost {
    fn language(&self) -> Language {
        Language::Markdown
    }

    fn next_line_indent(&self, state: &str, line: &str, _tab: &str) -> String {
        if state != self.list_state {
            return leading_indent(line).to_string();
        }
        let Some(caps) = LIST_MARKER.captures(line) else {
            return String::new();
        };
        let marker = match (caps.get(2), caps.get(3)) {
            (Some(bullet), _) => bullet.as_str().to_string(),
            (None, Some(number)) => {
                let n: u64 = number.as_str().parse().unwrap_or(0);
                format!("{}.", n + 1)
            }
            (None, None) => String::new(),
        };
        format!("{}{}{}", &caps[1], marker, &caps[4])
    }
}
