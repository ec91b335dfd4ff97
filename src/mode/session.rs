//! Edit session interface
//!
//! The controller only reads line text and per-line states through [EditSession]; line
//! storage, undo and event wiring belong to the editor. [Document] is a small in-memory
//! session used by the CLI and the tests.

use crate::mode::tokenizer::{LineTokens, Tokenizer};
use serde::Serialize;

/// A row/column position in a document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// The part of an editor session the mode engine consumes
pub trait EditSession {
    fn line(&self, row: usize) -> Option<&str>;

    /// Exit state of `row`, if it has been tokenized
    fn state(&self, row: usize) -> Option<&str>;

    fn set_state(&mut self, row: usize, state: String);

    fn line_count(&self) -> usize;

    fn cursor(&self) -> Position;
}

/// In-memory document with per-line states
#[derive(Debug, Clone, Default)]
pub struct Document {
    lines: Vec<String>,
    states: Vec<Option<String>>,
    cursor: Position,
}

impl Document {
    /// Split `text` on `\n`; a trailing newline yields a final empty line, and `\r`
    /// before a newline is dropped.
    pub fn from_text(text: &str) -> Self {
        let lines: Vec<String> = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        let states = vec![None; lines.len()];
        Self {
            lines,
            states,
            cursor: Position::default(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn set_cursor(&mut self, position: Position) {
        self.cursor = position;
    }

    /// Entry state of `row`: the previous row's exit state, or the initial state.
    pub fn entry_state(&self, row: usize, tokenizer: &Tokenizer) -> String {
        row.checked_sub(1)
            .and_then(|prev| self.states.get(prev).cloned().flatten())
            .unwrap_or_else(|| tokenizer.initial_state().to_string())
    }

    /// Tokenize every row from scratch, storing exit states.
    pub fn tokenize_all(&mut self, tokenizer: &Tokenizer) -> Vec<LineTokens> {
        let mut out = Vec::with_capacity(self.lines.len());
        let mut state = tokenizer.initial_state().to_string();
        for (row, line) in self.lines.iter().enumerate() {
            let tokens = tokenizer.tokenize(line, &state);
            state = tokens.state.clone();
            self.states[row] = Some(tokens.state.clone());
            out.push(tokens);
        }
        out
    }

    /// Re-tokenize from `row` downward until an exit state comes out unchanged and every
    /// later row already has a state. Returns the number of rows tokenized.
    pub fn retokenize_from(&mut self, tokenizer: &Tokenizer, row: usize) -> usize {
        let mut processed = 0;
        for current in row..self.lines.len() {
            let entry = self.entry_state(current, tokenizer);
            let out = tokenizer.tokenize(&self.lines[current], &entry);
            processed += 1;

            let unchanged = self.states[current].as_deref() == Some(out.state.as_str());
            self.states[current] = Some(out.state);
            if unchanged && self.states[current + 1..].iter().all(Option::is_some) {
                break;
            }
        }
        processed
    }

    /// Replace a line's text. Its state is kept until the caller re-tokenizes.
    pub fn replace_line(&mut self, row: usize, text: &str) {
        if let Some(line) = self.lines.get_mut(row) {
            *line = text.to_string();
        }
    }

    /// Insert a line before `row` (or append when `row` is past the end).
    pub fn insert_line(&mut self, row: usize, text: &str) {
        let row = row.min(self.lines.len());
        self.lines.insert(row, text.to_string());
        self.states.insert(row, None);
    }

    /// Remove a line; later rows keep their states until re-tokenized.
    pub fn remove_line(&mut self, row: usize) -> Option<String> {
        if row >= self.lines.len() {
            return None;
        }
        self.states.remove(row);
        Some(self.lines.remove(row))
    }

    pub fn states(&self) -> impl Iterator<Item = Option<&str>> {
        self.states.iter().map(|s| s.as_deref())
    }
}

impl EditSession for Document {
    fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|l| l.as_str())
    }

    fn state(&self, row: usize) -> Option<&str> {
        self.states.get(row).and_then(|s| s.as_deref())
    }

    fn set_state(&mut self, row: usize, state: String) {
        if let Some(slot) = self.states.get_mut(row) {
            *slot = Some(state);
        }
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn cursor(&self) -> Position {
        self.cursor
    }
}
