//! Chunk boundaries, insertion templates and background highlighting
//!
//! [ChunkPatterns] holds the compiled start and end patterns of every embedding in a
//! rule set. The controller builds them from [RuleSet::embeddings](crate::mode::RuleSet)
//! and hands the same regexes to the code models and the [ChunkHighlighter], so the
//! highlighter and the tokenizer cannot disagree about chunk extents.

use crate::mode::embedding::Embedding;
use crate::mode::error::ModeError;
use crate::mode::session::{EditSession, Position};
use regex::Regex;
use serde::Serialize;

/// Start and end line patterns of guest chunks
#[derive(Debug, Clone, Default)]
pub struct ChunkPatterns {
    starts: Vec<Regex>,
    ends: Vec<Regex>,
}

impl ChunkPatterns {
    /// Patterns for a single kind of chunk
    pub fn new(start: &str, end: &str) -> Result<Self, ModeError> {
        let start_re = Regex::new(start).map_err(|e| ModeError::invalid_pattern(start, e))?;
        let end_re = Regex::new(end).map_err(|e| ModeError::invalid_pattern(end, e))?;
        Ok(Self {
            starts: vec![start_re],
            ends: vec![end_re],
        })
    }

    /// The boundary regexes the embeddings were built with, shared rather than recompiled
    pub fn from_embeddings(embeddings: &[Embedding]) -> Self {
        let mut patterns = Self::default();
        for embedding in embeddings {
            push_unique(&mut patterns.starts, embedding.start_pattern());
            push_unique(&mut patterns.ends, embedding.end_pattern());
        }
        patterns
    }

    pub fn start_patterns(&self) -> impl Iterator<Item = &str> {
        self.starts.iter().map(Regex::as_str)
    }

    pub fn end_patterns(&self) -> impl Iterator<Item = &str> {
        self.ends.iter().map(Regex::as_str)
    }

    pub fn is_start(&self, line: &str) -> bool {
        self.starts.iter().any(|re| re.is_match(line))
    }

    pub fn is_end(&self, line: &str) -> bool {
        self.ends.iter().any(|re| re.is_match(line))
    }
}

fn push_unique(list: &mut Vec<Regex>, regex: &Regex) {
    if !list.iter().any(|r| r.as_str() == regex.as_str()) {
        list.push(regex.clone());
    }
}

/// Text inserted by "insert chunk", with the caret placed at `position` relative to the
/// insertion point
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertChunkInfo {
    pub value: String,
    pub position: Position,
}

impl InsertChunkInfo {
    pub fn new(value: &str, row: usize, column: usize) -> Self {
        Self {
            value: value.to_string(),
            position: Position::new(row, column),
        }
    }
}

/// Rows of one chunk, boundaries included
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChunkSpan {
    pub start_row: usize,
    pub end_row: usize,
    /// False when the document ended before an end marker
    pub terminated: bool,
}

/// Decoration-only pass marking rows that belong to a chunk
#[derive(Debug, Clone)]
pub struct ChunkHighlighter {
    patterns: ChunkPatterns,
    mark_delimiters: bool,
}

impl ChunkHighlighter {
    /// `mark_delimiters` decides whether the start and end lines are marked too
    pub fn new(patterns: ChunkPatterns, mark_delimiters: bool) -> Self {
        Self {
            patterns,
            mark_delimiters,
        }
    }

    pub fn patterns(&self) -> &ChunkPatterns {
        &self.patterns
    }

    /// Chunks in document order. A start line inside an open chunk is ignored.
    pub fn chunk_spans(&self, session: &dyn EditSession) -> Vec<ChunkSpan> {
        let mut spans = Vec::new();
        let mut open: Option<usize> = None;
        for row in 0..session.line_count() {
            let Some(line) = session.line(row) else {
                continue;
            };
            match open {
                None if self.patterns.is_start(line) => open = Some(row),
                Some(start_row) if self.patterns.is_end(line) => {
                    spans.push(ChunkSpan {
                        start_row,
                        end_row: row,
                        terminated: true,
                    });
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start_row) = open {
            spans.push(ChunkSpan {
                start_row,
                end_row: session.line_count().saturating_sub(1),
                terminated: false,
            });
        }
        spans
    }

    /// One flag per row: true when the row gets the chunk background
    pub fn highlight(&self, session: &dyn EditSession) -> Vec<bool> {
        let mut marks = vec![false; session.line_count()];
        for span in self.chunk_spans(session) {
            for (row, mark) in marks
                .iter_mut()
                .enumerate()
                .take(span.end_row + 1)
                .skip(span.start_row)
            {
                let is_delimiter =
                    row == span.start_row || (span.terminated && row == span.end_row);
                *mark = self.mark_delimiters || !is_delimiter;
            }
        }
        marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::session::Document;

    fn highlighter(mark_delimiters: bool) -> ChunkHighlighter {
        let patterns = ChunkPatterns::new(r"^```\{r.*\}\s*$", r"^```\s*$").unwrap();
        ChunkHighlighter::new(patterns, mark_delimiters)
    }

    #[test]
    fn test_spans() {
        let doc = Document::from_text("a\n```{r}\nx\n```\nb\n```{r}\ny");
        let spans = highlighter(true).chunk_spans(&doc);
        assert_eq!(
            spans,
            vec![
                ChunkSpan {
                    start_row: 1,
                    end_row: 3,
                    terminated: true
                },
                ChunkSpan {
                    start_row: 5,
                    end_row: 6,
                    terminated: false
                },
            ]
        );
    }

    #[test]
    fn test_highlight_with_and_without_delimiters() {
        let doc = Document::from_text("a\n```{r}\nx\n```\nb");
        assert_eq!(
            highlighter(true).highlight(&doc),
            vec![false, true, true, true, false]
        );
        assert_eq!(
            highlighter(false).highlight(&doc),
            vec![false, false, true, false, false]
        );
    }

    #[test]
    fn test_nested_start_is_ignored() {
        let doc = Document::from_text("```{r}\n```{r}\n```\nafter");
        let spans = highlighter(true).chunk_spans(&doc);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].end_row, 2);
    }

    #[test]
    fn test_patterns_from_embeddings() {
        use crate::mode::embedding::RuleSet;
        use crate::mode::grammar::{rule, Grammar, Language, StateTable};

        const TABLE: StateTable = &[("start", &[rule(&["word"], r"\w+")])];
        let host = Grammar::compile("host", Language::Html, TABLE).unwrap();
        let guest = Grammar::compile("guest", Language::R, TABLE).unwrap();
        let set = RuleSet::new(&host)
            .embed(&guest, "r-", "^<<r$", "^>>$")
            .unwrap()
            .embed(&guest, "r-cpp-", "^<<cpp$", "^>>$")
            .unwrap();

        let patterns = ChunkPatterns::from_embeddings(set.embeddings());
        assert_eq!(
            patterns.start_patterns().collect::<Vec<_>>(),
            vec!["^<<r$", "^<<cpp$"]
        );
        assert_eq!(patterns.end_patterns().collect::<Vec<_>>(), vec!["^>>$"]);
        assert!(patterns.is_start("<<cpp"));
        assert!(!patterns.is_start("<<py"));
    }

    #[test]
    fn test_no_embeddings_matches_nothing() {
        let patterns = ChunkPatterns::from_embeddings(&[]);
        assert!(!patterns.is_start(""));
        assert!(!patterns.is_end("anything"));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(ChunkPatterns::new("(", "x").is_err());
    }
}
