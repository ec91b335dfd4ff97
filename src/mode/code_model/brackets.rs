//! Bracket-depth code model for R and C++
//!
//!     A per-line logos lexer separates brackets from strings and comments, so a `{`
//!     inside `"..."` or after `#` does not count. Indentation and folding are both
//!     driven by the number of brackets left open at the end of a line.
//!
//!     Chunk header lines fold the whole chunk; the model is handed the same
//!     [ChunkPatterns] the rule set was embedded with.

use crate::mode::chunks::ChunkPatterns;
use crate::mode::code_model::{CodeModel, FoldRange, FoldWidget, FoldingRules};
use crate::mode::host::leading_indent;
use crate::mode::session::EditSession;
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;

static R_BRACELESS_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:(?:if|while|for|function)\s*\(.*\)|else|repeat)\s*$").unwrap()
});

static CPP_BRACELESS_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:(?:if|while|for)\s*\(.*\)|else|do)\s*$").unwrap());

/// Which lexer and block rules a [BracketCodeModel] uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    R,
    Cpp,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f\r]+")]
enum RLexeme {
    #[token("{")]
    #[token("(")]
    #[token("[")]
    Open,
    #[token("}")]
    #[token(")")]
    #[token("]")]
    Close,
    #[token(",")]
    Comma,
    #[regex(r#""([^"\\]|\\.)*"?"#)]
    #[regex(r#"'([^'\\]|\\.)*'?"#)]
    #[regex(r"`[^`]*`?")]
    Quoted,
    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"%[^%\n]*%")]
    #[regex(r"<<-|->>|<-|->|\|>|==|!=|<=|>=|&&|\|\|")]
    #[regex(r"[-+*/^&|~=<>!$@:?]")]
    Operator,
    #[regex(r"[A-Za-z0-9_.]+")]
    Word,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\f\r]+")]
enum CppLexeme {
    #[token("{")]
    #[token("(")]
    #[token("[")]
    Open,
    #[token("}")]
    #[token(")")]
    #[token("]")]
    Close,
    #[token(",")]
    Comma,
    #[regex(r#""([^"\\]|\\.)*"?"#)]
    #[regex(r#"'([^'\\]|\\.)*'?"#)]
    Quoted,
    #[regex(r"//[^\n]*")]
    #[regex(r"#[^\n]*")]
    Comment,
    #[regex(r"[-+*/%=<>!&|^~?:.;]")]
    Operator,
    #[regex(r"[A-Za-z0-9_]+")]
    Word,
}

/// Flavor-independent view of a lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    Open,
    Close,
    Comma,
    Operator,
    Other,
}

/// Significant lexemes of a line with their byte offsets; comments are dropped
fn lexemes(flavor: Flavor, line: &str) -> Vec<(Lexeme, usize)> {
    match flavor {
        Flavor::R => RLexeme::lexer(line)
            .spanned()
            .filter_map(|(tok, span)| {
                let lexeme = match tok {
                    Ok(RLexeme::Comment) => return None,
                    Ok(RLexeme::Open) => Lexeme::Open,
                    Ok(RLexeme::Close) => Lexeme::Close,
                    Ok(RLexeme::Comma) => Lexeme::Comma,
                    Ok(RLexeme::Operator) => Lexeme::Operator,
                    Ok(RLexeme::Quoted | RLexeme::Word) | Err(_) => Lexeme::Other,
                };
                Some((lexeme, span.start))
            })
            .collect(),
        Flavor::Cpp => CppLexeme::lexer(line)
            .spanned()
            .filter_map(|(tok, span)| {
                let lexeme = match tok {
                    Ok(CppLexeme::Comment) => return None,
                    Ok(CppLexeme::Open) => Lexeme::Open,
                    Ok(CppLexeme::Close) => Lexeme::Close,
                    Ok(CppLexeme::Comma) => Lexeme::Comma,
                    Ok(CppLexeme::Operator) => Lexeme::Operator,
                    Ok(CppLexeme::Quoted | CppLexeme::Word) | Err(_) => Lexeme::Other,
                };
                Some((lexeme, span.start))
            })
            .collect(),
    }
}

/// Brackets still open at the end of a line, ignoring closers of earlier lines
fn unclosed(lexemes: &[(Lexeme, usize)]) -> usize {
    lexemes.iter().fold(0usize, |depth, (lexeme, _)| match lexeme {
        Lexeme::Open => depth + 1,
        Lexeme::Close => depth.saturating_sub(1),
        _ => depth,
    })
}

/// Indentation and folding driven by bracket depth
#[derive(Debug, Clone)]
pub struct BracketCodeModel {
    flavor: Flavor,
    chunks: ChunkPatterns,
}

impl BracketCodeModel {
    pub fn new(flavor: Flavor, chunks: ChunkPatterns) -> Self {
        Self { flavor, chunks }
    }

    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    fn opens_braceless_block(&self, line: &str) -> bool {
        match self.flavor {
            Flavor::R => R_BRACELESS_BLOCK.is_match(line),
            Flavor::Cpp => CPP_BRACELESS_BLOCK.is_match(line),
        }
    }

    fn chunk_range(&self, session: &dyn EditSession, row: usize) -> Option<FoldRange> {
        let count = session.line_count();
        let last = (row + 1..count)
            .find(|&r| session.line(r).is_some_and(|l| self.chunks.is_end(l)))
            .map(|end| end - 1)
            .unwrap_or(count.saturating_sub(1));
        if last <= row {
            return None;
        }
        let start_col = session.line(row)?.len();
        let end_col = session.line(last)?.len();
        Some(FoldRange::new(row, start_col, last, end_col))
    }

    fn bracket_range(&self, session: &dyn EditSession, row: usize) -> Option<FoldRange> {
        let line = session.line(row)?;
        let mut depth = unclosed(&lexemes(self.flavor, line));
        if depth == 0 {
            return None;
        }

        for current in row + 1..session.line_count() {
            let text = session.line(current)?;
            if self.chunks.is_end(text) {
                return None;
            }
            for (lexeme, column) in lexemes(self.flavor, text) {
                match lexeme {
                    Lexeme::Open => depth += 1,
                    Lexeme::Close => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(FoldRange::new(row, line.len(), current, column));
                        }
                    }
                    _ => {}
                }
            }
        }
        None
    }
}

impl FoldingRules for BracketCodeModel {
    fn fold_widget(&self, session: &dyn EditSession, row: usize) -> FoldWidget {
        let Some(line) = session.line(row) else {
            return FoldWidget::None;
        };
        if self.chunks.is_start(line) {
            FoldWidget::Start
        } else if self.chunks.is_end(line) {
            FoldWidget::End
        } else if unclosed(&lexemes(self.flavor, line)) > 0 {
            FoldWidget::Start
        } else {
            FoldWidget::None
        }
    }

    fn fold_range(&self, session: &dyn EditSession, row: usize) -> Option<FoldRange> {
        let line = session.line(row)?;
        if self.chunks.is_start(line) {
            self.chunk_range(session, row)
        } else {
            self.bracket_range(session, row)
        }
    }
}

impl CodeModel for BracketCodeModel {
    fn next_line_indent(&self, _state: &str, line: &str, tab: &str, _row: usize) -> String {
        let indent = leading_indent(line);
        if self.chunks.is_start(line) || self.chunks.is_end(line) {
            return indent.to_string();
        }

        let lexemes = lexemes(self.flavor, line);
        let continues = match self.flavor {
            // a trailing infix operator continues the expression
            Flavor::R => matches!(lexemes.last(), Some((Lexeme::Operator, _))),
            Flavor::Cpp => false,
        };
        if unclosed(&lexemes) > 0 || continues || self.opens_braceless_block(line) {
            format!("{}{}", indent, tab)
        } else {
            indent.to_string()
        }
    }
}
