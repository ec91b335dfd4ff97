//! Line Tokenizer
//!
//!     Scans one line against the rules of its entry state. At each position the rules
//!     are tried in declaration order and the first one whose match starts exactly at the
//!     cursor and is non-empty wins. Characters no rule claims become `text` tokens, so
//!     the concatenated token values always reproduce the line.
//!
//!     Patterns are matched against the whole line (not a suffix), so `^` and `$` keep
//!     their line meaning no matter where the cursor is.
//!
//! Lookahead
//!
//!     A search for one rule reports its next match anywhere ahead of the cursor. That
//!     answer is remembered per rule for the rest of the line and reused until the cursor
//!     moves past the remembered start; a rule with no match ahead is never searched
//!     again. Entries are kept per state, so leaving a state and coming back does not
//!     throw them away. Each rule therefore reads a line roughly once instead of once per
//!     cursor position.
//!
//! Empty Lines
//!
//!     Non-empty matches cannot describe a blank line, yet grammars such as Markdown leave
//!     a list on an empty line. On an empty line, the first rule with a transition whose
//!     pattern matches the empty string fires once.
//!
//! State
//!
//!     The exit state is the state after the last fired transition. Nothing else
//!     survives between calls: tokenizing the same line from the same state always gives
//!     the same result.

use crate::mode::embedding::{base_state, return_frame, RuleSet};
use crate::mode::grammar::{Rule, TokenType, Transition, DEFAULT_TOKEN, FRAME_SEPARATOR};
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

/// A classified slice of a line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Tokens of one line and the state the next line starts in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineTokens {
    pub tokens: Vec<Token>,
    pub state: String,
}

impl LineTokens {
    /// Concatenated token values
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.value.as_str()).collect()
    }
}

/// Tokenizer over a merged rule set
#[derive(Debug, Clone)]
pub struct Tokenizer {
    rules: RuleSet,
}

impl Tokenizer {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    pub fn initial_state(&self) -> &str {
        self.rules.initial_state()
    }

    /// Tokenize `line` starting in `state`.
    ///
    /// Unknown states are treated as the initial state.
    pub fn tokenize(&self, line: &str, state: &str) -> LineTokens {
        let (tokens, scanned) = self.scan(line, state);
        trace!(len = line.len(), scanned, state = %tokens.state, "tokenized line");
        tokens
    }

    /// Tokenize and report how many bytes the rule searches covered
    fn scan(&self, line: &str, state: &str) -> (LineTokens, usize) {
        let mut current = if self.rules.contains(state) {
            state.to_string()
        } else {
            self.rules.initial_state().to_string()
        };
        let mut sink = TokenSink::default();

        if line.is_empty() {
            if let Some(rule) = self.empty_line_rule(&current) {
                if let Some(next) = rule.next() {
                    current = self.transition(&current, next);
                }
            }
            let tokens = LineTokens {
                tokens: sink.finish(),
                state: current,
            };
            return (tokens, 0);
        }

        let mut lookahead = Lookahead::new(line);
        let mut pos = 0;
        while pos < line.len() {
            let rules = self.rules.rules(&current).unwrap_or(&[]);
            match lookahead.match_at(base_state(&current), rules, pos) {
                Some((index, end)) => {
                    let rule = &rules[index];
                    emit(&mut sink, rule, line, pos, end);
                    pos = end;
                    if let Some(next) = rule.next() {
                        current = self.transition(&current, next);
                    }
                }
                None => {
                    let width = line[pos..].chars().next().map_or(1, char::len_utf8);
                    sink.push(DEFAULT_TOKEN, &line[pos..pos + width]);
                    pos += width;
                }
            }
        }

        let tokens = LineTokens {
            tokens: sink.finish(),
            state: current,
        };
        (tokens, lookahead.scanned)
    }

    fn empty_line_rule(&self, state: &str) -> Option<&Rule> {
        self.rules
            .rules(state)?
            .iter()
            .find(|r| r.next().is_some() && r.regex().is_match(""))
    }

    fn transition(&self, current: &str, next: &Transition) -> String {
        let target = match next {
            Transition::Goto(target) if target.contains(FRAME_SEPARATOR) => target.clone(),
            Transition::Goto(target) => match return_frame(current) {
                Some(frame) => format!("{}{}{}", target, FRAME_SEPARATOR, frame),
                None => target.clone(),
            },
            Transition::Exit => return_frame(current)
                .unwrap_or(self.rules.initial_state())
                .to_string(),
        };
        if base_state(&target) != base_state(current) {
            trace!(from = current, to = %target, "state transition");
        }
        target
    }
}

#[derive(Debug, Clone, Copy)]
enum Next {
    Unknown,
    At(usize, usize),
    Never,
}

/// Per-line memory of where each rule matches next
struct Lookahead<'a> {
    line: &'a str,
    states: HashMap<String, Vec<Next>>,
    scanned: usize,
}

impl<'a> Lookahead<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            line,
            states: HashMap::new(),
            scanned: 0,
        }
    }

    /// Index and end of the first rule with a non-empty match starting exactly at `pos`
    fn match_at(&mut self, state: &str, rules: &[Rule], pos: usize) -> Option<(usize, usize)> {
        if !self.states.contains_key(state) {
            self.states.insert(state.to_string(), vec![Next::Unknown; rules.len()]);
        }
        let slots = self.states.get_mut(state)?;
        for (index, (rule, slot)) in rules.iter().zip(slots.iter_mut()).enumerate() {
            let stale = match *slot {
                Next::Unknown => true,
                Next::At(start, _) => start < pos,
                Next::Never => false,
            };
            if stale {
                *slot = match rule.regex().find_at(self.line, pos) {
                    Some(m) => {
                        self.scanned += m.end() - pos;
                        Next::At(m.start(), m.end())
                    }
                    None => {
                        self.scanned += self.line.len() - pos;
                        Next::Never
                    }
                };
            }
            if let Next::At(start, end) = *slot {
                if start == pos && end > pos {
                    return Some((index, end));
                }
            }
        }
        None
    }
}

fn emit(sink: &mut TokenSink, rule: &Rule, line: &str, start: usize, end: usize) {
    match rule.token() {
        TokenType::Single(kind) => sink.push(kind, &line[start..end]),
        TokenType::Groups(kinds) => {
            let mut cursor = start;
            if let Some(caps) = rule.regex().captures_at(line, start) {
                for (group, kind) in caps.iter().skip(1).zip(kinds) {
                    let Some(group) = group else { continue };
                    // nested or out-of-order groups would duplicate text
                    if group.start() < cursor || group.end() > end || group.is_empty() {
                        continue;
                    }
                    if group.start() > cursor {
                        sink.push(DEFAULT_TOKEN, &line[cursor..group.start()]);
                    }
                    sink.push(kind, group.as_str());
                    cursor = group.end();
                }
            }
            if cursor < end {
                sink.push(DEFAULT_TOKEN, &line[cursor..end]);
            }
        }
    }
}

/// Collects tokens, merging neighbours of the same type
#[derive(Default)]
struct TokenSink {
    tokens: Vec<Token>,
}

impl TokenSink {
    fn push(&mut self, kind: &str, value: &str) {
        match self.tokens.last_mut() {
            Some(last) if last.kind == kind => last.value.push_str(value),
            _ => self.tokens.push(Token {
                kind: kind.to_string(),
                value: value.to_string(),
            }),
        }
    }

    fn finish(self) -> Vec<Token> {
        self.tokens
    }
}
