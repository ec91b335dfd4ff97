//! Grammar Rule Tables
//!
//!     A grammar maps state names to ordered rule lists. Rules are tried in declaration
//!     order at each scan position, so more specific patterns must come first. Grammars
//!     are written as const tables of [RuleDef] and compiled once with [Grammar::compile];
//!     after that they are immutable.
//!
//! Token Types
//!
//!     A rule either classifies its whole match with one type, or names one type per
//!     capture group. Group-typed patterns should use top-level, non-nested groups; any
//!     text a group does not cover is still emitted (as `text`).

use crate::mode::error::ModeError;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Token type for input no rule matched
pub const DEFAULT_TOKEN: &str = "text";

/// Name of the state every grammar starts in
pub const START_STATE: &str = "start";

/// Separates a guest state from the host state it returns to
pub const FRAME_SEPARATOR: char = '@';

/// Language a grammar (and therefore a state) belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Language {
    Markdown,
    Html,
    R,
    Cpp,
    Text,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Markdown => "Markdown",
            Language::Html => "HTML",
            Language::R => "R",
            Language::Cpp => "C_CPP",
            Language::Text => "Text",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rule classifies its match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    Single(String),
    Groups(Vec<String>),
}

/// State change fired after a rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Continue in the named state
    Goto(String),
    /// Leave the current chunk, returning to the host state it was entered from
    Exit,
}

/// Const-friendly rule description, compiled into a [Rule]
#[derive(Debug, Clone, Copy)]
pub struct RuleDef {
    pub tokens: &'static [&'static str],
    pub pattern: &'static str,
    pub next: Option<&'static str>,
}

/// A rule without a transition
pub const fn rule(tokens: &'static [&'static str], pattern: &'static str) -> RuleDef {
    RuleDef {
        tokens,
        pattern,
        next: None,
    }
}

/// A rule that moves to `next` after matching
pub const fn rule_to(
    tokens: &'static [&'static str],
    pattern: &'static str,
    next: &'static str,
) -> RuleDef {
    RuleDef {
        tokens,
        pattern,
        next: Some(next),
    }
}

/// A state table as written in the language modules
pub type StateTable = &'static [(&'static str, &'static [RuleDef])];

/// A compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    regex: Regex,
    token: TokenType,
    next: Option<Transition>,
}

impl Rule {
    pub fn new(
        pattern: &str,
        token: TokenType,
        next: Option<Transition>,
    ) -> Result<Self, ModeError> {
        let regex = Regex::new(pattern).map_err(|e| ModeError::invalid_pattern(pattern, e))?;

        if let TokenType::Groups(types) = &token {
            // captures_len counts the implicit whole-match group
            let groups = regex.captures_len() - 1;
            if groups != types.len() {
                return Err(ModeError::GroupCountMismatch {
                    pattern: pattern.to_string(),
                    groups,
                    types: types.len(),
                });
            }
        }

        Ok(Self { regex, token, next })
    }

    fn from_def(def: &RuleDef) -> Result<Self, ModeError> {
        let token = match def.tokens {
            [single] => TokenType::Single(single.to_string()),
            many => TokenType::Groups(many.iter().map(|t| t.to_string()).collect()),
        };
        let next = def.next.map(|s| Transition::Goto(s.to_string()));
        Self::new(def.pattern, token, next)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn token(&self) -> &TokenType {
        &self.token
    }

    pub fn next(&self) -> Option<&Transition> {
        self.next.as_ref()
    }

    pub(crate) fn regex(&self) -> &Regex {
        &self.regex
    }

    pub(crate) fn with_next(mut self, next: Option<Transition>) -> Self {
        self.next = next;
        self
    }
}

/// A named, immutable rule table for one language
#[derive(Debug, Clone)]
pub struct Grammar {
    name: String,
    language: Language,
    initial: String,
    states: BTreeMap<String, Vec<Rule>>,
}

impl Grammar {
    /// Compile a const state table.
    ///
    /// Fails on invalid patterns, on state names containing the frame separator, on a
    /// missing `start` state and on transitions into undefined states.
    pub fn compile(name: &str, language: Language, table: StateTable) -> Result<Self, ModeError> {
        let mut states = BTreeMap::new();
        for (state, defs) in table {
            if state.contains(FRAME_SEPARATOR) {
                return Err(ModeError::ReservedCharacter {
                    name: state.to_string(),
                });
            }
            let rules = defs
                .iter()
                .map(Rule::from_def)
                .collect::<Result<Vec<_>, _>>()?;
            states.insert(state.to_string(), rules);
        }

        let grammar = Self {
            name: name.to_string(),
            language,
            initial: START_STATE.to_string(),
            states,
        };
        grammar.validate()?;
        Ok(grammar)
    }

    fn validate(&self) -> Result<(), ModeError> {
        if !self.states.contains_key(&self.initial) {
            return Err(ModeError::MissingInitialState {
                grammar: self.name.clone(),
                state: self.initial.clone(),
            });
        }

        for rules in self.states.values() {
            for rule in rules {
                if let Some(Transition::Goto(target)) = rule.next() {
                    if !self.states.contains_key(target) {
                        return Err(ModeError::UnknownState {
                            grammar: self.name.clone(),
                            state: target.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn initial_state(&self) -> &str {
        &self.initial
    }

    pub fn rules(&self, state: &str) -> Option<&[Rule]> {
        self.states.get(state).map(|r| r.as_slice())
    }

    /// States in name order
    pub fn states(&self) -> impl Iterator<Item = (&str, &[Rule])> {
        self.states.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(|k| k.as_str())
    }
}
