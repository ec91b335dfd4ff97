//! Error types for mode construction
//!
//! Lexing itself never fails. Every variant here is raised while grammars are compiled or
//! merged, before the first line is tokenized.

use std::fmt;

/// Errors raised while building grammars, rule sets and controllers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// A rule or chunk pattern is not a valid regular expression
    InvalidPattern { pattern: String, message: String },
    /// A grammar has no state named after its initial state
    MissingInitialState { grammar: String, state: String },
    /// A rule transitions into a state its grammar does not define
    UnknownState { grammar: String, state: String },
    /// A group-typed rule names a different number of types than its pattern has groups
    GroupCountMismatch {
        pattern: String,
        groups: usize,
        types: usize,
    },
    /// A state name or prefix contains the return frame separator
    ReservedCharacter { name: String },
    /// An embedding prefix is empty
    EmptyPrefix,
    /// An embedding prefix is already registered
    DuplicatePrefix(String),
    /// A host state name starts with an embedding prefix
    PrefixShadowsHostState { prefix: String, state: String },
    /// A guest state would be classified under another embedding's prefix
    PrefixCollision {
        prefix: String,
        state: String,
        claimed_by: String,
    },
    /// A code model was registered for a prefix no grammar is embedded under
    UnknownPrefix(String),
    /// A mode name that no bundled mode answers to
    UnknownMode(String),
}

impl fmt::Display for ModeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeError::InvalidPattern { pattern, message } => {
                write!(f, "Invalid pattern '{}': {}", pattern, message)
            }
            ModeError::MissingInitialState { grammar, state } => {
                write!(f, "Grammar '{}' has no initial state '{}'", grammar, state)
            }
            ModeError::UnknownState { grammar, state } => {
                write!(
                    f,
                    "Grammar '{}' transitions into undefined state '{}'",
                    grammar, state
                )
            }
            ModeError::GroupCountMismatch {
                pattern,
                groups,
                types,
            } => write!(
                f,
                "Pattern '{}' has {} capture groups but {} token types",
                pattern, groups, types
            ),
            ModeError::ReservedCharacter { name } => {
                write!(f, "Name '{}' contains the reserved character '@'", name)
            }
            ModeError::EmptyPrefix => write!(f, "Embedding prefix must not be empty"),
            ModeError::DuplicatePrefix(prefix) => {
                write!(f, "Embedding prefix '{}' is already registered", prefix)
            }
            ModeError::PrefixShadowsHostState { prefix, state } => write!(
                f,
                "Embedding prefix '{}' collides with host state '{}'",
                prefix, state
            ),
            ModeError::PrefixCollision {
                prefix,
                state,
                claimed_by,
            } => write!(
                f,
                "State '{}' embedded under '{}' would be classified under '{}'",
                state, prefix, claimed_by
            ),
            ModeError::UnknownPrefix(prefix) => {
                write!(f, "No grammar is embedded under prefix '{}'", prefix)
            }
            ModeError::UnknownMode(name) => write!(f, "Unknown mode '{}'", name),
        }
    }
}

impl std::error::Error for ModeError {}

impl ModeError {
    pub(crate) fn invalid_pattern(pattern: &str, err: regex::Error) -> Self {
        ModeError::InvalidPattern {
            pattern: pattern.to_string(),
            message: err.to_string(),
        }
    }
}
