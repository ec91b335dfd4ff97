//! Markdown
//!
//! States: `start`, `listblock` (after a list marker, until a blank line or header) and
//! `codeblock` (inside a plain fenced block).

use crate::mode::error::ModeError;
use crate::mode::grammar::{rule, rule_to, Grammar, Language, StateTable};

/// State lines of a list are tokenized in
pub const LIST_STATE: &str = "listblock";

pub const RULES: StateTable = &[
    (
        "start",
        &[
            rule(
                &["markup.heading.marker", "markup.heading"],
                r"^(#{1,6})(\s.*)?$",
            ),
            rule_to(&["support.function"], r"^\s*`{3,}.*$", "codeblock"),
            rule_to(&["markup.list"], r"^\s*(?:[-+*]|\d+\.)\s+", "listblock"),
            rule(&["markup.heading"], r"^(?:=+|-+)\s*$"),
            rule(&["string.blockquote"], r"^\s*>.*$"),
            rule(&["support.function"], r"`[^`]+`"),
            rule(&["string.strong"], r"\*\*[^*]+\*\*|__[^_]+__"),
            rule(&["string.emphasis"], r"\*[^*\s][^*]*\*|_[^_\s][^_]*_"),
            rule(&["markup.underline"], r"\[[^\]]*\]\([^)]*\)"),
            rule(&["text"], r"[^`*_\[]+"),
        ],
    ),
    (
        "listblock",
        &[
            rule_to(&["text"], r"^\s*$", "start"),
            rule_to(
                &["markup.heading.marker", "markup.heading"],
                r"^(#{1,6})(\s.*)?$",
                "start",
            ),
            rule(&["markup.list"], r"^\s*(?:[-+*]|\d+\.)\s+"),
            rule_to(&["support.function"], r"^\s*`{3,}.*$", "codeblock"),
            rule(&["support.function"], r"`[^`]+`"),
            rule(&["string.strong"], r"\*\*[^*]+\*\*|__[^_]+__"),
            rule(&["string.emphasis"], r"\*[^*\s][^*]*\*|_[^_\s][^_]*_"),
            rule(&["markup.underline"], r"\[[^\]]*\]\([^)]*\)"),
            rule(&["text"], r"[^`*_\[]+"),
        ],
    ),
    (
        "codeblock",
        &[
            rule_to(&["support.function"], r"^\s*`{3,}\s*$", "start"),
            rule(&["support.function"], r".+"),
        ],
    ),
];

pub fn grammar() -> Result<Grammar, ModeError> {
    Grammar::compile("markdown", Language::Markdown, RULES)
}
