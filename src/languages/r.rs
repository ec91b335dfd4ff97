//! R
//!
//! States: `start`, `qqstring` and `qstring` (inside a double or single quoted string
//! that runs past the end of a line).

use crate::mode::error::ModeError;
use crate::mode::grammar::{rule, rule_to, Grammar, Language, StateTable};

pub const RULES: StateTable = &[
    (
        "start",
        &[
            rule(&["comment"], r"#.*$"),
            rule(&["string"], r#""(?:[^"\\]|\\.)*""#),
            rule_to(&["string"], r#""(?:[^"\\]|\\.)*\\?$"#, "qqstring"),
            rule(&["string"], r"'(?:[^'\\]|\\.)*'"),
            rule_to(&["string"], r"'(?:[^'\\]|\\.)*\\?$", "qstring"),
            rule(
                &["constant.numeric"],
                r"(?:0[xX][0-9a-fA-F]+|[0-9]+(?:\.[0-9]*)?(?:[eE][+-]?[0-9]+)?)[iL]?",
            ),
            rule(
                &["keyword"],
                r"\b(?:if|else|repeat|while|function|for|in|next|break|return)\b",
            ),
            rule(
                &["constant.language"],
                r"\b(?:TRUE|FALSE|NULL|NA|NA_integer_|NA_real_|NA_character_|Inf|NaN)\b",
            ),
            rule(&["identifier"], r"[a-zA-Z.][a-zA-Z0-9._]*"),
            rule(
                &["keyword.operator"],
                r"%[^%]*%|<<-|->>|<-|->|\|>|==|!=|<=|>=|&&|\|\||[-+*/^<>=!&|~$@:?]",
            ),
            rule(&["paren.keyword.operator"], r"[\[({]"),
            rule(&["paren.keyword.operator"], r"[\])}]"),
            rule(&["text"], r"\s+"),
        ],
    ),
    (
        "qqstring",
        &[
            rule_to(&["string"], r#"(?:[^"\\]|\\.)*""#, "start"),
            rule(&["string"], r".+"),
        ],
    ),
    (
        "qstring",
        &[
            rule_to(&["string"], r"(?:[^'\\]|\\.)*'", "start"),
            rule(&["string"], r".+"),
        ],
    ),
];

pub fn grammar() -> Result<Grammar, ModeError> {
    Grammar::compile("r", Language::R, RULES)
}
