//! C++
//!
//! States: `start` and `comment` (inside a block comment spanning lines).

use crate::mode::error::ModeError;
use crate::mode::grammar::{rule, rule_to, Grammar, Language, StateTable};

pub const RULES: StateTable = &[
    (
        "start",
        &[
            rule(&["comment"], r"//.*$"),
            rule(&["comment"], r"/\*.*?\*/"),
            rule_to(&["comment"], r"/\*", "comment"),
            rule(&["string"], r#""(?:[^"\\]|\\.)*""#),
            rule(&["string"], r"'(?:[^'\\]|\\.)*'"),
            rule(&["keyword.other"], r"^\s*#\s*[a-zA-Z]+"),
            rule(
                &["constant.numeric"],
                r"(?:0[xX][0-9a-fA-F]+|[0-9]+(?:\.[0-9]*)?(?:[eE][+-]?[0-9]+)?)[uUlLfF]*",
            ),
            rule(
                &["keyword.control"],
                r"\b(?:if|else|for|while|do|switch|case|default|break|continue|return|goto|try|catch|throw)\b",
            ),
            rule(
                &["storage.type"],
                r"\b(?:int|long|short|char|bool|float|double|void|unsigned|signed|auto|const|static|inline|struct|class|enum|union|namespace|template|typename|using|public|private|protected|virtual)\b",
            ),
            rule(
                &["constant.language"],
                r"\b(?:true|false|nullptr|NULL|this)\b",
            ),
            rule(&["identifier"], r"[a-zA-Z_][a-zA-Z0-9_]*"),
            rule(
                &["keyword.operator"],
                r"::|->|\+\+|--|<<|>>|&&|\|\||[-+*/%=<>!&|^~?:.]",
            ),
            rule(&["punctuation.operator"], r"[,;]"),
            rule(&["paren.lparen"], r"[\[({]"),
            rule(&["paren.rparen"], r"[\])}]"),
            rule(&["text"], r"\s+"),
        ],
    ),
    (
        "comment",
        &[
            rule_to(&["comment"], r".*?\*/", "start"),
            rule(&["comment"], r".+"),
        ],
    ),
];

pub fn grammar() -> Result<Grammar, ModeError> {
    Grammar::compile("cpp", Language::Cpp, RULES)
}
