//! HTML
//!
//! States: `start`, `tag` (between a tag name and its closing `>`) and `comment`.

use crate::mode::error::ModeError;
use crate::mode::grammar::{rule, rule_to, Grammar, Language, StateTable};

pub const RULES: StateTable = &[
    (
        "start",
        &[
            rule_to(&["comment"], r"<!--", "comment"),
            rule(&["meta.tag.doctype"], r"(?i)<!doctype[^>]*>"),
            rule_to(
                &["meta.tag.punctuation.tag-open", "entity.name.tag"],
                r"(</?)([-_a-zA-Z0-9:.]+)",
                "tag",
            ),
            rule(&["constant.character.entity"], r"&#?[a-zA-Z0-9]+;"),
            rule(&["text"], r"[^<&]+"),
        ],
    ),
    (
        "tag",
        &[
            rule_to(&["meta.tag.punctuation.tag-close"], r"/?>", "start"),
            rule(&["entity.other.attribute-name"], r"[-_a-zA-Z0-9:.]+"),
            rule(&["keyword.operator.attribute-equals"], r"="),
            rule(&["string.attribute-value"], r#""[^"]*"|'[^']*'"#),
            rule(&["text"], r"\s+"),
        ],
    ),
    (
        "comment",
        &[
            rule_to(&["comment"], r".*?-->", "start"),
            rule(&["comment"], r".+"),
        ],
    ),
];

pub fn grammar() -> Result<Grammar, ModeError> {
    Grammar::compile("html", Language::Html, RULES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::embedding::RuleSet;
    use crate::mode::tokenizer::Tokenizer;

    fn tokenizer() -> Tokenizer {
        Tokenizer::new(RuleSet::new(&grammar().unwrap()))
    }

    #[test]
    fn test_tag_with_attributes() {
        let out = tokenizer().tokenize(r#"<a href="x">link</a>"#, "start");
        let kinds: Vec<_> = out.tokens.iter().map(|t| t.kind.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "meta.tag.punctuation.tag-open",
                "entity.name.tag",
                "text",
                "entity.other.attribute-name",
                "keyword.operator.attribute-equals",
                "string.attribute-value",
                "meta.tag.punctuation.tag-close",
                "text",
                "meta.tag.punctuation.tag-open",
                "entity.name.tag",
                "meta.tag.punctuation.tag-close",
            ]
        );
        assert_eq!(out.state, "start");
    }

    #[test]
    fn test_multiline_comment() {
        let t = tokenizer();
        let open = t.tokenize("<!-- a", "start");
        assert_eq!(open.state, "comment");
        let close = t.tokenize("b --> <p>", &open.state);
        assert_eq!(close.tokens[0].value, "b -->");
        assert_eq!(close.state, "start");
    }
}
