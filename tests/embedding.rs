//! Rule-set embedding: prefix validation and classification

use rmode::mode::grammar::{rule, rule_to, StateTable};
use rmode::mode::{embed_rules, Grammar, Language, ModeError, RuleSet};
use rstest::rstest;

const HOST: StateTable = &[("start", &[rule(&["text"], r"[^<]+")])];

const GUEST: StateTable = &[
    ("start", &[rule_to(&["string"], "\"", "string")]),
    ("string", &[rule_to(&["string"], "\"", "start")]),
];

/// A guest whose own state name starts like another prefix
const TRICKY_GUEST: StateTable = &[
    ("start", &[rule_to(&["x"], "x", "cpp-start")]),
    ("cpp-start", &[rule_to(&["y"], "y", "start")]),
];

fn host() -> RuleSet {
    RuleSet::new(&Grammar::compile("host", Language::Html, HOST).unwrap())
}

fn guest(language: Language) -> Grammar {
    Grammar::compile("guest", language, GUEST).unwrap()
}

#[rstest]
#[case("", ModeError::EmptyPrefix)]
#[case("r@", ModeError::ReservedCharacter { name: "r@".to_string() })]
#[case(
    "st",
    ModeError::PrefixShadowsHostState { prefix: "st".to_string(), state: "start".to_string() }
)]
fn test_invalid_prefix_is_rejected(#[case] prefix: &str, #[case] expected: ModeError) {
    let err = embed_rules(host(), &guest(Language::R), prefix, "^<<$", "^>>$").unwrap_err();
    assert_eq!(err, expected);
}

#[test]
fn test_duplicate_prefix_is_rejected() {
    let set = embed_rules(host(), &guest(Language::R), "r-", "^<<$", "^>>$").unwrap();
    let err = embed_rules(set, &guest(Language::Cpp), "r-", "^<<cpp$", "^>>$").unwrap_err();
    assert_eq!(err, ModeError::DuplicatePrefix("r-".to_string()));
}

#[test]
fn test_colliding_prefixes_fail_at_setup() {
    let tricky = Grammar::compile("tricky", Language::R, TRICKY_GUEST).unwrap();
    let set = embed_rules(host(), &tricky, "r-", "^<<$", "^>>$").unwrap();
    let err = embed_rules(set, &guest(Language::Cpp), "r-cpp-", "^<<cpp$", "^>>$").unwrap_err();
    assert_eq!(
        err,
        ModeError::PrefixCollision {
            prefix: "r-".to_string(),
            state: "r-cpp-start".to_string(),
            claimed_by: "r-cpp-".to_string(),
        }
    );
}

#[rstest]
#[case("(", "^>>$")]
#[case("^<<$", "[")]
fn test_invalid_boundary_pattern(#[case] start: &str, #[case] end: &str) {
    let err = embed_rules(host(), &guest(Language::R), "r-", start, end).unwrap_err();
    assert!(matches!(err, ModeError::InvalidPattern { .. }));
}

#[rstest]
#[case("start", Language::Html)]
#[case("r-start", Language::R)]
#[case("r-string", Language::R)]
#[case("r-start@start", Language::R)]
#[case("r-cpp-start", Language::Cpp)]
#[case("r-cpp-string@listblock", Language::Cpp)]
#[case("unknown", Language::Html)]
fn test_longest_prefix_classification(#[case] state: &str, #[case] expected: Language) {
    let set = embed_rules(host(), &guest(Language::R), "r-", "^<<$", "^>>$").unwrap();
    let set = embed_rules(set, &guest(Language::Cpp), "r-cpp-", "^<<cpp$", "^>>$").unwrap();
    assert_eq!(set.classify(state), expected);
}

#[test]
fn test_guest_states_are_copied_under_prefix() {
    let set = embed_rules(host(), &guest(Language::R), "r-", "^<<$", "^>>$").unwrap();
    assert!(set.contains("r-start"));
    assert!(set.contains("r-string"));
    assert!(!set.contains("string"));

    let embedding = &set.embeddings()[0];
    assert_eq!(embedding.prefix(), "r-");
    assert_eq!(
        embedding.states().to_vec(),
        vec!["r-start".to_string(), "r-string".to_string()]
    );
}

#[test]
fn test_later_embedding_start_rule_is_tried_first() {
    let set = embed_rules(host(), &guest(Language::R), "r-", "^<<", "^>>$").unwrap();
    let set = embed_rules(set, &guest(Language::Cpp), "r-cpp-", "^<<cpp", "^>>$").unwrap();
    let first = &set.rules("start").unwrap()[0];
    assert_eq!(first.pattern(), "^<<cpp");
}
