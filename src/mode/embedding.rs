//! Rule-Set Embedding
//!
//!     Merges guest grammars into a host grammar's rule table. For a guest embedded under
//!     prefix `p` with start pattern `S` and end pattern `E`:
//!
//!         - each entry state of the host gains a rule matching `S` that enters
//!           `p` + guest start (by default only the host's initial state)
//!         - every guest state is copied as `p` + name, with its transitions renamed
//!         - every copied state gains a rule matching `E` that exits the chunk
//!
//!     The boundary rules are inserted ahead of the existing rules. The scan is
//!     first-match-wins, so a host rule such as an HTML comment opener would otherwise
//!     shadow a `<!--begin.rcode` line. Host states that are not entry states (a fenced
//!     block, an HTML comment) never open a chunk.
//!
//! Return Frames
//!
//!     The tokenizer carries no stack. A chunk entered from the host's initial state
//!     enters plain `p` + `start`; a chunk entered from any other host state records it
//!     as a frame (`r-start@listblock`). The exit rule returns to the frame, or to the
//!     host's initial state when there is none.
//!
//! Prefix Rules
//!
//!     Classification picks the longest registered prefix a state starts with, which lets
//!     `r-` and `r-cpp-` live side by side. Embedding fails when that lookup could become
//!     ambiguous: duplicate or empty prefixes, a prefix that starts a host state name, or a
//!     guest state that would be claimed by a different prefix.

use crate::mode::error::ModeError;
use crate::mode::grammar::{
    Grammar, Language, Rule, TokenType, Transition, FRAME_SEPARATOR,
};
use regex::Regex;
use std::collections::BTreeMap;
use tracing::debug;

/// Token type of the rule that opens a chunk
pub const CHUNK_BEGIN_TOKEN: &str = "support.function.codebegin";

/// Token type of the rule that closes a chunk
pub const CHUNK_END_TOKEN: &str = "support.function.codeend";

/// One guest grammar registered in a [RuleSet]
#[derive(Debug, Clone)]
pub struct Embedding {
    prefix: String,
    grammar: String,
    language: Language,
    start: Regex,
    end: Regex,
    states: Vec<String>,
}

impl Embedding {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Name of the embedded grammar
    pub fn grammar(&self) -> &str {
        &self.grammar
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn start_pattern(&self) -> &Regex {
        &self.start
    }

    pub fn end_pattern(&self) -> &Regex {
        &self.end
    }

    /// Prefixed names of the copied guest states
    pub fn states(&self) -> &[String] {
        &self.states
    }
}

/// A host rule table with zero or more embedded guest grammars
#[derive(Debug, Clone)]
pub struct RuleSet {
    name: String,
    language: Language,
    initial: String,
    host_states: Vec<String>,
    states: BTreeMap<String, Vec<Rule>>,
    embeddings: Vec<Embedding>,
}

impl RuleSet {
    pub fn new(host: &Grammar) -> Self {
        let states: BTreeMap<String, Vec<Rule>> = host
            .states()
            .map(|(name, rules)| (name.to_string(), rules.to_vec()))
            .collect();
        Self {
            name: host.name().to_string(),
            language: host.language(),
            initial: host.initial_state().to_string(),
            host_states: states.keys().cloned().collect(),
            states,
            embeddings: Vec::new(),
        }
    }

    /// Embed `guest` under `prefix`, delimited by `start` and `end` line patterns. Chunks
    /// open only from the host's initial state.
    pub fn embed(
        self,
        guest: &Grammar,
        prefix: &str,
        start: &str,
        end: &str,
    ) -> Result<Self, ModeError> {
        let initial = self.initial.clone();
        self.embed_in(guest, prefix, start, end, &[initial.as_str()])
    }

    /// Like [RuleSet::embed], with chunks opening from each of `entry_states`.
    pub fn embed_in(
        mut self,
        guest: &Grammar,
        prefix: &str,
        start: &str,
        end: &str,
        entry_states: &[&str],
    ) -> Result<Self, ModeError> {
        self.check_prefix(prefix)?;
        if let Some(state) = entry_states
            .iter()
            .find(|s| !self.host_states.iter().any(|h| h.as_str() == **s))
        {
            return Err(ModeError::UnknownState {
                grammar: self.name.clone(),
                state: state.to_string(),
            });
        }

        let start_regex = Regex::new(start).map_err(|e| ModeError::invalid_pattern(start, e))?;
        let end_regex = Regex::new(end).map_err(|e| ModeError::invalid_pattern(end, e))?;

        let guest_states: Vec<String> = guest
            .state_names()
            .map(|name| format!("{}{}", prefix, name))
            .collect();
        self.check_claims(prefix, &guest_states)?;

        let entry = format!("{}{}", prefix, guest.initial_state());
        for host_state in entry_states {
            let target = if *host_state == self.initial {
                entry.clone()
            } else {
                format!("{}{}{}", entry, FRAME_SEPARATOR, host_state)
            };
            let begin = Rule::new(
                start,
                TokenType::Single(CHUNK_BEGIN_TOKEN.to_string()),
                Some(Transition::Goto(target)),
            )?;
            if let Some(rules) = self.states.get_mut(*host_state) {
                rules.insert(0, begin);
            }
        }

        let exit = Rule::new(
            end,
            TokenType::Single(CHUNK_END_TOKEN.to_string()),
            Some(Transition::Exit),
        )?;
        for (name, rules) in guest.states() {
            let mut copied = Vec::with_capacity(rules.len() + 1);
            copied.push(exit.clone());
            copied.extend(rules.iter().map(|rule| {
                let next = rule.next().map(|t| match t {
                    Transition::Goto(target) => Transition::Goto(format!("{}{}", prefix, target)),
                    Transition::Exit => Transition::Exit,
                });
                rule.clone().with_next(next)
            }));
            self.states.insert(format!("{}{}", prefix, name), copied);
        }

        debug!(
            host = %self.name,
            guest = guest.name(),
            prefix,
            states = guest_states.len(),
            entry_states = entry_states.len(),
            "embedded guest grammar"
        );

        self.embeddings.push(Embedding {
            prefix: prefix.to_string(),
            grammar: guest.name().to_string(),
            language: guest.language(),
            start: start_regex,
            end: end_regex,
            states: guest_states,
        });
        Ok(self)
    }

    fn check_prefix(&self, prefix: &str) -> Result<(), ModeError> {
        if prefix.is_empty() {
            return Err(ModeError::EmptyPrefix);
        }
        if prefix.contains(FRAME_SEPARATOR) {
            return Err(ModeError::ReservedCharacter {
                name: prefix.to_string(),
            });
        }
        if self.embeddings.iter().any(|e| e.prefix == prefix) {
            return Err(ModeError::DuplicatePrefix(prefix.to_string()));
        }
        if let Some(state) = self.host_states.iter().find(|s| s.starts_with(prefix)) {
            return Err(ModeError::PrefixShadowsHostState {
                prefix: prefix.to_string(),
                state: state.clone(),
            });
        }
        Ok(())
    }

    /// Every state, old and new, must still classify under its own prefix.
    fn check_claims(&self, prefix: &str, guest_states: &[String]) -> Result<(), ModeError> {
        let mut prefixes: Vec<&str> = self.embeddings.iter().map(|e| e.prefix.as_str()).collect();
        prefixes.push(prefix);

        let owned = self
            .embeddings
            .iter()
            .flat_map(|e| e.states.iter().map(move |s| (e.prefix.as_str(), s)))
            .chain(guest_states.iter().map(|s| (prefix, s)));

        for (owner, state) in owned {
            if let Some(claimed) = longest_prefix(prefixes.iter().copied(), state) {
                if claimed != owner {
                    return Err(ModeError::PrefixCollision {
                        prefix: owner.to_string(),
                        state: state.clone(),
                        claimed_by: claimed.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn host_language(&self) -> Language {
        self.language
    }

    pub fn initial_state(&self) -> &str {
        &self.initial
    }

    pub fn contains(&self, state: &str) -> bool {
        self.states.contains_key(base_state(state))
    }

    /// Rules for a state; any return frame is ignored
    pub fn rules(&self, state: &str) -> Option<&[Rule]> {
        self.states.get(base_state(state)).map(|r| r.as_slice())
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    /// The embedding whose prefix claims `state`, if any
    pub fn embedding_for(&self, state: &str) -> Option<&Embedding> {
        let base = base_state(state);
        self.embeddings
            .iter()
            .filter(|e| base.starts_with(e.prefix.as_str()))
            .max_by_key(|e| e.prefix.len())
    }

    /// Language active in `state`; the host language when no prefix matches
    pub fn classify(&self, state: &str) -> Language {
        self.embedding_for(state)
            .map(|e| e.language)
            .unwrap_or(self.language)
    }
}

/// Functional form of [RuleSet::embed].
pub fn embed_rules(
    host: RuleSet,
    guest: &Grammar,
    prefix: &str,
    start: &str,
    end: &str,
) -> Result<RuleSet, ModeError> {
    host.embed(guest, prefix, start, end)
}

/// State name without its return frame
pub fn base_state(state: &str) -> &str {
    state
        .split_once(FRAME_SEPARATOR)
        .map(|(base, _)| base)
        .unwrap_or(state)
}

/// Host state recorded in a guest state name
pub fn return_frame(state: &str) -> Option<&str> {
    state.split_once(FRAME_SEPARATOR).map(|(_, frame)| frame)
}

fn longest_prefix<'a>(prefixes: impl Iterator<Item = &'a str>, state: &str) -> Option<&'a str> {
    prefixes
        .filter(|p| state.starts_with(p))
        .max_by_key(|p| p.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::grammar::{rule, rule_to, StateTable};

    const HOST: StateTable = &[
        ("start", &[rule_to(&["list"], r"^- ", "list")]),
        ("list", &[rule_to(&["blank"], r"^\s+$", "start")]),
    ];

    const GUEST: StateTable = &[
        ("start", &[rule_to(&["string"], "\"", "string")]),
        ("string", &[rule_to(&["string"], "\"", "start")]),
    ];

    fn host() -> Grammar {
        Grammar::compile("host", Language::Markdown, HOST).unwrap()
    }

    fn guest() -> Grammar {
        Grammar::compile("guest", Language::R, GUEST).unwrap()
    }

    #[test]
    fn test_embed_copies_guest_states_with_prefix() {
        let set = RuleSet::new(&host())
            .embed(&guest(), "r-", "^<<$", "^>>$")
            .unwrap();
        assert!(set.contains("r-start"));
        assert!(set.contains("r-string"));
        // guest transitions are renamed
        let copied = set.rules("r-start").unwrap();
        assert_eq!(copied[0].next(), Some(&Transition::Exit));
        assert_eq!(
            copied[1].next(),
            Some(&Transition::Goto("r-string".to_string()))
        );
    }

    #[test]
    fn test_entry_rule_only_in_initial_state_by_default() {
        let set = RuleSet::new(&host())
            .embed(&guest(), "r-", "^<<$", "^>>$")
            .unwrap();
        let start = set.rules("start").unwrap();
        assert_eq!(start[0].pattern(), "^<<$");
        assert_eq!(
            start[0].next(),
            Some(&Transition::Goto("r-start".to_string()))
        );
        let list = set.rules("list").unwrap();
        assert_eq!(list.len(), 1);
        assert_ne!(list[0].pattern(), "^<<$");
    }

    #[test]
    fn test_entry_rule_in_chosen_states() {
        let set = RuleSet::new(&host())
            .embed_in(&guest(), "r-", "^<<$", "^>>$", &["start", "list"])
            .unwrap();
        let list = set.rules("list").unwrap();
        assert_eq!(list[0].pattern(), "^<<$");
        assert_eq!(
            list[0].next(),
            Some(&Transition::Goto("r-start@list".to_string()))
        );
    }

    #[test]
    fn test_unknown_entry_state_fails() {
        let err = RuleSet::new(&host())
            .embed_in(&guest(), "r-", "^<<$", "^>>$", &["start", "quote"])
            .unwrap_err();
        assert_eq!(
            err,
            ModeError::UnknownState {
                grammar: "host".to_string(),
                state: "quote".to_string(),
            }
        );
    }

    #[test]
    fn test_second_embedding_skips_guest_states() {
        let set = RuleSet::new(&host())
            .embed(&guest(), "r-", "^<<$", "^>>$")
            .unwrap()
            .embed(&guest(), "r-cpp-", "^<<cpp$", "^>>$")
            .unwrap();
        let r_start = set.rules("r-start").unwrap();
        assert!(r_start.iter().all(|r| r.pattern() != "^<<cpp$"));
        assert_eq!(set.rules("start").unwrap()[0].pattern(), "^<<cpp$");
    }

    #[test]
    fn test_classify_longest_prefix() {
        let set = RuleSet::new(&host())
            .embed(&guest(), "r-", "^<<$", "^>>$")
            .unwrap()
            .embed(
                &Grammar::compile("cpp", Language::Cpp, GUEST).unwrap(),
                "r-cpp-",
                "^<<cpp$",
                "^>>$",
            )
            .unwrap();
        assert_eq!(set.classify("r-start"), Language::R);
        assert_eq!(set.classify("r-cpp-string"), Language::Cpp);
        assert_eq!(set.classify("r-start@list"), Language::R);
        assert_eq!(set.classify("list"), Language::Markdown);
    }

    #[test]
    fn test_duplicate_prefix_fails() {
        let err = RuleSet::new(&host())
            .embed(&guest(), "r-", "^<<$", "^>>$")
            .unwrap()
            .embed(&guest(), "r-", "^<<$", "^>>$")
            .unwrap_err();
        assert_eq!(err, ModeError::DuplicatePrefix("r-".to_string()));
    }

    #[test]
    fn test_prefix_shadowing_host_state_fails() {
        let err = RuleSet::new(&host())
            .embed(&guest(), "li", "^<<$", "^>>$")
            .unwrap_err();
        assert!(matches!(err, ModeError::PrefixShadowsHostState { .. }));
    }

    #[test]
    fn test_guest_state_claimed_by_other_prefix_fails() {
        const CLAIMING: StateTable = &[("start", &[]), ("cpp-x", &[rule(&["x"], "x")])];
        let claiming = Grammar::compile("claiming", Language::R, CLAIMING).unwrap();
        let err = RuleSet::new(&host())
            .embed(&guest(), "r-cpp-", "^<<cpp$", "^>>$")
            .unwrap()
            .embed(&claiming, "r-", "^<<$", "^>>$")
            .unwrap_err();
        assert_eq!(
            err,
            ModeError::PrefixCollision {
                prefix: "r-".to_string(),
                state: "r-cpp-x".to_string(),
                claimed_by: "r-cpp-".to_string(),
            }
        );
    }

    #[test]
    fn test_base_state_and_frame() {
        assert_eq!(base_state("r-start@list"), "r-start");
        assert_eq!(return_frame("r-start@list"), Some("list"));
        assert_eq!(base_state("start"), "start");
        assert_eq!(return_frame("start"), None);
    }
}
