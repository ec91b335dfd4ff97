//! Mode Controller
//!
//!     The per-session object the editor talks to. It owns the tokenizer built from an
//!     embedded rule set, the host behaviour, and one code model per guest prefix.
//!
//! Dispatch
//!
//!     Every question is answered by first classifying a state name:
//!
//!         - a state claimed by a prefix with a registered code model goes to that model,
//!           with the arguments passed through untouched
//!         - anything else (host states, guests without a model) goes to the host
//!
//!     For row-based questions (language, folding) the state is the row's exit state as
//!     stored by the session. A chunk's start line therefore already reports the guest
//!     language, and its end line reports the host again. Folding makes one exception:
//!     an end line is answered by the model of the chunk it closes, read from the
//!     previous row's state, so the guest can mark it as a fold end.
//!
//!     Chunk patterns are not passed in separately. They are taken from the rule set's
//!     embeddings, so indentation, folding and background highlighting see exactly the
//!     boundaries the tokenizer enters and leaves chunks on.

use crate::mode::chunks::{ChunkHighlighter, ChunkPatterns, InsertChunkInfo};
use crate::mode::code_model::{CodeModel, FoldRange, FoldWidget, FoldingRules};
use crate::mode::embedding::RuleSet;
use crate::mode::error::ModeError;
use crate::mode::grammar::Language;
use crate::mode::host::HostBehavior;
use crate::mode::session::{EditSession, Position};
use crate::mode::tokenizer::{LineTokens, Tokenizer};
use tracing::{debug, trace};

/// Tokenization, classification, indentation and folding for one editing session
pub struct ModeController {
    tokenizer: Tokenizer,
    host: Box<dyn HostBehavior>,
    models: Vec<(String, Box<dyn CodeModel>)>,
    chunks: ChunkPatterns,
    insert_chunk_info: InsertChunkInfo,
}

impl ModeController {
    pub fn new(
        rules: RuleSet,
        host: Box<dyn HostBehavior>,
        insert_chunk_info: InsertChunkInfo,
    ) -> Self {
        let chunks = ChunkPatterns::from_embeddings(rules.embeddings());
        debug!(
            mode = rules.name(),
            host = %host.language(),
            embeddings = rules.embeddings().len(),
            "created mode controller"
        );
        Self {
            tokenizer: Tokenizer::new(rules),
            host,
            models: Vec::new(),
            chunks,
            insert_chunk_info,
        }
    }

    /// Register the code model for the guest embedded under `prefix`.
    pub fn with_code_model(
        mut self,
        prefix: &str,
        model: Box<dyn CodeModel>,
    ) -> Result<Self, ModeError> {
        let rules = self.tokenizer.rule_set();
        if !rules.embeddings().iter().any(|e| e.prefix() == prefix) {
            return Err(ModeError::UnknownPrefix(prefix.to_string()));
        }
        if self.models.iter().any(|(p, _)| p == prefix) {
            return Err(ModeError::DuplicatePrefix(prefix.to_string()));
        }
        self.models.push((prefix.to_string(), model));
        Ok(self)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn tokenize(&self, line: &str, state: &str) -> LineTokens {
        self.tokenizer.tokenize(line, state)
    }

    pub fn host_language(&self) -> Language {
        self.host.language()
    }

    /// Language a state belongs to
    pub fn language_of_state(&self, state: &str) -> Language {
        match self.tokenizer.rule_set().embedding_for(state) {
            Some(embedding) => embedding.language(),
            None => self.host.language(),
        }
    }

    /// Language active at `position`, read from the row's stored state
    pub fn language_mode(&self, session: &dyn EditSession, position: Position) -> Language {
        session
            .state(position.row)
            .map(|state| self.language_of_state(state))
            .unwrap_or_else(|| self.host.language())
    }

    /// Language under the session's cursor
    pub fn language_at_cursor(&self, session: &dyn EditSession) -> Language {
        self.language_mode(session, session.cursor())
    }

    fn code_model_for(&self, state: &str) -> Option<&dyn CodeModel> {
        let prefix = self.tokenizer.rule_set().embedding_for(state)?.prefix();
        self.models
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, model)| model.as_ref())
    }

    fn code_model_for_row(
        &self,
        session: &dyn EditSession,
        row: usize,
    ) -> Option<&dyn CodeModel> {
        if let Some(model) = session.state(row).and_then(|state| self.code_model_for(state)) {
            return Some(model);
        }
        // an end marker belongs to the chunk it closes
        if !self.chunks.is_end(session.line(row)?) {
            return None;
        }
        let entry = session.state(row.checked_sub(1)?)?;
        self.code_model_for(entry)
    }

    /// Indentation for the line after `line`.
    pub fn next_line_indent(&self, state: &str, line: &str, tab: &str, row: usize) -> String {
        match self.code_model_for(state) {
            Some(model) => {
                trace!(state, row, "delegating indent to code model");
                model.next_line_indent(state, line, tab, row)
            }
            None => self.host.next_line_indent(state, line, tab),
        }
    }

    /// The folding strategy for this mode
    pub fn folding_rules(&self) -> &dyn FoldingRules {
        self
    }

    pub fn insert_chunk_info(&self) -> &InsertChunkInfo {
        &self.insert_chunk_info
    }

    pub fn chunk_patterns(&self) -> &ChunkPatterns {
        &self.chunks
    }

    /// A background highlighter over this mode's own chunk patterns
    pub fn background_highlighter(&self, mark_delimiters: bool) -> ChunkHighlighter {
        ChunkHighlighter::new(self.chunks.clone(), mark_delimiters)
    }
}

impl FoldingRules for ModeController {
    fn fold_widget(&self, session: &dyn EditSession, row: usize) -> FoldWidget {
        match self.code_model_for_row(session, row) {
            Some(model) => model.fold_widget(session, row),
            None => self.host.fold_widget(session, row),
        }
    }

    fn fold_range(&self, session: &dyn EditSession, row: usize) -> Option<FoldRange> {
        match self.code_model_for_row(session, row) {
            Some(model) => model.fold_range(session, row),
            None => self.host.fold_range(session, row),
        }
    }
}
