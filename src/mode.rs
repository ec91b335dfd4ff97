//! Mode engine
//!
//!     A mode turns one line of text plus an entry state into tokens plus an exit state,
//!     and answers indentation and folding questions for a row. Documents that embed one
//!     language inside another are handled by merging rule tables rather than by running
//!     several tokenizers side by side.
//!
//! State Names
//!
//!     The only context carried from one line to the next is a state name. States copied
//!     from an embedded grammar are renamed with a prefix (`r-start`, `r-cpp-string`), so
//!     the language active on a row can be recovered from its state name alone. When a
//!     chunk is entered from a host state other than the host's initial state, the host
//!     state is appended after a `@` separator (`r-start@listblock`) so the end marker can
//!     return to it.
//!
//! Pipeline
//!
//!         1. [grammar]: rule tables per language, compiled from const tables.
//!         2. [embedding]: a [RuleSet](embedding::RuleSet) merges guest grammars into a host.
//!         3. [tokenizer]: scans a line against the merged table.
//!         4. [controller]: classifies rows and routes indent / fold requests to the
//!            host behaviour or a guest [CodeModel](code_model::CodeModel).
//!
//!     [session] holds the narrow editor interface the controller consumes, and [chunks]
//!     holds the boundary patterns shared between the tokenizer and the background
//!     highlighter.

pub mod chunks;
pub mod code_model;
pub mod controller;
pub mod embedding;
pub mod error;
pub mod grammar;
pub mod host;
pub mod session;
pub mod tokenizer;

pub use chunks::{ChunkHighlighter, ChunkPatterns, ChunkSpan, InsertChunkInfo};
pub use code_model::{BracketCodeModel, CodeModel, Flavor, FoldRange, FoldWidget, FoldingRules};
pub use controller::ModeController;
pub use embedding::{embed_rules, Embedding, RuleSet};
pub use error::ModeError;
pub use grammar::{Grammar, Language, Rule, RuleDef, TokenType, Transition};
pub use host::{HostBehavior, HtmlHost, MarkdownHost};
pub use session::{Document, EditSession, Position};
pub use tokenizer::{LineTokens, Token, Tokenizer};
