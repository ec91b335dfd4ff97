//! # rmode
//!
//! Multi-language tokenization and mode delegation for documents that mix a host
//! language (Markdown, HTML) with embedded guest chunks (R, C++).
//!
//! File Layout
//!
//!     src/mode        The generic engine: grammars, embedding, tokenizer, controller
//!     src/languages   Compact rule tables for the individual languages
//!     src/modes       Composite modes (R Markdown, R HTML) wired from the two above
//!
//! The engine never names a concrete language. Everything that knows about
//! Markdown fences or `begin.rcode` comments lives under `languages` and `modes`.

pub mod languages;
pub mod mode;
pub mod modes;
