//! Language rule tables
//!
//! Compact grammars for the languages the bundled modes combine. They are deliberately
//! small: enough structure for chunk embedding, multi-line strings and comments, and
//! the states the host behaviours look at. Each module exposes its const `RULES` table
//! and a `grammar()` constructor.

pub mod cpp;
pub mod html;
pub mod markdown;
pub mod r;
