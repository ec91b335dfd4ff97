//! R Markdown
//!
//! Markdown host with R chunks (```` ```{r} ````) under `r-` and Rcpp chunks
//! (```` ```{Rcpp} ```` or ```` ```{r engine='Rcpp'} ````) under `r-cpp-`. Both share the
//! fence end pattern. C++ is embedded last so its start rule is tried first: every Rcpp
//! header also matches the R header pattern.
//!
//! Chunks open from ordinary text and from inside a list. A header inside a plain fenced
//! block is part of that block.

use crate::languages::{cpp, markdown, r};
use crate::mode::chunks::InsertChunkInfo;
use crate::mode::code_model::{BracketCodeModel, Flavor};
use crate::mode::controller::ModeController;
use crate::mode::embedding::RuleSet;
use crate::mode::error::ModeError;
use crate::mode::grammar::START_STATE;
use crate::mode::host::MarkdownHost;

pub const R_PREFIX: &str = "r-";
pub const CPP_PREFIX: &str = "r-cpp-";

pub const R_CHUNK_START: &str = r"^(?:[ ]{4})?`{3,}\s*\{[Rr](.*)\}\s*$";
pub const CPP_CHUNK_START: &str = concat!(
    r#"^(?:[ ]{4})?`{3,}\s*\{[Rr](?:.*)engine\s*=\s*['"]Rcpp['"](?:.*)\}\s*$"#,
    r"|^(?:[ ]{4})?`{3,}\s*\{[Rr]cpp(?:.*)\}\s*$",
);
pub const CHUNK_END: &str = r"^(?:[ ]{4})?`{3,}\s*$";

pub const INSERT_TEMPLATE: &str = "```{r}\n\n```\n";

const ENTRY_STATES: &[&str] = &[START_STATE, markdown::LIST_STATE];

pub fn rule_set() -> Result<RuleSet, ModeError> {
    RuleSet::new(&markdown::grammar()?)
        .embed_in(&r::grammar()?, R_PREFIX, R_CHUNK_START, CHUNK_END, ENTRY_STATES)?
        .embed_in(
            &cpp::grammar()?,
            CPP_PREFIX,
            CPP_CHUNK_START,
            CHUNK_END,
            ENTRY_STATES,
        )
}

pub fn controller() -> Result<ModeController, ModeError> {
    let controller = ModeController::new(
        rule_set()?,
        Box::new(MarkdownHost::new(markdown::LIST_STATE)),
        InsertChunkInfo::new(INSERT_TEMPLATE, 0, 5),
    );
    let chunks = controller.chunk_patterns().clone();
    controller
        .with_code_model(
            R_PREFIX,
            Box::new(BracketCodeModel::new(Flavor::R, chunks.clone())),
        )?
        .with_code_model(
            CPP_PREFIX,
            Box::new(BracketCodeModel::new(Flavor::Cpp, chunks)),
        )
}
