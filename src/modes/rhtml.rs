//! R HTML
//!
//! HTML host with R chunks written as `<!--begin.rcode ... -->` through `end.rcode-->`.
//! The start rule sits ahead of the HTML comment rule, so the chunk header is never
//! read as an ordinary comment. Chunks open only from top-level text: a header inside a
//! comment or an open tag is left to HTML.

use crate::languages::{html, r};
use crate::mode::chunks::InsertChunkInfo;
use crate::mode::code_model::{BracketCodeModel, Flavor};
use crate::mode::controller::ModeController;
use crate::mode::embedding::RuleSet;
use crate::mode::error::ModeError;
use crate::mode::host::HtmlHost;

pub const R_PREFIX: &str = "r-";

pub const CHUNK_START: &str = r"^<!--\s*begin.rcode\s*(.*)";
pub const CHUNK_END: &str = r"^\s*end.rcode\s*-->";

pub const INSERT_TEMPLATE: &str = "<!--begin.rcode\n\nend.rcode-->\n";

pub fn rule_set() -> Result<RuleSet, ModeError> {
    RuleSet::new(&html::grammar()?).embed(&r::grammar()?, R_PREFIX, CHUNK_START, CHUNK_END)
}

pub fn controller() -> Result<ModeController, ModeError> {
    let controller = ModeController::new(
        rule_set()?,
        Box::new(HtmlHost),
        InsertChunkInfo::new(INSERT_TEMPLATE, 0, 15),
    );
    let chunks = controller.chunk_patterns().clone();
    controller.with_code_model(R_PREFIX, Box::new(BracketCodeModel::new(Flavor::R, chunks)))
}
