//! Composite modes
//!
//! Each mode wires a host grammar, its embedded guests, the host behaviour and the guest
//! code models into a [ModeController]. [ModeKind] selects one by name or by file
//! extension.

pub mod rhtml;
pub mod rmarkdown;

use crate::mode::controller::ModeController;
use crate::mode::error::ModeError;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// The bundled modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    RMarkdown,
    RHtml,
}

impl ModeKind {
    pub fn name(self) -> &'static str {
        match self {
            ModeKind::RMarkdown => "rmarkdown",
            ModeKind::RHtml => "rhtml",
        }
    }

    /// Mode for a file extension (without the dot), matched case-insensitively against the
    /// configured extension lists.
    pub fn from_extension(
        extension: &str,
        markdown_extensions: &[String],
        html_extensions: &[String],
    ) -> Option<Self> {
        let matches = |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(extension));
        if matches(markdown_extensions) {
            Some(ModeKind::RMarkdown)
        } else if matches(html_extensions) {
            Some(ModeKind::RHtml)
        } else {
            None
        }
    }

    /// Build a fresh controller for this mode.
    pub fn build(self) -> Result<ModeController, ModeError> {
        debug!(mode = self.name(), "building mode");
        match self {
            ModeKind::RMarkdown => rmarkdown::controller(),
            ModeKind::RHtml => rhtml::controller(),
        }
    }
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModeKind {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rmarkdown" | "rmd" => Ok(ModeKind::RMarkdown),
            "rhtml" => Ok(ModeKind::RHtml),
            _ => Err(ModeError::UnknownMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        assert_eq!("rmarkdown".parse::<ModeKind>(), Ok(ModeKind::RMarkdown));
        assert_eq!("RHTML".parse::<ModeKind>(), Ok(ModeKind::RHtml));
        assert_eq!(
            "latex".parse::<ModeKind>(),
            Err(ModeError::UnknownMode("latex".to_string()))
        );
    }

    #[test]
    fn test_from_extension() {
        let md = vec!["Rmd".to_string(), "md".to_string()];
        let html = vec!["Rhtml".to_string()];
        assert_eq!(
            ModeKind::from_extension("rmd", &md, &html),
            Some(ModeKind::RMarkdown)
        );
        assert_eq!(
            ModeKind::from_extension("rhtml", &md, &html),
            Some(ModeKind::RHtml)
        );
        assert_eq!(ModeKind::from_extension("txt", &md, &html), None);
    }

    #[test]
    fn test_every_mode_builds() {
        for kind in [ModeKind::RMarkdown, ModeKind::RHtml] {
            let controller = kind.build().unwrap();
            assert_eq!(controller.tokenizer().initial_state(), "start");
        }
    }
}
