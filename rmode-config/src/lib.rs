//! Shared configuration loader for the rmode tools.
//!
//! `defaults/rmode.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`RmodeConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/rmode.default.toml");

/// Top-level configuration consumed by rmode applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RmodeConfig {
    pub editor: EditorConfig,
    pub highlight: HighlightConfig,
    pub modes: ModesConfig,
}

/// Indentation settings handed to `next_line_indent`.
#[derive(Debug, Clone, Deserialize)]
pub struct EditorConfig {
    pub tab_size: usize,
    pub use_soft_tabs: bool,
}

impl EditorConfig {
    /// The string inserted for one indentation level.
    pub fn tab_string(&self) -> String {
        if self.use_soft_tabs {
            " ".repeat(self.tab_size)
        } else {
            "\t".to_string()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub chunk_background: bool,
    pub mark_delimiters: bool,
}

/// Which file extensions open in which mode.
#[derive(Debug, Clone, Deserialize)]
pub struct ModesConfig {
    pub markdown_extensions: Vec<String>,
    pub html_extensions: Vec<String>,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RmodeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RmodeConfig, ConfigError> {
    Loader::new().build()
}
