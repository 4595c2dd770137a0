//! Configuration for `svginline.toml`.
//!
//! # Sections
//!
//! | Key / Section     | Purpose                                          |
//! |-------------------|--------------------------------------------------|
//! | `base`            | Public path of the output root (default `/`)     |
//! | `[placeholder]`   | Placeholder syntax (tag, marker, source, ext)    |
//! | `[optimize]`      | Optimizer options, overlaid on the defaults      |
//!
//! # Example
//!
//! ```toml
//! base = "/blog/"
//!
//! [placeholder]
//! source = "src"
//!
//! [optimize]
//! coordinates_precision = 3
//! ```

mod error;
mod optimize;

pub use error::ConfigError;
pub use optimize::OptimizeConfig;

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::inline::PlaceholderSyntax;
use crate::log;

/// Root configuration structure representing svginline.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InlineConfig {
    /// Public path prefix that maps to the output root.
    pub base: String,

    /// Author-facing placeholder syntax.
    pub placeholder: PlaceholderSyntax,

    /// User optimizer options, passed through opaquely.
    pub optimize: toml::Table,
}

impl Default for InlineConfig {
    fn default() -> Self {
        Self {
            base: "/".to_string(),
            placeholder: PlaceholderSyntax::default(),
            optimize: toml::Table::new(),
        }
    }
}

impl InlineConfig {
    /// Load configuration from `path`.
    ///
    /// A missing file yields the defaults unless `required` is set.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let (config, ignored) = Self::parse_with_ignored(&content)?;

        for field in &ignored {
            log!("warning"; "unknown field `{}` in {}", field, path.display());
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    ///
    /// Keys under `[optimize]` are never unknown here; the optimizer
    /// decides what it understands.
    pub fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Reject settings that would make every placeholder ineligible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let syntax = &self.placeholder;
        for (field, value) in [
            ("placeholder.tag", &syntax.tag),
            ("placeholder.marker", &syntax.marker),
            ("placeholder.source", &syntax.source),
            ("placeholder.extension", &syntax.extension),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("`{field}` must not be empty")));
            }
        }
        if syntax.marker.eq_ignore_ascii_case(&syntax.source) {
            return Err(ConfigError::Validation(
                "`placeholder.marker` and `placeholder.source` must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Optimizer configuration: user options over the defaults.
    pub fn optimize_config(&self) -> OptimizeConfig {
        OptimizeConfig::merged(&self.optimize)
    }
}
