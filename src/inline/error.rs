//! Inlining error types.

use thiserror::Error;

/// Errors that abort inlining for a whole document.
#[derive(Debug, Error)]
pub enum InlineError {
    #[error("failed to parse markup: {0}")]
    Parse(String),

    #[error("span {start}..{end} is outside the document ({len} bytes)")]
    Span { start: usize, end: usize, len: usize },

    #[error("`{filename}`: inline svg `{source_ref}` was not emitted by the build")]
    AssetNotFound {
        filename: String,
        source_ref: String,
    },

    #[error("`{filename}`: optimized `{source_ref}` contains another inline placeholder")]
    Reentrant {
        filename: String,
        source_ref: String,
    },

    #[error("`{filename}`: failed to optimize `{source_ref}`")]
    Optimize {
        filename: String,
        source_ref: String,
        #[source]
        source: anyhow::Error,
    },
}
