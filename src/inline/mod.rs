//! Inline SVG placeholders into generated HTML.
//!
//! ```text
//! markup ──► Snapshot::parse ──► find_placeholders ──► first placeholder
//!   ▲                                                        │
//!   │                                              AssetResolver::resolve
//!   │                                                        │
//!   │                                              SvgOptimizer::optimize
//!   │                                                        │
//!   └──────── Snapshot::splice ◄──────────────── merge_attributes
//! ```
//!
//! The loop ends when a fresh parse finds no placeholder.

mod classify;
mod error;
mod merge;
mod splice;

pub use classify::{PlaceholderSyntax, find_placeholders, is_placeholder};
pub use error::InlineError;
pub use merge::merge_attributes;
pub use splice::{Inlined, Inliner, Replacement};

use std::path::{Path, PathBuf};

use crate::asset::AssetResolver;
use crate::config::InlineConfig;
use crate::svg::SvgOptimizer;
use crate::{debug, log};

/// Build metadata of the document being rewritten.
#[derive(Debug, Clone, Default)]
pub struct DocumentContext {
    /// Output path of the document, relative to `output_dir`.
    pub filename: Option<String>,
    /// Output root of the build.
    pub output_dir: Option<PathBuf>,
}

impl DocumentContext {
    pub fn new(filename: impl Into<String>, output_dir: impl AsRef<Path>) -> Self {
        Self {
            filename: Some(filename.into()),
            output_dir: Some(output_dir.as_ref().to_path_buf()),
        }
    }
}

/// Rewrite one generated document.
///
/// Without a filename or output directory the markup is passed through
/// unchanged, so missing build metadata never blocks a build. Asset and
/// optimizer failures abort the document.
pub fn inline_document<R, O>(
    ctx: &DocumentContext,
    markup: String,
    assets: &R,
    optimizer: &O,
    config: &InlineConfig,
) -> Result<String, InlineError>
where
    R: AssetResolver + ?Sized,
    O: SvgOptimizer + ?Sized,
{
    let (Some(filename), Some(output_dir)) = (
        ctx.filename.as_deref().filter(|f| !f.is_empty()),
        ctx.output_dir.as_deref(),
    ) else {
        log!("warning"; "no output path or filename for document, skipping svg inlining");
        return Ok(markup);
    };

    let done = Inliner::new(filename, assets, optimizer, config).run(markup)?;
    if done.count > 0 {
        debug!("inline"; "{}: inlined {} svg(s)", output_dir.join(filename).display(), done.count);
    }
    Ok(done.markup)
}
