//! svginline - inline `<img inline source="*.svg">` placeholders as
//! optimized SVG markup in generated HTML.
//!
//! The core is [`inline::inline_document`], called once per generated
//! document with the build's emitted assets. The `svginline` binary drives
//! it over an already-built output directory.

pub mod asset;
pub mod cli;
pub mod config;
pub mod html;
pub mod inline;
pub mod logger;
pub mod svg;

pub use asset::{AssetRef, AssetResolver, AssetStore};
pub use config::{ConfigError, InlineConfig, OptimizeConfig};
pub use inline::{DocumentContext, InlineError, Inliner, PlaceholderSyntax, inline_document};
pub use svg::{SvgOptimizer, UsvgOptimizer};
