//! SVG optimization using usvg.
//!
//! usvg normalizes the document (shapes become paths, styles become
//! attributes, unused defs and metadata are dropped) and writes it back
//! without indentation.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::SvgOptimizer;
use super::bounds::{calculate_stroke_bounds, ensure_viewbox, expand_viewbox_to_bounds};
use crate::config::OptimizeConfig;
use crate::debug;

/// Option keys understood by [`UsvgOptimizer`].
///
/// Every key is present in [`OptimizeConfig::defaults`]; unknown keys are
/// logged and ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UsvgOptions {
    /// DPI for unit conversion (mm, in, pt).
    pub dpi: f32,
    /// Grow the viewBox to include stroke boundaries.
    pub expand_viewbox: bool,
    /// Decimal places for path coordinates.
    pub coordinates_precision: u8,
    /// Decimal places for transform values.
    pub transforms_precision: u8,
    pub use_single_quote: bool,
    /// Spaces per indent level, 0 writes everything on one line.
    pub indent: u8,
    /// Prefix for generated ids, empty for none.
    pub id_prefix: String,
}

impl UsvgOptions {
    /// Read options from a merged configuration.
    pub fn from_config(config: &OptimizeConfig) -> Result<Self> {
        let value = toml::Value::Table(config.table().clone());
        let options = serde_ignored::deserialize(value, |path: serde_ignored::Path| {
            debug!("svg"; "ignoring unknown option `{}`", path);
        })
        .context("invalid svg optimizer options")?;
        Ok(options)
    }

    fn write_options(&self) -> usvg::WriteOptions {
        usvg::WriteOptions {
            id_prefix: (!self.id_prefix.is_empty()).then(|| self.id_prefix.clone()),
            coordinates_precision: self.coordinates_precision,
            transforms_precision: self.transforms_precision,
            use_single_quote: self.use_single_quote,
            indent: match self.indent {
                0 => usvg::Indent::None,
                n => usvg::Indent::Spaces(n),
            },
            ..Default::default()
        }
    }
}

/// Default optimizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsvgOptimizer;

impl SvgOptimizer for UsvgOptimizer {
    fn optimize(&self, svg: &[u8], config: &OptimizeConfig) -> Result<String> {
        let options = UsvgOptions::from_config(config)?;

        let usvg_options = usvg::Options {
            dpi: options.dpi,
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg, &usvg_options).context("failed to parse svg")?;

        let optimized = tree.to_string(&options.write_options());
        let quote = if options.use_single_quote { '\'' } else { '"' };

        if options.expand_viewbox
            && let Some(bounds) = calculate_stroke_bounds(&tree)
        {
            return Ok(expand_viewbox_to_bounds(&optimized, bounds, quote));
        }

        Ok(ensure_viewbox(&optimized, tree.size(), quote))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- exported -->
<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10">
  <metadata>editor data</metadata>
  <rect x="0" y="0" width="10" height="10" fill="red"/>
</svg>
"#;

    fn config(user: &str) -> OptimizeConfig {
        OptimizeConfig::merged(&toml::from_str(user).unwrap())
    }

    #[test]
    fn test_default_options() {
        let options = UsvgOptions::from_config(&OptimizeConfig::default()).unwrap();
        assert_eq!(options.dpi, 96.0);
        assert!(options.expand_viewbox);
        assert_eq!(options.indent, 0);
        assert!(options.id_prefix.is_empty());
    }

    #[test]
    fn test_user_options_override() {
        let options = UsvgOptions::from_config(&config("dpi = 144\nindent = 2")).unwrap();
        assert_eq!(options.dpi, 144.0);
        assert_eq!(options.indent, 2);
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let options = UsvgOptions::from_config(&config("removeViewBox = false")).unwrap();
        assert_eq!(options, UsvgOptions::from_config(&OptimizeConfig::default()).unwrap());
    }

    #[test]
    fn test_invalid_option_type() {
        assert!(UsvgOptions::from_config(&config("dpi = \"high\"")).is_err());
    }

    #[test]
    fn test_optimize_minifies() {
        let out = UsvgOptimizer
            .optimize(SQUARE.as_bytes(), &OptimizeConfig::default())
            .unwrap();
        assert!(out.starts_with("<svg"));
        assert!(out.contains("viewBox="));
        assert!(!out.contains("<?xml"));
        assert!(!out.contains("metadata"));
        assert!(!out.contains("exported"));
    }

    #[test]
    fn test_optimize_single_quotes() {
        let out = UsvgOptimizer
            .optimize(SQUARE.as_bytes(), &config("use_single_quote = true"))
            .unwrap();
        assert!(out.contains("viewBox='"));
    }

    #[test]
    fn test_optimize_keeps_viewbox_without_expansion() {
        let out = UsvgOptimizer
            .optimize(SQUARE.as_bytes(), &config("expand_viewbox = false"))
            .unwrap();
        assert!(out.contains(r#"viewBox="0 0 10 10""#));
    }

    #[test]
    fn test_optimize_expands_to_stroke_bounds() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10" viewBox="0 0 10 10"><rect x="0" y="0" width="10" height="10" fill="none" stroke="black" stroke-width="2"/></svg>"#;
        let out = UsvgOptimizer
            .optimize(svg.as_bytes(), &OptimizeConfig::default())
            .unwrap();
        // Half the stroke lies outside the rect
        assert!(out.contains(r#"viewBox="-"#));
        assert!(!out.contains(r#"viewBox="0 0 10 10""#));
    }

    #[test]
    fn test_optimize_rejects_invalid_svg() {
        let err = UsvgOptimizer
            .optimize(b"<html>not svg</html>", &OptimizeConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("failed to parse svg"));
    }
}
