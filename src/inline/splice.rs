//! The splice loop.
//!
//! Each step parses the current markup, takes the first placeholder only,
//! and splices its replacement into a new string. Spans are never carried
//! from one step to the next: a splice changes the length of the document,
//! so every later span is stale the moment it happens.

use super::{InlineError, PlaceholderSyntax, find_placeholders, merge_attributes};
use crate::asset::{AssetRef, AssetResolver};
use crate::config::{InlineConfig, OptimizeConfig};
use crate::debug;
use crate::html::{ParsedNode, Snapshot};
use crate::svg::SvgOptimizer;

/// Result of one splice step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    pub markup: String,
    /// A placeholder was replaced, so more may remain.
    pub more: bool,
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inlined {
    pub markup: String,
    /// Number of placeholders replaced.
    pub count: usize,
}

/// Rewrites one document. Everything it needs is passed in explicitly.
pub struct Inliner<'a, R: ?Sized, O: ?Sized> {
    filename: &'a str,
    assets: &'a R,
    optimizer: &'a O,
    syntax: &'a PlaceholderSyntax,
    base: &'a str,
    options: OptimizeConfig,
}

impl<'a, R, O> Inliner<'a, R, O>
where
    R: AssetResolver + ?Sized,
    O: SvgOptimizer + ?Sized,
{
    /// `filename` is the document's output path relative to the output root.
    pub fn new(
        filename: &'a str,
        assets: &'a R,
        optimizer: &'a O,
        config: &'a InlineConfig,
    ) -> Self {
        Self {
            filename,
            assets,
            optimizer,
            syntax: &config.placeholder,
            base: &config.base,
            options: config.optimize_config(),
        }
    }

    /// Replace placeholders until none remain.
    ///
    /// Any failure aborts the whole document; no partially inlined markup
    /// is ever returned.
    pub fn run(&self, mut markup: String) -> Result<Inlined, InlineError> {
        let mut count = 0;
        loop {
            let step = self.splice_next(markup)?;
            markup = step.markup;
            if !step.more {
                return Ok(Inlined { markup, count });
            }
            count += 1;
        }
    }

    /// Replace the first placeholder of `markup`, if any.
    pub fn splice_next(&self, markup: String) -> Result<Replacement, InlineError> {
        let spliced = {
            let snapshot = Snapshot::parse(&markup)?;
            match find_placeholders(snapshot.roots(), self.syntax).first() {
                Some(node) => Some(self.replace(&snapshot, node)?),
                None => None,
            }
        };

        Ok(match spliced {
            Some(markup) => Replacement { markup, more: true },
            None => Replacement {
                markup,
                more: false,
            },
        })
    }

    fn replace(
        &self,
        snapshot: &Snapshot<'_>,
        node: &ParsedNode<'_>,
    ) -> Result<String, InlineError> {
        let source = self.syntax.source_of(node).unwrap_or_default();
        let content = self.resolve(source)?;

        let optimized = self
            .optimizer
            .optimize(content, &self.options)
            .map_err(|source_err| InlineError::Optimize {
                filename: self.filename.to_string(),
                source_ref: source.to_string(),
                source: source_err,
            })?;

        let merged = merge_attributes(&node.attrs, self.syntax, &optimized);

        // Injected markup must not be picked up again by the next step
        let fragment = Snapshot::parse(&merged)?;
        if !find_placeholders(fragment.roots(), self.syntax).is_empty() {
            return Err(InlineError::Reentrant {
                filename: self.filename.to_string(),
                source_ref: source.to_string(),
            });
        }

        debug!("inline"; "{}: {} ({} -> {} bytes)",
            self.filename, source, content.len(), merged.len());

        snapshot.splice(node.span, &merged)
    }

    fn resolve(&self, source: &str) -> Result<&[u8], InlineError> {
        let asset = AssetRef::new(source, self.filename, self.base);
        asset
            .candidates
            .iter()
            .find_map(|key| self.assets.resolve(key))
            .ok_or_else(|| InlineError::AssetNotFound {
                filename: self.filename.to_string(),
                source_ref: asset.declared,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetStore;
    use anyhow::bail;
    use parking_lot::Mutex;

    /// Returns the asset unchanged and records what it was asked for.
    #[derive(Default)]
    struct Recording {
        seen: Mutex<Vec<String>>,
    }

    impl SvgOptimizer for Recording {
        fn optimize(&self, svg: &[u8], _config: &OptimizeConfig) -> anyhow::Result<String> {
            let svg = String::from_utf8(svg.to_vec())?;
            self.seen.lock().push(svg.clone());
            Ok(svg)
        }
    }

    /// Fails on any svg containing `broken`.
    struct Picky;

    impl SvgOptimizer for Picky {
        fn optimize(&self, svg: &[u8], _config: &OptimizeConfig) -> anyhow::Result<String> {
            let svg = String::from_utf8_lossy(svg);
            if svg.contains("broken") {
                bail!("cannot optimize");
            }
            Ok(svg.into_owned())
        }
    }

    /// Echoes a placeholder back, which would never terminate.
    struct Echo;

    impl SvgOptimizer for Echo {
        fn optimize(&self, _svg: &[u8], _config: &OptimizeConfig) -> anyhow::Result<String> {
            Ok(r#"<svg><img inline source="a.svg"></svg>"#.to_string())
        }
    }

    fn store() -> AssetStore {
        [
            ("a.svg", r#"<svg viewBox="0 0 1 1"></svg>"#),
            ("b.svg", r#"<svg id="b"></svg>"#),
            ("icons/c.svg", "<svg>c</svg>"),
            ("bad.svg", "<svg>broken</svg>"),
        ]
        .into_iter()
        .collect()
    }

    fn run(html: &str) -> Result<Inlined, InlineError> {
        let assets = store();
        let config = InlineConfig::default();
        Inliner::new("index.html", &assets, &Recording::default(), &config).run(html.to_string())
    }

    #[test]
    fn test_no_placeholders_is_identity() {
        let html = "<!DOCTYPE html><html><body><img src=\"a.svg\"><p>hi</p></body></html>";
        let out = run(html).unwrap();
        assert_eq!(out.markup, html);
        assert_eq!(out.count, 0);
    }

    #[test]
    fn test_attribute_carry_over() {
        let out = run(r#"<img inline source="a.svg" class="x" id="y">"#).unwrap();
        assert_eq!(out.markup, r#"<svg class="x" id="y" viewBox="0 0 1 1"></svg>"#);
    }

    #[test]
    fn test_all_placeholders_replaced_in_order() {
        let html = concat!(
            "<header>head</header>",
            r#"<p>one <img inline source="a.svg"> two <img inline source="/b.svg" class="big"></p>"#,
            r#"<div><img inline source="icons/c.svg"></div>"#,
            "<footer>foot</footer>",
        );
        let out = run(html).unwrap();

        assert_eq!(out.count, 3);
        assert_eq!(
            out.markup,
            concat!(
                "<header>head</header>",
                r#"<p>one <svg viewBox="0 0 1 1"></svg> two <svg class="big" id="b"></svg></p>"#,
                "<div><svg>c</svg></div>",
                "<footer>foot</footer>",
            )
        );
        assert!(!out.markup.contains("inline"));
    }

    #[test]
    fn test_splice_preserves_surrounding_bytes() {
        let prefix = "<html>\n  <body data-x='  odd  spacing '>\n    ";
        let suffix = "\n    <!-- keep --><script>let a = '<img>';</script>\n  </body>\n</html>\n";
        let html = format!(r#"{prefix}<img inline source="a.svg">{suffix}"#);

        let out = run(&html).unwrap();
        assert!(out.markup.starts_with(prefix));
        assert!(out.markup.ends_with(suffix));
    }

    #[test]
    fn test_splice_next_one_at_a_time() {
        let assets = store();
        let config = InlineConfig::default();
        let optimizer = Recording::default();
        let inliner = Inliner::new("index.html", &assets, &optimizer, &config);

        let html = r#"<img inline source="a.svg"><img inline source="b.svg">"#.to_string();
        let first = inliner.splice_next(html).unwrap();
        assert!(first.more);
        assert_eq!(
            first.markup,
            r#"<svg viewBox="0 0 1 1"></svg><img inline source="b.svg">"#
        );

        let second = inliner.splice_next(first.markup).unwrap();
        assert!(second.more);
        assert_eq!(second.markup, r#"<svg viewBox="0 0 1 1"></svg><svg id="b"></svg>"#);

        let done = inliner.splice_next(second.markup.clone()).unwrap();
        assert!(!done.more);
        assert_eq!(done.markup, second.markup);
    }

    #[test]
    fn test_document_order_of_optimizer_calls() {
        let assets = store();
        let config = InlineConfig::default();
        let optimizer = Recording::default();
        let html = r#"<div><p><img inline source="b.svg"></p></div><img inline source="a.svg">"#;

        Inliner::new("index.html", &assets, &optimizer, &config)
            .run(html.to_string())
            .unwrap();

        let seen = optimizer.seen.lock();
        assert_eq!(
            *seen,
            [r#"<svg id="b"></svg>"#, r#"<svg viewBox="0 0 1 1"></svg>"#]
        );
    }

    #[test]
    fn test_missing_asset_fails_document() {
        let err = run(r#"<img inline source="a.svg"><img inline source="missing.svg">"#)
            .unwrap_err();
        match err {
            InlineError::AssetNotFound {
                filename,
                source_ref,
            } => {
                assert_eq!(filename, "index.html");
                assert_eq!(source_ref, "missing.svg");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_optimizer_failure_fails_document() {
        let assets = store();
        let config = InlineConfig::default();
        let html = r#"<img inline source="a.svg"><img inline source="bad.svg">"#;

        let err = Inliner::new("index.html", &assets, &Picky, &config)
            .run(html.to_string())
            .unwrap_err();
        assert!(
            matches!(err, InlineError::Optimize { ref source_ref, .. } if source_ref == "bad.svg")
        );
    }

    #[test]
    fn test_reentrant_output_rejected() {
        let assets = store();
        let config = InlineConfig::default();
        let err = Inliner::new("index.html", &assets, &Echo, &config)
            .run(r#"<img inline source="a.svg">"#.to_string())
            .unwrap_err();
        assert!(matches!(err, InlineError::Reentrant { .. }));
    }

    #[test]
    fn test_relative_source_resolves_against_document() {
        let assets: AssetStore = [
            ("blog/pic.svg", "<svg>blog</svg>"),
            ("pic.svg", "<svg>root</svg>"),
        ]
        .into_iter()
        .collect();
        let config = InlineConfig::default();
        let optimizer = Recording::default();
        let inliner = Inliner::new("blog/post.html", &assets, &optimizer, &config);

        let out = inliner.run(r#"<img inline source="pic.svg">"#.to_string()).unwrap();
        assert_eq!(out.markup, "<svg>blog</svg>");

        let out = inliner.run(r#"<img inline source="/pic.svg">"#.to_string()).unwrap();
        assert_eq!(out.markup, "<svg>root</svg>");
    }

    #[test]
    fn test_raw_text_lookalikes_untouched() {
        let html = concat!(
            r#"<script>var s = '<img inline source="a.svg">';</script>"#,
            r#"<textarea><img inline source="a.svg"></textarea>"#,
            r#"<p><img inline source="b.svg"></p>"#,
        );
        let out = run(html).unwrap();
        assert_eq!(out.count, 1);
        assert_eq!(
            out.markup,
            concat!(
                r#"<script>var s = '<img inline source="a.svg">';</script>"#,
                r#"<textarea><img inline source="a.svg"></textarea>"#,
                r#"<p><svg id="b"></svg></p>"#,
            )
        );
    }

    #[test]
    fn test_ineligible_lookalikes_untouched() {
        let html = r#"<img source="a.svg"><img inline source="a.png"><img inline source="">"#;
        let out = run(html).unwrap();
        assert_eq!(out.markup, html);
    }
}
