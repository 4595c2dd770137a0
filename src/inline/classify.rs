//! Placeholder classification and discovery.

use serde::{Deserialize, Serialize};

use crate::html::ParsedNode;

/// Author-facing syntax of an inline placeholder.
///
/// ```html
/// <img inline source="/icons/logo.svg" class="logo">
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderSyntax {
    /// Element that references an image.
    pub tag: String,
    /// Bare attribute that opts the element in.
    pub marker: String,
    /// Attribute holding the asset path.
    pub source: String,
    /// Substring the asset path must contain.
    pub extension: String,
}

impl Default for PlaceholderSyntax {
    fn default() -> Self {
        Self {
            tag: "img".to_string(),
            marker: "inline".to_string(),
            source: "source".to_string(),
            extension: ".svg".to_string(),
        }
    }
}

impl PlaceholderSyntax {
    /// Check whether an attribute is part of the placeholder contract
    /// and must not be carried onto the inlined svg.
    #[inline]
    pub fn is_reserved(&self, name: &str) -> bool {
        name.eq_ignore_ascii_case(&self.marker) || name.eq_ignore_ascii_case(&self.source)
    }

    /// Declared asset path of a placeholder.
    pub fn source_of<'a>(&self, node: &ParsedNode<'a>) -> Option<&'a str> {
        node.attr(&self.source).and_then(|attr| attr.value)
    }
}

/// Check if a node is an eligible placeholder.
///
/// The extension test is a plain substring match on the source value,
/// so `icon.svg?v=2` and `icon.svgz` both qualify.
pub fn is_placeholder(node: &ParsedNode<'_>, syntax: &PlaceholderSyntax) -> bool {
    node.is_tag(&syntax.tag)
        && node.has_attr(&syntax.marker)
        && syntax
            .source_of(node)
            .is_some_and(|src| !src.is_empty() && src.contains(syntax.extension.as_str()))
}

/// Collect every placeholder under `roots`, in document order.
///
/// Pre-order, depth-first. Ineligible elements are still descended into.
pub fn find_placeholders<'n, 'a>(
    roots: &'n [ParsedNode<'a>],
    syntax: &PlaceholderSyntax,
) -> Vec<&'n ParsedNode<'a>> {
    roots
        .iter()
        .flat_map(|node| {
            let here = is_placeholder(node, syntax).then_some(node);
            here.into_iter().chain(find_placeholders(&node.children, syntax))
        })
        .collect()
}
