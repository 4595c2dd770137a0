//! Carry placeholder attributes onto the inlined svg root.

use std::borrow::Cow;

use super::PlaceholderSyntax;
use crate::html::Attr;

/// Inject every non-reserved placeholder attribute into the root `<svg`
/// opening tag, right after the tag name and before its own attributes.
///
/// Values are copied verbatim, entities and all. Only the quote character
/// is chosen to keep the value intact.
///
/// Returns the markup unchanged if there is nothing to carry over or no
/// root `<svg` tag is found.
pub fn merge_attributes<'s>(
    attrs: &[Attr<'_>],
    syntax: &PlaceholderSyntax,
    svg: &'s str,
) -> Cow<'s, str> {
    let carried: String = attrs
        .iter()
        .filter(|attr| !syntax.is_reserved(attr.name))
        .map(render_attr)
        .collect();

    if carried.is_empty() {
        return Cow::Borrowed(svg);
    }
    let Some(at) = root_svg_end(svg) else {
        return Cow::Borrowed(svg);
    };

    let mut out = String::with_capacity(svg.len() + carried.len());
    out.push_str(&svg[..at]);
    out.push_str(&carried);
    out.push_str(&svg[at..]);
    Cow::Owned(out)
}

/// Render ` name` or ` name="value"`.
fn render_attr(attr: &Attr<'_>) -> String {
    match attr.value {
        None | Some("") => format!(" {}", attr.name),
        Some(value) if !value.contains('"') => format!(" {}=\"{}\"", attr.name, value),
        Some(value) if !value.contains('\'') => format!(" {}='{}'", attr.name, value),
        Some(value) => format!(" {}=\"{}\"", attr.name, value.replace('"', "&quot;")),
    }
}

/// Byte offset just past the root `<svg` token.
fn root_svg_end(svg: &str) -> Option<usize> {
    svg.match_indices("<svg").find_map(|(i, token)| {
        let end = i + token.len();
        match svg.as_bytes().get(end) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => Some(end),
            _ => None,
        }
    })
}
