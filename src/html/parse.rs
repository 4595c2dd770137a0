//! Markup snapshots with byte-exact element spans.
//!
//! A [`Snapshot`] borrows one markup string and owns the element tree parsed
//! from it. Every [`ParsedNode`] carries the lifetime of that string, so a
//! tree can never be consulted against a different version of the markup:
//! splicing produces a new `String`, and the old tree dies with its borrow.
//!
//! `tl` does the structural parsing. It is zero-copy, so the raw slice it
//! keeps for each tag points into the snapshot and yields the exact span.

use super::{Attr, is_raw_text_element, is_void_element, open_tag, parse_attributes};
use crate::inline::InlineError;

/// Half-open byte range `start..end` of an element within its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An element of a parsed snapshot.
#[derive(Debug, Clone)]
pub struct ParsedNode<'a> {
    /// Tag name as written in the source.
    pub tag: &'a str,
    /// Attributes in source order.
    pub attrs: Vec<Attr<'a>>,
    pub children: Vec<ParsedNode<'a>>,
    pub span: Span,
}

impl<'a> ParsedNode<'a> {
    /// Check the tag name, ASCII case-insensitively.
    #[inline]
    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// First attribute with the given name.
    pub fn attr(&self, name: &str) -> Option<&Attr<'a>> {
        self.attrs.iter().find(|attr| attr.is(name))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }
}

/// One immutable version of a markup document plus its element tree.
#[derive(Debug)]
pub struct Snapshot<'a> {
    source: &'a str,
    roots: Vec<ParsedNode<'a>>,
}

impl<'a> Snapshot<'a> {
    /// Parse `source` into a fresh element tree.
    pub fn parse(source: &'a str) -> Result<Self, InlineError> {
        let dom = tl::parse(source, tl::ParserOptions::default())
            .map_err(|e| InlineError::Parse(format!("{e:?}")))?;
        let parser = dom.parser();

        let mut roots = Vec::new();
        for handle in dom.children() {
            if let Some(node) = convert(source, *handle, parser)? {
                roots.push(node);
            }
        }

        Ok(Self { source, roots })
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Top-level elements in document order.
    #[inline]
    pub fn roots(&self) -> &[ParsedNode<'a>] {
        &self.roots
    }

    /// Replace the bytes covered by `span` with `replacement`.
    ///
    /// Returns a new document; the snapshot and its spans stay tied to the
    /// old one.
    pub fn splice(&self, span: Span, replacement: &str) -> Result<String, InlineError> {
        let (Some(prefix), Some(suffix)) =
            (self.source.get(..span.start), self.source.get(span.end..))
        else {
            return Err(InlineError::Span {
                start: span.start,
                end: span.end,
                len: self.source.len(),
            });
        };

        let mut out = String::with_capacity(prefix.len() + replacement.len() + suffix.len());
        out.push_str(prefix);
        out.push_str(replacement);
        out.push_str(suffix);
        Ok(out)
    }
}

/// Convert a tl node into a `ParsedNode`, recursing into children.
///
/// Text and comments have no counterpart and yield `None`.
fn convert<'a>(
    source: &'a str,
    handle: tl::NodeHandle,
    parser: &tl::Parser<'a>,
) -> Result<Option<ParsedNode<'a>>, InlineError> {
    let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
        return Ok(None);
    };

    let raw = tag.raw().as_bytes();
    let mut span = span_of(source, raw).ok_or_else(|| {
        InlineError::Parse(format!(
            "element `{}` does not lie within the document",
            tag.name().as_utf8_str()
        ))
    })?;

    let Some((name, attr_text)) = source.get(span.start..span.end).and_then(open_tag) else {
        return Err(InlineError::Parse(format!(
            "malformed opening tag at byte {}",
            span.start
        )));
    };

    // A void element ends with its opening tag, whatever tl nested under it
    if is_void_element(name) {
        span.end = span.start + name.len() + attr_text.len() + 2;
    }

    // tl tokenizes raw text as markup; none of it is an element
    let mut children = Vec::new();
    if !is_raw_text_element(name) {
        for child in tag.children().top().iter() {
            if let Some(node) = convert(source, *child, parser)? {
                children.push(node);
            }
        }
    }

    Ok(Some(ParsedNode {
        tag: name,
        attrs: parse_attributes(attr_text),
        children,
        span,
    }))
}

/// Locate a zero-copy slice within `source`.
fn span_of(source: &str, raw: &[u8]) -> Option<Span> {
    let base = source.as_ptr() as usize;
    let start = (raw.as_ptr() as usize).checked_sub(base)?;
    let end = start.checked_add(raw.len())?;
    (end <= source.len() && source.is_char_boundary(start) && source.is_char_boundary(end))
        .then_some(Span { start, end })
}
