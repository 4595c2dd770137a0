//! HTML markup helpers.
//!
//! - [`parse`]: snapshot parsing with exact byte spans (backed by `tl`)
//! - `is_void_element()` - elements without content (img, br, ...)
//! - `is_raw_text_element()` - elements whose content is text (script, ...)
//! - `open_tag()` - split an element's source into tag name and attributes
//! - `parse_attributes()` - borrowed attribute lexing in source order

mod parse;

pub use parse::{ParsedNode, Snapshot, Span};

// =============================================================================
// Attributes
// =============================================================================

/// A single attribute as written in the source.
///
/// `value` is `None` for bare attributes (`<img inline>`). Values are the
/// raw source text between the quotes; entities are not decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attr<'a> {
    pub name: &'a str,
    pub value: Option<&'a str>,
}

impl<'a> Attr<'a> {
    pub const fn new(name: &'a str, value: Option<&'a str>) -> Self {
        Self { name, value }
    }

    /// Check the attribute name, ASCII case-insensitively.
    #[inline]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// Check if an HTML tag is a void element (no content, no end tag).
#[inline]
pub fn is_void_element(tag: &str) -> bool {
    const VOID: [&str; 13] = [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ];
    VOID.iter().any(|void| tag.eq_ignore_ascii_case(void))
}

/// Check if an HTML tag holds raw or escapable raw text.
///
/// Their content is never markup, even when it looks like a tag.
#[inline]
pub fn is_raw_text_element(tag: &str) -> bool {
    const RAW_TEXT: [&str; 8] = [
        "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes",
    ];
    RAW_TEXT.iter().any(|raw| tag.eq_ignore_ascii_case(raw))
}

/// Split the source of an element into its tag name and attribute text.
///
/// Input: `<img inline source="a.svg">...`
/// Output: `("img", " inline source=\"a.svg\"")`
///
/// The attribute text ends at the first `>` outside a quoted value.
pub fn open_tag(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix('<')?;
    let name_end = rest
        .find(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>')
        .unwrap_or(rest.len());
    if name_end == 0 {
        return None;
    }

    let bytes = rest.as_bytes();
    let mut quote = None;
    let mut i = name_end;
    while i < bytes.len() {
        match (quote, bytes[i]) {
            (None, b'>') => return Some((&rest[..name_end], &rest[name_end..i])),
            (None, q @ (b'"' | b'\'')) => quote = Some(q),
            (Some(q), b) if b == q => quote = None,
            _ => {}
        }
        i += 1;
    }
    None
}

/// Parse HTML-style attributes from a string, borrowing from it.
///
/// Input: `viewBox="0 0 100 100" class='foo' width=3 disabled /`
/// Output: `[viewBox="0 0 100 100", class="foo", width="3", disabled]`
///
/// A `/` where an attribute name would start is skipped, as in the HTML
/// tokenizer (`<img src="a.svg" />`).
pub fn parse_attributes(s: &str) -> Vec<Attr<'_>> {
    let bytes = s.as_bytes();
    let mut attrs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() || bytes[i] == b'/' {
            i += 1;
            continue;
        }

        // Read attribute name
        let name_start = i;
        while i < bytes.len() && !matches!(bytes[i], b'=' | b'/' | b'>') {
            if bytes[i].is_ascii_whitespace() {
                break;
            }
            i += 1;
        }
        // `=` can start a name (`<img =x>`), never leave it empty
        if i == name_start {
            i += 1;
        }
        let name = &s[name_start..i];

        let mut j = skip_whitespace(bytes, i);
        if j >= bytes.len() || bytes[j] != b'=' {
            attrs.push(Attr::new(name, None));
            i = j;
            continue;
        }

        j = skip_whitespace(bytes, j + 1);
        let value = match bytes.get(j) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = j + 1;
                let end = bytes[start..]
                    .iter()
                    .position(|&b| b == quote)
                    .map_or(bytes.len(), |p| start + p);
                i = (end + 1).min(bytes.len());
                &s[start..end]
            }
            _ => {
                // Unquoted value (read until whitespace)
                let start = j;
                let mut end = j;
                while end < bytes.len() && !bytes[end].is_ascii_whitespace() && bytes[end] != b'>'
                {
                    end += 1;
                }
                i = end;
                &s[start..end]
            }
        };
        attrs.push(Attr::new(name, Some(value)));
    }

    attrs
}

#[inline]
fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("img"));
        assert!(is_void_element("IMG"));
        assert!(is_void_element("br"));
        assert!(!is_void_element("svg"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn test_raw_text_elements() {
        assert!(is_raw_text_element("script"));
        assert!(is_raw_text_element("STYLE"));
        assert!(is_raw_text_element("textarea"));
        assert!(!is_raw_text_element("div"));
        assert!(!is_raw_text_element("svg"));
    }

    #[test]
    fn test_open_tag_simple() {
        assert_eq!(open_tag("<br>"), Some(("br", "")));
        assert_eq!(
            open_tag(r#"<img inline source="a.svg">"#),
            Some(("img", r#" inline source="a.svg""#))
        );
    }

    #[test]
    fn test_open_tag_ignores_gt_in_quotes() {
        assert_eq!(
            open_tag(r#"<img alt="a > b" src='x>y'>tail"#),
            Some(("img", r#" alt="a > b" src='x>y'"#))
        );
    }

    #[test]
    fn test_open_tag_rejects_non_tags() {
        assert_eq!(open_tag("img>"), None);
        assert_eq!(open_tag("< img>"), None);
        assert_eq!(open_tag("<img src=\"a"), None);
    }

    #[test]
    fn test_parse_attributes() {
        let attrs = parse_attributes(r#"a="1" b='2' c=3 disabled"#);
        assert_eq!(
            attrs,
            vec![
                Attr::new("a", Some("1")),
                Attr::new("b", Some("2")),
                Attr::new("c", Some("3")),
                Attr::new("disabled", None),
            ]
        );
    }

    #[test]
    fn test_parse_attributes_keeps_source_order_and_case() {
        let attrs = parse_attributes(r#" inline source="a.svg" Class="x" id="y""#);
        let names: Vec<_> = attrs.iter().map(|a| a.name).collect();
        assert_eq!(names, ["inline", "source", "Class", "id"]);
        assert!(attrs[2].is("class"));
    }

    #[test]
    fn test_parse_attributes_self_closing_slash() {
        let attrs = parse_attributes(r#" src="a.svg" /"#);
        assert_eq!(attrs, vec![Attr::new("src", Some("a.svg"))]);

        // Unquoted values keep their slash
        let attrs = parse_attributes(" src=a.svg/");
        assert_eq!(attrs, vec![Attr::new("src", Some("a.svg/"))]);
    }

    #[test]
    fn test_parse_attributes_empty_and_spaced_values() {
        let attrs = parse_attributes(r#"alt="" title = "x y""#);
        assert_eq!(
            attrs,
            vec![Attr::new("alt", Some("")), Attr::new("title", Some("x y"))]
        );
    }

    #[test]
    fn test_parse_attributes_entities_untouched() {
        let attrs = parse_attributes(r#"title="a &amp; b""#);
        assert_eq!(attrs, vec![Attr::new("title", Some("a &amp; b"))]);
    }
}
