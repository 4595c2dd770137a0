//! Placeholder source → asset store key.

use std::borrow::Cow;

use percent_encoding::percent_decode_str;

/// The declared source of a placeholder, resolved against its document.
///
/// ```text
/// source               document              candidates
/// /icons/a.svg         blog/post.html        icons/a.svg
/// icons/a.svg?v=2      blog/post.html        blog/icons/a.svg, icons/a.svg
/// ../a%20b.svg         blog/post.html        a b.svg
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Source value as written by the author.
    pub declared: String,
    /// Store keys to try, in order.
    pub candidates: Vec<String>,
}

impl AssetRef {
    /// Resolve `source` for the document at `filename`.
    ///
    /// `base` is the public path prefix of the output root (usually `/`).
    pub fn new(source: &str, filename: &str, base: &str) -> Self {
        let path = source.split(['?', '#']).next().unwrap_or_default();
        let path: Cow<'_, str> = percent_decode_str(path)
            .decode_utf8()
            .unwrap_or(Cow::Borrowed(path));

        let mut candidates = Vec::with_capacity(2);
        match strip_base(&path, base) {
            Some(rooted) => candidates.push(normalize(rooted)),
            None => {
                let dir = filename
                    .replace('\\', "/")
                    .rsplit_once('/')
                    .map(|(dir, _)| dir.to_string())
                    .unwrap_or_default();
                candidates.push(normalize(&format!("{dir}/{path}")));
                candidates.push(normalize(&path));
            }
        }
        candidates.dedup();

        Self {
            declared: source.to_string(),
            candidates,
        }
    }
}

/// Strip the public base prefix, if `path` is rooted under it.
fn strip_base<'a>(path: &'a str, base: &str) -> Option<&'a str> {
    let base = base.trim_end_matches('/');
    let rest = path.strip_prefix(base)?;
    rest.starts_with('/').then(|| rest.trim_start_matches('/'))
}

/// Collapse `.`, `..` and empty segments into a store key.
fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}
