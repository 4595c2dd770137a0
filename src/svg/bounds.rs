//! SVG bounding box calculation.
//!
//! Calculates the true visual bounds of SVG content including stroke width,
//! so thick strokes at the edges are not clipped by the viewBox.

use usvg::{Rect, Size, Tree};

/// Union of the stroke-inclusive bounding boxes of all top-level nodes,
/// in the coordinate space of the written viewBox.
///
/// Returns `None` if the tree has no visible elements.
pub fn calculate_stroke_bounds(tree: &Tree) -> Option<Rect> {
    tree.root()
        .children()
        .iter()
        .map(|node| node.abs_stroke_bounding_box())
        .fold(None, merge_bounds)
}

/// Merge two optional bounding boxes into one
fn merge_bounds(a: Option<Rect>, b: Rect) -> Option<Rect> {
    match a {
        Some(existing) => {
            let min_x = existing.x().min(b.x());
            let min_y = existing.y().min(b.y());
            let max_x = existing.right().max(b.right());
            let max_y = existing.bottom().max(b.bottom());

            Rect::from_xywh(min_x, min_y, max_x - min_x, max_y - min_y)
        }
        None => Some(b),
    }
}

/// Set the viewBox of the root `<svg>` to `bounds`.
pub fn expand_viewbox_to_bounds(svg: &str, bounds: Rect, quote: char) -> String {
    let viewbox = format!(
        "{} {} {} {}",
        bounds.x(),
        bounds.y(),
        bounds.width(),
        bounds.height()
    );
    replace_viewbox(svg, &viewbox, quote)
}

/// Add a `0 0 width height` viewBox if the root `<svg>` has none.
///
/// The usvg writer folds the source viewBox into a root transform, so its
/// output is only scalable with one put back.
pub fn ensure_viewbox(svg: &str, size: Size, quote: char) -> String {
    if find_viewbox(svg).is_some() {
        return svg.to_string();
    }
    let viewbox = format!("0 0 {} {}", size.width(), size.height());
    replace_viewbox(svg, &viewbox, quote)
}

/// Byte range of the viewBox value and its quote character.
fn find_viewbox(svg: &str) -> Option<(usize, usize, char)> {
    ['"', '\''].into_iter().find_map(|quote| {
        let needle = format!("viewBox={quote}");
        let value_start = svg.find(&needle)? + needle.len();
        let len = svg[value_start..].find(quote)?;
        Some((value_start, value_start + len, quote))
    })
}

/// Replace the viewBox attribute, or add one after `<svg` quoted with `quote`.
fn replace_viewbox(svg: &str, viewbox: &str, quote: char) -> String {
    if let Some((start, end, _)) = find_viewbox(svg) {
        return format!("{}{}{}", &svg[..start], viewbox, &svg[end..]);
    }

    // No viewBox found, add one after <svg
    if let Some(tag) = svg.find("<svg") {
        let insert_at = tag + 4;
        return format!(
            "{} viewBox={quote}{}{quote}{}",
            &svg[..insert_at],
            viewbox,
            &svg[insert_at..]
        );
    }

    svg.to_string()
}
