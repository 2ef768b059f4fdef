#![forbid(unsafe_code)]

//! Pure offset arithmetic.

use wayfinder_core::geometry::{Offset, Rect, Viewport};
use wayfinder_core::host::Anchor;
use wayfinder_core::step::Placement;

/// Provisional top-left of a `tip_width` × `tip_height` tip placed on
/// `placement`'s side of `anchor`.
///
/// Vertical placements centre the tip horizontally on the anchor; horizontal
/// placements centre it vertically.
pub fn compute_offset(placement: Placement, anchor: Rect, tip_width: f64, tip_height: f64) -> Offset {
    match placement {
        Placement::Bottom => Offset::new(
            anchor.top + anchor.height,
            anchor.left + anchor.width / 2.0 - tip_width / 2.0,
        ),
        Placement::Top => Offset::new(
            anchor.top - tip_height,
            anchor.left + anchor.width / 2.0 - tip_width / 2.0,
        ),
        Placement::Left => Offset::new(
            anchor.top + anchor.height / 2.0 - tip_height / 2.0,
            anchor.left - tip_width,
        ),
        Placement::Right => Offset::new(
            anchor.top + anchor.height / 2.0 - tip_height / 2.0,
            anchor.left + anchor.width,
        ),
    }
}

/// Box to place against.
///
/// The document root's own box is unreliable, so it is replaced by the
/// visible viewport.
pub fn anchor_box(anchor: &Anchor, viewport: &Viewport) -> Rect {
    if anchor.is_document_root() {
        viewport.visible_rect()
    } else {
        anchor.rect
    }
}

/// Correction that brings the tip back inside the padded viewport.
///
/// Only the axis perpendicular to the placement is corrected: `left`/`right`
/// tips slide vertically, `top`/`bottom` tips slide horizontally. The other
/// component is always zero. A tip larger than the viewport is aligned to the
/// leading edge.
pub fn viewport_delta(
    placement: Placement,
    offset: Offset,
    tip_width: f64,
    tip_height: f64,
    viewport: &Viewport,
    padding: f64,
) -> Offset {
    let visible = viewport.visible_rect();
    if placement.is_vertical() {
        let leading = offset.left - padding;
        let trailing = offset.left + padding + tip_width;
        Offset::new(0.0, edge_delta(leading, trailing, visible.left, visible.right()))
    } else {
        let leading = offset.top - padding;
        let trailing = offset.top + padding + tip_height;
        Offset::new(edge_delta(leading, trailing, visible.top, visible.bottom()), 0.0)
    }
}

fn edge_delta(leading: f64, trailing: f64, min: f64, max: f64) -> f64 {
    if leading < min {
        min - leading
    } else if trailing > max {
        max - trailing
    } else {
        0.0
    }
}

/// Parse a computed CSS length such as `"12px"` the way `parseInt` would:
/// leading whitespace, an optional sign, then digits. Anything else is 0.
pub fn parse_css_px(raw: &str) -> f64 {
    let s = raw.trim_start();
    let (sign, digits) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    let end = digits
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end]
        .parse::<f64>()
        .map(|value| sign * value)
        .unwrap_or(0.0)
}

/// Scroll position that centres a step whose top edge is at `node_top`.
pub fn scroll_target(node_top: f64, viewport_height: f64) -> f64 {
    (node_top - viewport_height / 2.0).max(0.0).ceil()
}
