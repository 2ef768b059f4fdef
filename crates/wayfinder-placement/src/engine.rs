#![forbid(unsafe_code)]

//! Positioning a live tip against its anchor.
//!
//! # Algorithm
//!
//! 1. Measure the tip and compute the provisional offset for the placement.
//! 2. Add the tip's own top/left CSS margins.
//! 3. Apply the offset rounded to whole pixels, then measure again: the tip
//!    may reflow once it is moved.
//! 4. For `top` placements, keep the bottom edge glued to the anchor when the
//!    height changed.
//! 5. Add the viewport correction on the axis perpendicular to the
//!    placement and apply the final offset.
//!
//! Without an anchor nothing is measured or moved.

use wayfinder_core::geometry::{Offset, Viewport};
use wayfinder_core::host::{Anchor, MarginEdge, TipSurface};
use wayfinder_core::step::Placement;

use crate::offset::{anchor_box, compute_offset, parse_css_px, scroll_target, viewport_delta};

/// Places tips next to anchors, keeping them inside the viewport.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlacementEngine {
    padding: f64,
}

impl PlacementEngine {
    /// Engine with no viewport padding.
    pub const fn new() -> Self {
        Self { padding: 0.0 }
    }

    /// Distance kept between the tip and the viewport edges.
    ///
    /// Negative or non-finite values are treated as 0.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = if padding.is_finite() && padding > 0.0 {
            padding
        } else {
            0.0
        };
        self
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    /// Position `tip` on `placement`'s side of `anchor`.
    ///
    /// Returns the final offset, or `None` (tip untouched) without an anchor.
    pub fn position<T>(
        &self,
        placement: Placement,
        anchor: Option<&Anchor>,
        viewport: &Viewport,
        tip: &mut T,
    ) -> Option<Offset>
    where
        T: TipSurface + ?Sized,
    {
        let Some(anchor) = anchor else {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "wayfinder.placement", "no anchor; placement skipped");
            return None;
        };

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            target: "wayfinder.placement",
            "placement.position",
            placement = placement.as_str(),
            document_root = anchor.is_document_root(),
        )
        .entered();

        let before = tip.measure();
        let target = anchor_box(anchor, viewport);
        let mut offset = compute_offset(placement, target, before.width, before.height);

        offset = offset.translate(Offset::new(
            margin_px(tip, MarginEdge::Top),
            margin_px(tip, MarginEdge::Left),
        ));
        tip.apply_offset(offset.rounded());

        let after = tip.measure();
        if placement == Placement::Top && after.height != before.height {
            offset.top += before.height - after.height;
        }

        let delta = viewport_delta(
            placement,
            offset,
            after.width,
            after.height,
            viewport,
            self.padding,
        );
        let offset = offset.translate(delta).rounded();
        tip.apply_offset(offset);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target: "wayfinder.placement",
            top = offset.top,
            left = offset.left,
            delta_top = delta.top,
            delta_left = delta.left,
            "placement.applied"
        );
        Some(offset)
    }

    /// Scroll position centring a step whose top edge is at `node_top`.
    pub fn scroll_target(&self, node_top: f64, viewport: &Viewport) -> f64 {
        scroll_target(node_top, viewport.height)
    }
}

fn margin_px<T: TipSurface + ?Sized>(tip: &T, edge: MarginEdge) -> f64 {
    tip.margin(edge).as_deref().map_or(0.0, parse_css_px)
}
