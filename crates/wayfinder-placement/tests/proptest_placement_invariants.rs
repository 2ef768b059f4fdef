//! Property-based invariant tests for tooltip placement.
//!
//! Verifies:
//!
//! 1. **Adjacency**: the provisional offset touches the anchor on the
//!    placement side and is centred on the other axis.
//! 2. **Single-axis correction**: the viewport delta never moves both axes,
//!    and never the axis along the placement direction.
//! 3. **Containment**: a tip that fits inside the padded viewport ends up
//!    inside it on the corrected axis.
//! 4. **Whole pixels**: positioned offsets are always rounded.

use proptest::prelude::*;
use wayfinder_core::geometry::{Offset, Rect, Size, Viewport};
use wayfinder_core::host::{Anchor, TipSurface};
use wayfinder_core::step::Placement;
use wayfinder_placement::{PlacementEngine, compute_offset, viewport_delta};

// ── Strategies ──────────────────────────────────────────────────────────

fn placement() -> impl Strategy<Value = Placement> {
    prop_oneof![
        Just(Placement::Top),
        Just(Placement::Bottom),
        Just(Placement::Left),
        Just(Placement::Right),
    ]
}

fn rect() -> impl Strategy<Value = Rect> {
    (-500.0f64..3000.0, -500.0f64..3000.0, 0.0f64..400.0, 0.0f64..400.0)
        .prop_map(|(top, left, width, height)| Rect::new(top, left, width, height))
}

fn viewport() -> impl Strategy<Value = Viewport> {
    (0.0f64..2000.0, 0.0f64..500.0, 400.0f64..1600.0, 300.0f64..1200.0)
        .prop_map(|(st, sl, w, h)| Viewport::new(st, sl, w, h))
}

struct Tip {
    size: Size,
    last: Option<Offset>,
}

impl TipSurface for Tip {
    fn measure(&self) -> Size {
        self.size
    }

    fn apply_offset(&mut self, offset: Offset) {
        self.last = Some(offset);
    }
}

const EPS: f64 = 1e-6;

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn provisional_offset_touches_anchor(
        p in placement(),
        anchor in rect(),
        w in 1.0f64..300.0,
        h in 1.0f64..300.0,
    ) {
        let o = compute_offset(p, anchor, w, h);
        match p {
            Placement::Bottom => {
                prop_assert!((o.top - anchor.bottom()).abs() < EPS);
                prop_assert!((o.left + w / 2.0 - anchor.center_x()).abs() < EPS);
            }
            Placement::Top => {
                prop_assert!((o.top + h - anchor.top).abs() < EPS);
                prop_assert!((o.left + w / 2.0 - anchor.center_x()).abs() < EPS);
            }
            Placement::Left => {
                prop_assert!((o.left + w - anchor.left).abs() < EPS);
                prop_assert!((o.top + h / 2.0 - anchor.center_y()).abs() < EPS);
            }
            Placement::Right => {
                prop_assert!((o.left - anchor.right()).abs() < EPS);
                prop_assert!((o.top + h / 2.0 - anchor.center_y()).abs() < EPS);
            }
        }
    }

    #[test]
    fn delta_touches_one_axis(
        p in placement(),
        top in -1000.0f64..4000.0,
        left in -1000.0f64..4000.0,
        w in 1.0f64..300.0,
        h in 1.0f64..300.0,
        vp in viewport(),
        padding in 0.0f64..32.0,
    ) {
        let d = viewport_delta(p, Offset::new(top, left), w, h, &vp, padding);
        if p.is_vertical() {
            prop_assert_eq!(d.top, 0.0);
        } else {
            prop_assert_eq!(d.left, 0.0);
        }
    }

    #[test]
    fn fitting_tip_lands_inside_padded_viewport(
        p in placement(),
        top in -1000.0f64..4000.0,
        left in -1000.0f64..4000.0,
        w in 1.0f64..300.0,
        h in 1.0f64..250.0,
        vp in viewport(),
        padding in 0.0f64..20.0,
    ) {
        let o = Offset::new(top, left).translate(viewport_delta(p, Offset::new(top, left), w, h, &vp, padding));
        let visible = vp.visible_rect();
        if p.is_vertical() {
            prop_assert!(o.left - padding >= visible.left - EPS);
            prop_assert!(o.left + w + padding <= visible.right() + EPS);
        } else {
            prop_assert!(o.top - padding >= visible.top - EPS);
            prop_assert!(o.top + h + padding <= visible.bottom() + EPS);
        }
    }

    #[test]
    fn positioned_offsets_are_whole_pixels(
        p in placement(),
        anchor in rect(),
        w in 1.0f64..300.0,
        h in 1.0f64..300.0,
        vp in viewport(),
    ) {
        let mut tip = Tip { size: Size::new(w, h), last: None };
        let out = PlacementEngine::new().position(p, Some(&Anchor::element(anchor)), &vp, &mut tip);
        let out = out.expect("anchor given");
        prop_assert_eq!(out.top, out.top.round());
        prop_assert_eq!(out.left, out.left.round());
        prop_assert_eq!(tip.last, Some(out));
    }
}
