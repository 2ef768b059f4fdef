//! Tracing output of the placement engine.

#![cfg(feature = "tracing")]

use std::sync::{Arc, Mutex};

use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use wayfinder_core::geometry::{Offset, Rect, Size, Viewport};
use wayfinder_core::host::{Anchor, TipSurface};
use wayfinder_core::step::Placement;
use wayfinder_placement::PlacementEngine;

#[derive(Default)]
struct Seen {
    position_span: bool,
    applied_event: bool,
    skipped_event: bool,
}

struct Capture {
    seen: Arc<Mutex<Seen>>,
}

impl<S> Layer<S> for Capture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::Id,
        _ctx: Context<'_, S>,
    ) {
        if attrs.metadata().name() == "placement.position" {
            self.seen.lock().expect("trace lock").position_span = true;
        }
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        struct Msg(Option<String>);
        impl tracing::field::Visit for Msg {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = Some(format!("{value:?}").trim_matches('"').to_string());
                }
            }
        }
        if event.metadata().target() != "wayfinder.placement" {
            return;
        }
        let mut msg = Msg(None);
        event.record(&mut msg);
        let mut seen = self.seen.lock().expect("trace lock");
        match msg.0.as_deref() {
            Some("placement.applied") => seen.applied_event = true,
            Some("no anchor; placement skipped") => seen.skipped_event = true,
            _ => {}
        }
    }
}

struct FixedTip;

impl TipSurface for FixedTip {
    fn measure(&self) -> Size {
        Size::new(40.0, 20.0)
    }

    fn apply_offset(&mut self, _offset: Offset) {}
}

#[test]
fn position_emits_span_and_events() {
    let seen = Arc::new(Mutex::new(Seen::default()));
    let subscriber = tracing_subscriber::registry().with(Capture {
        seen: Arc::clone(&seen),
    });
    let _guard = tracing::subscriber::set_default(subscriber);

    let engine = PlacementEngine::new();
    let viewport = Viewport::new(0.0, 0.0, 800.0, 600.0);
    let anchor = Anchor::element(Rect::new(100.0, 100.0, 50.0, 20.0));
    assert!(
        engine
            .position(Placement::Left, Some(&anchor), &viewport, &mut FixedTip)
            .is_some()
    );
    assert!(
        engine
            .position(Placement::Left, None, &viewport, &mut FixedTip)
            .is_none()
    );

    let seen = seen.lock().expect("trace lock");
    assert!(seen.position_span, "expected placement.position span");
    assert!(seen.applied_event, "expected placement.applied event");
    assert!(seen.skipped_event, "expected skip event");
}
