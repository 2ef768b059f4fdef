//! Property-based invariant tests for step sequencing.
//!
//! Verifies:
//!
//! 1. **Monotonic scans**: `next(i)` is `None` or strictly greater than `i`;
//!    `previous(i)` is `None` or strictly smaller.
//! 2. **Nearest reachable**: every index skipped by a scan is unreachable.
//! 3. **Boundary duality**: `is_first_step(i)` ≡ `previous(i).is_none()` and
//!    `is_last_step(i)` ≡ `next(i).is_none()`.
//! 4. **Normalization keeps canonical keys**: defaults built from any partial
//!    carry exactly the six canonical keys.

use proptest::prelude::*;
use wayfinder_core::geometry::{Rect, Viewport};
use wayfinder_core::host::{Anchor, AnchorResolver};
use wayfinder_core::sequence::StepSequencer;
use wayfinder_core::step::{StepDefaults, StepSpec};

// ── Helpers ─────────────────────────────────────────────────────────────

/// Resolver where `#s{i}` matches iff `present[i]`.
struct Page(Vec<bool>);

impl AnchorResolver for Page {
    fn resolve(&self, selector: &str) -> Vec<Anchor> {
        let hit = selector
            .strip_prefix("#s")
            .and_then(|n| n.parse::<usize>().ok())
            .and_then(|i| self.0.get(i).copied())
            .unwrap_or(false);
        if hit {
            vec![Anchor::element(Rect::new(0.0, 0.0, 20.0, 20.0))]
        } else {
            Vec::new()
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(0.0, 0.0, 1280.0, 720.0)
    }
}

#[derive(Debug, Clone)]
struct StepCase {
    present: bool,
    delay: u64,
    orphan: bool,
}

fn step_case() -> impl Strategy<Value = StepCase> {
    (any::<bool>(), prop_oneof![Just(0u64), 1u64..500], prop::bool::weighted(0.2)).prop_map(
        |(present, delay, orphan)| StepCase {
            present,
            delay,
            orphan,
        },
    )
}

fn build(cases: &[StepCase]) -> (Vec<StepSpec>, Page) {
    let steps = cases
        .iter()
        .enumerate()
        .map(|(i, c)| {
            StepSpec::new()
                .target(format!("#s{i}"))
                .delay_ms(c.delay)
                .orphan(c.orphan)
        })
        .collect();
    let page = Page(cases.iter().map(|c| c.present).collect());
    (steps, page)
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn next_is_strictly_forward_and_nearest(cases in prop::collection::vec(step_case(), 0..24)) {
        let (steps, page) = build(&cases);
        let defaults = StepDefaults::library();
        let seq = StepSequencer::new(&steps, &defaults, &page);

        for i in 0..=steps.len() {
            match seq.next(Some(i)) {
                Some(j) => {
                    prop_assert!(j > i);
                    prop_assert!(seq.is_reachable(j));
                    for skipped in (i + 1)..j {
                        prop_assert!(!seq.is_reachable(skipped));
                    }
                }
                None => {
                    for later in (i + 1)..steps.len() {
                        prop_assert!(!seq.is_reachable(later));
                    }
                }
            }
        }
    }

    #[test]
    fn previous_is_strictly_backward_and_nearest(cases in prop::collection::vec(step_case(), 0..24)) {
        let (steps, page) = build(&cases);
        let defaults = StepDefaults::library();
        let seq = StepSequencer::new(&steps, &defaults, &page);

        for i in 0..=steps.len() {
            match seq.previous(Some(i)) {
                Some(j) => {
                    prop_assert!(j < i);
                    prop_assert!(seq.is_reachable(j));
                    for skipped in (j + 1)..i.min(steps.len()) {
                        prop_assert!(!seq.is_reachable(skipped));
                    }
                }
                None => {
                    for earlier in 0..i.min(steps.len()) {
                        prop_assert!(!seq.is_reachable(earlier));
                    }
                }
            }
        }
    }

    #[test]
    fn boundary_predicates_match_scans(cases in prop::collection::vec(step_case(), 0..16)) {
        let (steps, page) = build(&cases);
        let defaults = StepDefaults::library();
        let seq = StepSequencer::new(&steps, &defaults, &page);

        for i in 0..steps.len() {
            prop_assert_eq!(seq.is_first_step(Some(i)), seq.previous(Some(i)).is_none());
            prop_assert_eq!(seq.is_last_step(Some(i)), seq.next(Some(i)).is_none());
        }
    }

    #[test]
    fn reachability_matches_policy(cases in prop::collection::vec(step_case(), 1..16)) {
        let (steps, page) = build(&cases);
        let defaults = StepDefaults::library();
        let seq = StepSequencer::new(&steps, &defaults, &page);

        for (i, case) in cases.iter().enumerate() {
            let expected = case.delay > 0 || case.orphan || case.present;
            prop_assert_eq!(seq.is_reachable(i), expected);
        }
    }

    #[test]
    fn defaults_always_carry_canonical_keys(
        delay in prop::option::of(0u64..10_000),
        orphan in prop::option::of(any::<bool>()),
        extra in prop::option::of("[a-z]{1,8}"),
    ) {
        let mut partial = StepSpec::new();
        partial.delay_ms = delay;
        partial.orphan = orphan;
        if let Some(key) = &extra {
            partial = partial.with_extra(format!("x{key}"), serde_json::json!(1));
        }
        let defaults = StepDefaults::from_partial(&partial);
        for key in StepDefaults::CANONICAL_KEYS {
            prop_assert!(defaults.contains_key(key), "missing {}", key);
        }
    }
}
