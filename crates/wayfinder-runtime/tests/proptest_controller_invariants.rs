//! Property tests: the controller under arbitrary navigation.
//!
//! 1. Only the shown step's subscriptions are attached on the page.
//! 2. At most one step node is visible.
//! 3. The current step, when set, is one that could be shown.
//! 4. Ending the tour always leaves nothing attached and marks completion.

use proptest::prelude::*;
use wayfinder_core::geometry::Rect;
use wayfinder_core::host::StepAction;
use wayfinder_core::step::StepSpec;
use wayfinder_harness::{CallJournal, FakeHost, RecordingCompletion};
use wayfinder_runtime::{TourConfiguration, TourController};

#[derive(Debug, Clone)]
enum Op {
    Start(Option<usize>),
    Goto(usize),
    Dispatch(StepAction),
    Hide,
    Show,
    Restart,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        proptest::option::of(0usize..8).prop_map(Op::Start),
        (0usize..10).prop_map(Op::Goto),
        prop_oneof![
            Just(StepAction::Next),
            Just(StepAction::Previous),
            Just(StepAction::End)
        ]
        .prop_map(Op::Dispatch),
        Just(Op::Hide),
        Just(Op::Show),
        Just(Op::Restart),
    ]
}

#[derive(Debug, Clone)]
struct Case {
    present: Vec<bool>,
    click: Vec<bool>,
    orphan: Vec<bool>,
    ops: Vec<Op>,
}

fn case() -> impl Strategy<Value = Case> {
    (1usize..8).prop_flat_map(|n| {
        (
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec(any::<bool>(), n),
            proptest::collection::vec(op(), 0..24),
        )
            .prop_map(|(present, click, orphan, ops)| Case {
                present,
                click,
                orphan,
                ops,
            })
    })
}

fn build(case: &Case) -> (FakeHost, RecordingCompletion, TourController) {
    let journal = CallJournal::new();
    let host = FakeHost::new(&journal);
    let mut config = TourConfiguration::new().tour_name("prop");
    for i in 0..case.present.len() {
        let selector = format!("#s{i}");
        if case.present[i] {
            host.add_anchor(&selector, Rect::new(40.0 * i as f64, 20.0, 80.0, 20.0));
        }
        config = config.step(
            StepSpec::new()
                .target(selector)
                .move_on_click(case.click[i])
                .orphan(case.orphan[i]),
        );
    }
    let completion = RecordingCompletion::new(&journal);
    let tour = TourController::with_config(
        Box::new(host.clone()),
        Box::new(completion.clone()),
        config,
    );
    (host, completion, tour)
}

proptest! {
    #[test]
    fn navigation_keeps_page_consistent(case in case()) {
        let (host, completion, mut tour) = build(&case);
        for op in &case.ops {
            let result = match *op {
                Op::Start(at) => tour.start_tour(at),
                Op::Goto(n) => tour.goto_step(n),
                Op::Dispatch(action) => tour.dispatch(action),
                Op::Hide => {
                    tour.hide();
                    Ok(())
                }
                Op::Show => tour.show(),
                Op::Restart => tour.restart_tour(),
            };
            prop_assert!(result.is_ok());

            prop_assert_eq!(host.binding_count(), tour.listener_count());
            prop_assert!(host.visible_nodes() <= 1);
            prop_assert_eq!(host.visible_nodes() == 1, tour.is_showing());
            if let Some(i) = tour.current_step_number() {
                prop_assert!(i < case.present.len());
            }
            // Next/previous only land on reachable steps; explicit jumps may not.
            if let (Op::Dispatch(_), true) = (op, tour.is_showing()) {
                let i = tour.current_step_number().unwrap();
                prop_assert!(case.present[i] || case.orphan[i]);
            }
        }

        tour.end_tour().unwrap();
        prop_assert_eq!(host.binding_count(), 0);
        prop_assert_eq!(host.visible_nodes(), 0);
        prop_assert!(completion.is_complete());
    }
}
