#![forbid(unsafe_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use wayfinder_core::geometry::{Offset, Rect, Size, Viewport};
use wayfinder_core::host::{
    Anchor, AnchorResolver, CompletionOracle, MarginEdge, StepAction, StepListener, StepMarkup,
    StepNode, TipSurface, TourHost, Trigger,
};
use wayfinder_core::step::StepDescriptor;

use crate::journal::CallJournal;

// ---------------------------------------------------------------------------
// Page state
// ---------------------------------------------------------------------------

struct Binding {
    id: u64,
    trigger: Trigger,
    action: StepAction,
}

struct PageState {
    anchors: BTreeMap<String, Vec<Rect>>,
    viewport: Viewport,
    tip_size: Size,
    reflow: Option<Size>,
    margins: [Option<String>; 2],
    bindings: Vec<Binding>,
    next_binding: u64,
    inserted: Vec<StepMarkup>,
    visible_nodes: usize,
    offsets: Vec<Offset>,
    scrolls: Vec<f64>,
    announced: Vec<Option<usize>>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            anchors: BTreeMap::new(),
            viewport: Viewport::new(0.0, 0.0, 1024.0, 768.0),
            tip_size: Size::new(200.0, 100.0),
            reflow: None,
            margins: [None, None],
            bindings: Vec::new(),
            next_binding: 0,
            inserted: Vec::new(),
            visible_nodes: 0,
            offsets: Vec::new(),
            scrolls: Vec::new(),
            announced: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// FakeHost
// ---------------------------------------------------------------------------

/// Scripted host page.
///
/// Journal entries: `insert:{step}`, `move:{top},{left}`, `hide:{step}`,
/// `bind:{trigger}`, `detach:{trigger}`, `scroll:{top}`, `announce:{step}`.
#[derive(Clone)]
pub struct FakeHost {
    page: Rc<RefCell<PageState>>,
    journal: CallJournal,
}

impl FakeHost {
    /// Empty page: no anchors, a 1024×768 viewport, 200×100 tips.
    pub fn new(journal: &CallJournal) -> Self {
        Self {
            page: Rc::new(RefCell::new(PageState::default())),
            journal: journal.clone(),
        }
    }

    #[must_use]
    pub fn with_anchor(self, selector: impl Into<String>, rect: Rect) -> Self {
        self.add_anchor(selector, rect);
        self
    }

    #[must_use]
    pub fn with_viewport(self, viewport: Viewport) -> Self {
        self.set_viewport(viewport);
        self
    }

    /// Size every inserted tip measures at.
    #[must_use]
    pub fn with_tip_size(self, size: Size) -> Self {
        self.page.borrow_mut().tip_size = size;
        self
    }

    /// Size tips report after they are first moved.
    #[must_use]
    pub fn with_reflow(self, size: Size) -> Self {
        self.page.borrow_mut().reflow = Some(size);
        self
    }

    /// Computed CSS margins reported by tips.
    #[must_use]
    pub fn with_margins(self, top: Option<&str>, left: Option<&str>) -> Self {
        self.page.borrow_mut().margins = [top.map(str::to_owned), left.map(str::to_owned)];
        self
    }

    /// Add a matching element for `selector` (after any existing matches).
    pub fn add_anchor(&self, selector: impl Into<String>, rect: Rect) {
        self.page
            .borrow_mut()
            .anchors
            .entry(selector.into())
            .or_default()
            .push(rect);
    }

    /// Remove every element matching `selector`.
    pub fn remove_anchor(&self, selector: &str) {
        self.page.borrow_mut().anchors.remove(selector);
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.page.borrow_mut().viewport = viewport;
    }

    // ── Inspection ──────────────────────────────────────────────────────

    pub fn journal(&self) -> &CallJournal {
        &self.journal
    }

    /// Markup of every inserted step, in insertion order.
    pub fn inserted(&self) -> Vec<StepMarkup> {
        self.page.borrow().inserted.clone()
    }

    pub fn last_inserted(&self) -> Option<StepMarkup> {
        self.page.borrow().inserted.last().cloned()
    }

    /// Nodes inserted and not yet hidden.
    pub fn visible_nodes(&self) -> usize {
        self.page.borrow().visible_nodes
    }

    /// Every offset applied to any node, in order.
    pub fn offsets(&self) -> Vec<Offset> {
        self.page.borrow().offsets.clone()
    }

    pub fn scrolls(&self) -> Vec<f64> {
        self.page.borrow().scrolls.clone()
    }

    /// Step numbers announced, in order.
    pub fn announced(&self) -> Vec<Option<usize>> {
        self.page.borrow().announced.clone()
    }

    /// Bindings currently attached.
    pub fn active_bindings(&self) -> Vec<(Trigger, StepAction)> {
        self.page
            .borrow()
            .bindings
            .iter()
            .map(|b| (b.trigger.clone(), b.action))
            .collect()
    }

    pub fn binding_count(&self) -> usize {
        self.page.borrow().bindings.len()
    }

    /// Simulate `trigger` firing: the action of the first attached binding
    /// for it, which the test then dispatches to the controller.
    pub fn fire(&self, trigger: &Trigger) -> Option<StepAction> {
        self.page
            .borrow()
            .bindings
            .iter()
            .find(|b| &b.trigger == trigger)
            .map(|b| b.action)
    }
}

impl AnchorResolver for FakeHost {
    fn resolve(&self, selector: &str) -> Vec<Anchor> {
        self.page
            .borrow()
            .anchors
            .get(selector)
            .map(|rects| rects.iter().copied().map(Anchor::element).collect())
            .unwrap_or_default()
    }

    fn viewport(&self) -> Viewport {
        self.page.borrow().viewport
    }
}

impl TourHost for FakeHost {
    fn insert_step(&mut self, markup: &StepMarkup, _after: Option<&Anchor>) -> Box<dyn StepNode> {
        let (size, reflow, margins) = {
            let mut page = self.page.borrow_mut();
            page.inserted.push(markup.clone());
            page.visible_nodes += 1;
            (page.tip_size, page.reflow, page.margins.clone())
        };
        self.journal.record(format!("insert:{}", markup.step_number));
        Box::new(FakeNode {
            step_number: markup.step_number,
            size,
            reflow,
            margins,
            moved: false,
            hidden: false,
            page: Rc::clone(&self.page),
            journal: self.journal.clone(),
        })
    }

    fn bind(&mut self, trigger: &Trigger, action: StepAction) -> Box<dyn StepListener> {
        let id = {
            let mut page = self.page.borrow_mut();
            let id = page.next_binding;
            page.next_binding += 1;
            page.bindings.push(Binding {
                id,
                trigger: trigger.clone(),
                action,
            });
            id
        };
        self.journal.record(format!("bind:{trigger}"));
        Box::new(FakeListener {
            id,
            label: trigger.to_string(),
            page: Rc::clone(&self.page),
            journal: self.journal.clone(),
            detached: false,
        })
    }

    fn scroll_to(&mut self, top: f64) {
        self.page.borrow_mut().scrolls.push(top);
        self.journal.record(format!("scroll:{top}"));
    }

    fn announce(&mut self, step: &StepDescriptor) {
        self.page.borrow_mut().announced.push(step.step_number);
        let label = step
            .step_number
            .map_or_else(|| "-".to_string(), |n| n.to_string());
        self.journal.record(format!("announce:{label}"));
    }
}

// ---------------------------------------------------------------------------
// Nodes and listeners
// ---------------------------------------------------------------------------

/// A step node inserted by [`FakeHost`].
pub struct FakeNode {
    step_number: usize,
    size: Size,
    reflow: Option<Size>,
    margins: [Option<String>; 2],
    moved: bool,
    hidden: bool,
    page: Rc<RefCell<PageState>>,
    journal: CallJournal,
}

impl TipSurface for FakeNode {
    fn measure(&self) -> Size {
        match self.reflow {
            Some(size) if self.moved => size,
            _ => self.size,
        }
    }

    fn margin(&self, edge: MarginEdge) -> Option<String> {
        match edge {
            MarginEdge::Top => self.margins[0].clone(),
            MarginEdge::Left => self.margins[1].clone(),
        }
    }

    fn apply_offset(&mut self, offset: Offset) {
        self.moved = true;
        self.page.borrow_mut().offsets.push(offset);
        self.journal
            .record(format!("move:{},{}", offset.top, offset.left));
    }
}

impl StepNode for FakeNode {
    fn hide(&mut self) {
        if self.hidden {
            return;
        }
        self.hidden = true;
        let mut page = self.page.borrow_mut();
        page.visible_nodes = page.visible_nodes.saturating_sub(1);
        drop(page);
        self.journal.record(format!("hide:{}", self.step_number));
    }
}

struct FakeListener {
    id: u64,
    label: String,
    page: Rc<RefCell<PageState>>,
    journal: CallJournal,
    detached: bool,
}

impl StepListener for FakeListener {
    fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;
        self.page.borrow_mut().bindings.retain(|b| b.id != self.id);
        self.journal.record(format!("detach:{}", self.label));
    }
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// In-memory completion flag that journals `markComplete` and
/// `clearCompletionFlag`.
#[derive(Clone)]
pub struct RecordingCompletion {
    complete: Rc<Cell<bool>>,
    journal: CallJournal,
}

impl RecordingCompletion {
    pub fn new(journal: &CallJournal) -> Self {
        Self {
            complete: Rc::new(Cell::new(false)),
            journal: journal.clone(),
        }
    }

    /// Start out already complete.
    #[must_use]
    pub fn completed(self) -> Self {
        self.complete.set(true);
        self
    }

    /// Current flag, read without journaling.
    pub fn is_complete(&self) -> bool {
        self.complete.get()
    }
}

impl CompletionOracle for RecordingCompletion {
    fn is_marked_complete(&self) -> bool {
        self.complete.get()
    }

    fn mark_complete(&mut self) {
        self.complete.set(true);
        self.journal.record("markComplete");
    }

    fn clear_completion_flag(&mut self) {
        self.complete.set(false);
        self.journal.record("clearCompletionFlag");
    }
}
