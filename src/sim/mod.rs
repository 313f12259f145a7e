//! In-memory document for driving the scroll-spy without a browser.
//!
//! [`SimDocument`] implements [`TocHost`] over a [`Layout`]. Its watchers
//! are [`PollingWatcher`]s sampled whenever the viewport moves, so
//! notification batches arrive in observation order the same way a native
//! facility would deliver them.

mod layout;

pub use layout::{Finding, Heading, Layout, NavPanel, TocLink, Viewport};

use crate::spy::{
    BatchHandler, IntersectionEntry, PollingWatcher, Rect, ScrollIntoView, TocHost,
    VisibilityWatcher, WatchError, WatcherOptions, align,
};
use log::trace;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Handle to a link in a specific layout. Handles from a replaced layout
/// are inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkRef {
    index: usize,
    generation: u64,
}

/// State after one simulated scroll step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepReport {
    pub scroll_y: f64,
    /// `href`s carrying the active class; at most one entry.
    pub active: Vec<String>,
    pub nav_top: f64,
    pub nav_left: f64,
}

/// A heading element resolved by id.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetRef {
    id: String,
    rect: Rect,
}

#[derive(Debug)]
struct DocState {
    layout: Layout,
    generation: u64,
    scroll_y: f64,
    nav_top: f64,
    nav_left: f64,
}

struct WatcherSlot {
    id: u64,
    poll: RefCell<PollingWatcher>,
    handler: RefCell<BatchHandler>,
}

struct Inner {
    state: RefCell<DocState>,
    watchers: RefCell<Vec<Rc<WatcherSlot>>>,
    next_watcher: Cell<u64>,
    peak_watchers: Cell<usize>,
}

#[derive(Clone)]
pub struct SimDocument {
    inner: Rc<Inner>,
}

impl SimDocument {
    pub fn new(layout: Layout) -> Self {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(DocState {
                    layout,
                    generation: 0,
                    scroll_y: 0.0,
                    nav_top: 0.0,
                    nav_left: 0.0,
                }),
                watchers: RefCell::new(Vec::new()),
                next_watcher: Cell::new(0),
                peak_watchers: Cell::new(0),
            }),
        }
    }

    /// Swap in a new document, as a client-side navigation would. Scroll
    /// positions reset; existing watchers stay live until disconnected.
    pub fn replace_layout(&self, layout: Layout) {
        let mut state = self.inner.state.borrow_mut();
        state.layout = layout;
        state.generation += 1;
        state.scroll_y = 0.0;
        state.nav_top = 0.0;
        state.nav_left = 0.0;
    }

    pub fn layout(&self) -> Layout {
        self.inner.state.borrow().layout.clone()
    }

    pub fn scroll_y(&self) -> f64 {
        self.inner.state.borrow().scroll_y
    }

    /// Move the viewport (clamped to the document) and deliver any
    /// resulting notification batches.
    pub fn scroll_to(&self, y: f64) {
        {
            let mut state = self.inner.state.borrow_mut();
            let max = (state.layout.document_height() - state.layout.viewport.height).max(0.0);
            state.scroll_y = y.clamp(0.0, max);
        }
        self.flush();
    }

    /// Sample every live watcher against the current viewport and invoke
    /// the handlers of those with a non-empty batch.
    pub fn flush(&self) {
        let viewport = self.viewport_rect();
        for slot in self.live_slots() {
            let batch = slot.poll.borrow_mut().sample(viewport);
            if !batch.is_empty() {
                trace!("watcher {} delivering {} entries", slot.id, batch.len());
                (slot.handler.borrow_mut())(&batch);
            }
        }
    }

    /// Hand a batch straight to every live watcher's handler, bypassing
    /// geometry.
    pub fn deliver(&self, entries: &[IntersectionEntry]) {
        for slot in self.live_slots() {
            (slot.handler.borrow_mut())(entries);
        }
    }

    /// Scroll to each offset in turn and record which links carry
    /// `active_class` afterwards.
    pub fn run(&self, steps: &[f64], active_class: &str) -> Vec<StepReport> {
        steps
            .iter()
            .map(|&y| {
                self.scroll_to(y);
                let (nav_top, nav_left) = self.nav_scroll();
                StepReport {
                    scroll_y: self.scroll_y(),
                    active: self.links_with_class(active_class),
                    nav_top,
                    nav_left,
                }
            })
            .collect()
    }

    pub fn live_watchers(&self) -> usize {
        self.inner.watchers.borrow().len()
    }

    /// Most watchers ever live at the same time.
    pub fn peak_watchers(&self) -> usize {
        self.inner.peak_watchers.get()
    }

    /// `href`s of the links carrying `class`, in document order.
    pub fn links_with_class(&self, class: &str) -> Vec<String> {
        let state = self.inner.state.borrow();
        state
            .layout
            .links
            .iter()
            .filter(|link| link.has_class(class))
            .map(|link| link.href.clone().unwrap_or_default())
            .collect()
    }

    pub fn active_links(&self) -> Vec<String> {
        self.links_with_class("active")
    }

    pub fn link_has_class(&self, index: usize, class: &str) -> bool {
        self.inner
            .state
            .borrow()
            .layout
            .links
            .get(index)
            .is_some_and(|link| link.has_class(class))
    }

    /// Navigation panel scroll offsets as `(top, left)`.
    pub fn nav_scroll(&self) -> (f64, f64) {
        let state = self.inner.state.borrow();
        (state.nav_top, state.nav_left)
    }

    fn viewport_rect(&self) -> Rect {
        let state = self.inner.state.borrow();
        let viewport = &state.layout.viewport;
        Rect::new(0.0, state.scroll_y, viewport.width, viewport.height)
    }

    fn live_slots(&self) -> Vec<Rc<WatcherSlot>> {
        self.inner.watchers.borrow().clone()
    }

    fn remove_watcher(&self, id: u64) {
        self.inner.watchers.borrow_mut().retain(|slot| slot.id != id);
    }
}

/// Parse a descendant chain of class selectors such as
/// `.toc-list .toc-link` or `.nav.sidebar .item`. Returns `None` for
/// anything else.
fn parse_class_selector(selector: &str) -> Option<Vec<Vec<&str>>> {
    let compounds = selector
        .split_whitespace()
        .map(|compound| {
            let classes = compound.strip_prefix('.')?.split('.').collect::<Vec<_>>();
            if classes.iter().any(|c| c.is_empty()) {
                None
            } else {
                Some(classes)
            }
        })
        .collect::<Option<Vec<_>>>()?;
    (!compounds.is_empty()).then_some(compounds)
}

impl TocHost for SimDocument {
    type Link = LinkRef;
    type Target = TargetRef;
    type Watcher = SimWatcher;

    fn query_links(&self, selector: &str) -> Vec<LinkRef> {
        let Some(compounds) = parse_class_selector(selector) else {
            trace!("unsupported selector '{}'", selector);
            return Vec::new();
        };
        let Some((own, ancestors)) = compounds.split_last() else {
            return Vec::new();
        };

        let state = self.inner.state.borrow();
        let nav = &state.layout.nav;
        let container_matches = ancestors.iter().all(|compound| {
            compound
                .iter()
                .all(|c| nav.classes.iter().any(|n| n.as_str() == *c))
        });
        if !container_matches {
            return Vec::new();
        }

        state
            .layout
            .links
            .iter()
            .enumerate()
            .filter(|(_, link)| own.iter().all(|c| link.has_class(c)))
            .map(|(index, _)| LinkRef {
                index,
                generation: state.generation,
            })
            .collect()
    }

    fn href(&self, link: &LinkRef) -> Option<String> {
        let state = self.inner.state.borrow();
        if link.generation != state.generation {
            return None;
        }
        state.layout.links.get(link.index)?.href.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<TargetRef> {
        let state = self.inner.state.borrow();
        let width = state.layout.viewport.width;
        state.layout.heading(id).map(|h| TargetRef {
            id: h.id.clone(),
            rect: Rect::new(0.0, h.top, width, h.height),
        })
    }

    fn set_class(&self, link: &LinkRef, class: &str, on: bool) {
        let mut state = self.inner.state.borrow_mut();
        if link.generation != state.generation {
            return;
        }
        let Some(link) = state.layout.links.get_mut(link.index) else {
            return;
        };
        let present = link.has_class(class);
        if on && !present {
            link.classes.push(class.to_string());
        } else if !on && present {
            link.classes.retain(|c| c != class);
        }
    }

    fn scroll_into_view(&self, link: &LinkRef, options: ScrollIntoView) {
        let mut state = self.inner.state.borrow_mut();
        if link.generation != state.generation {
            return;
        }
        let nav = state.layout.nav.clone();
        let Some(indent) = state.layout.links.get(link.index).map(|l| l.indent) else {
            return;
        };

        let content_height = nav.row_height * state.layout.links.len() as f64;
        let content_width = state
            .layout
            .links
            .iter()
            .map(|l| l.indent + nav.width)
            .fold(nav.width, f64::max);

        let top = align(
            options.block,
            state.nav_top,
            nav.height,
            nav.row_height * link.index as f64,
            nav.row_height,
            content_height,
        );
        let left = align(
            options.inline,
            state.nav_left,
            nav.width,
            indent,
            nav.width,
            content_width,
        );
        state.nav_top = top;
        state.nav_left = left;
    }

    fn create_watcher(
        &self,
        options: &WatcherOptions,
        handler: BatchHandler,
    ) -> Result<SimWatcher, WatchError> {
        let id = self.inner.next_watcher.get();
        self.inner.next_watcher.set(id + 1);

        let slot = Rc::new(WatcherSlot {
            id,
            poll: RefCell::new(PollingWatcher::new(options.clone())),
            handler: RefCell::new(handler),
        });
        let live = {
            let mut watchers = self.inner.watchers.borrow_mut();
            watchers.push(Rc::clone(&slot));
            watchers.len()
        };
        if live > self.inner.peak_watchers.get() {
            self.inner.peak_watchers.set(live);
        }

        Ok(SimWatcher {
            document: self.clone(),
            slot: Some(slot),
        })
    }
}

/// Watcher registered with a [`SimDocument`].
pub struct SimWatcher {
    document: SimDocument,
    slot: Option<Rc<WatcherSlot>>,
}

impl VisibilityWatcher for SimWatcher {
    type Target = TargetRef;

    fn observe(&mut self, target: &TargetRef) {
        if let Some(slot) = &self.slot {
            slot.poll.borrow_mut().observe(&target.id, target.rect);
        }
    }

    fn disconnect(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.poll.borrow_mut().disconnect();
            self.document.remove_watcher(slot.id);
        }
    }
}
