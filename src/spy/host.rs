//! The seam between the scroll-spy and the document it runs in.
//!
//! A host provides two capabilities: querying TOC links and heading
//! targets (and toggling link state), and creating visibility watchers that
//! deliver [`IntersectionEntry`] batches to a registered handler.
//!
//! The browser implementation lives in `crate::web`, the in-memory one in
//! [`crate::sim`].

use super::margin::WatcherOptions;
use super::scroll::ScrollIntoView;
use std::fmt;

/// One visibility change reported by a watcher.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionEntry {
    /// `id` of the observed target element.
    pub target_id: String,
    /// Whether the target currently touches the (margin-adjusted) root.
    pub is_intersecting: bool,
    /// Visible fraction of the target, `0.0..=1.0`.
    pub intersection_ratio: f64,
}

impl IntersectionEntry {
    pub fn new(target_id: impl Into<String>, is_intersecting: bool) -> Self {
        Self {
            target_id: target_id.into(),
            is_intersecting,
            intersection_ratio: if is_intersecting { 1.0 } else { 0.0 },
        }
    }
}

/// Handler invoked with each notification batch, in delivery order.
pub type BatchHandler = Box<dyn FnMut(&[IntersectionEntry])>;

/// The host refused to create a watcher.
#[derive(Debug, Clone)]
pub struct WatchError(pub String);

impl fmt::Display for WatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not create visibility watcher: {}", self.0)
    }
}

impl std::error::Error for WatchError {}

/// A live visibility watcher.
pub trait VisibilityWatcher {
    type Target;

    /// Start watching a target. Watching the same target twice is a no-op.
    fn observe(&mut self, target: &Self::Target);

    /// Stop watching every target. No batches are delivered afterwards.
    fn disconnect(&mut self);
}

/// The document surface a [`ScrollSpyController`](super::ScrollSpyController)
/// operates on.
///
/// Hosts are cheap handles onto shared document state, so they are cloned
/// into the notification handler.
pub trait TocHost: Clone + 'static {
    type Link: Clone + 'static;
    type Target;
    type Watcher: VisibilityWatcher<Target = Self::Target>;

    /// All elements matching the TOC link selector, in document order.
    fn query_links(&self, selector: &str) -> Vec<Self::Link>;

    /// The link's `href` attribute, if present.
    fn href(&self, link: &Self::Link) -> Option<String>;

    /// The element whose `id` equals `id`.
    fn element_by_id(&self, id: &str) -> Option<Self::Target>;

    /// Add or remove `class` on the link.
    fn set_class(&self, link: &Self::Link, class: &str, on: bool);

    /// Scroll the link into view within its nearest scrollable ancestor.
    fn scroll_into_view(&self, link: &Self::Link, options: ScrollIntoView);

    /// Create a watcher that calls `handler` with every batch.
    fn create_watcher(
        &self,
        options: &WatcherOptions,
        handler: BatchHandler,
    ) -> Result<Self::Watcher, WatchError>;
}
