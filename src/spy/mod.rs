//! Table-of-contents scroll-spy.
//!
//! This module provides the [`ScrollSpyController`], which keeps exactly one
//! TOC link marked active: the one whose heading most recently crossed the
//! trigger line at the vertical middle of the viewport.
//!
//! The controller is generic over a [`TocHost`], so the same code runs
//! against the browser DOM and against [`crate::sim::SimDocument`].

mod controller;
mod host;
mod index;
mod margin;
mod poll;
mod scroll;

pub use controller::{ObservationSession, ScrollSpyController};
pub use host::{BatchHandler, IntersectionEntry, TocHost, VisibilityWatcher, WatchError};
pub use index::{LinkIndex, slug_from_href};
pub use margin::{Length, Rect, RootMargin, WatcherOptions};
pub use poll::PollingWatcher;
pub use scroll::{Alignment, ScrollIntoView, align};
