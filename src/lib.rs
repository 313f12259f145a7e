//! # tocspy
//!
//! A table-of-contents scroll-spy: as the reader scrolls, the TOC link for
//! the heading that most recently crossed the middle of the viewport is
//! marked active and kept visible inside its navigation panel.
//!
//! ## Features
//!
//! - One controller, generic over the document it runs in
//! - Idempotent re-initialization for client-side navigation
//! - Browser bindings over `IntersectionObserver` (wasm32)
//! - A scroll-position polling watcher and an in-memory document for
//!   hosts without a native visibility facility
//!
//! ## Example
//!
//! ```rust
//! use tocspy::sim::{Heading, Layout, SimDocument, TocLink};
//! use tocspy::ScrollSpyController;
//!
//! let layout = Layout {
//!     links: vec![
//!         TocLink::new("#intro"),
//!         TocLink::new("#usage"),
//!         TocLink::new("#faq"),
//!     ],
//!     headings: vec![
//!         Heading::new("intro", 0.0, 32.0),
//!         Heading::new("usage", 900.0, 32.0),
//!         Heading::new("faq", 1600.0, 32.0),
//!     ],
//!     ..Layout::default()
//! };
//!
//! let doc = SimDocument::new(layout);
//! let mut spy = ScrollSpyController::new(doc.clone());
//! spy.initialize();
//!
//! doc.scroll_to(600.0);
//! assert_eq!(doc.active_links(), vec!["#usage"]);
//! ```

/// Configuration module for persisting scroll-spy preferences.
pub mod config;

/// Error types for configuration and layout input.
pub mod error;

/// The scroll-spy controller and the host seam it runs against.
pub mod spy;

/// In-memory document driven by scroll-position polling.
pub mod sim;

/// Browser bindings over `web-sys`.
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{Config, SpyConfig};
pub use error::{Error, Result};
pub use spy::{ScrollSpyController, TocHost, VisibilityWatcher};
