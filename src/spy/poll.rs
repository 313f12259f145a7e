//! Intersection tracking by sampling scroll position.
//!
//! For hosts without a native visibility facility. Each call to
//! [`PollingWatcher::sample`] compares every target against the current root
//! rectangle and reports the targets whose crossing state changed since the
//! previous sample, in observation order.
//!
//! As with `IntersectionObserver`, `is_intersecting` reflects geometry only.
//! The threshold decides when an entry is delivered, not what it says.

use super::host::IntersectionEntry;
use super::margin::{Rect, WatcherOptions};

#[derive(Debug, Clone)]
struct Tracked {
    id: String,
    rect: Rect,
    /// `None` until the first sample after observation.
    last: Option<Crossing>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Crossing {
    intersecting: bool,
    above_threshold: bool,
}

#[derive(Debug, Clone)]
pub struct PollingWatcher {
    options: WatcherOptions,
    targets: Vec<Tracked>,
}

impl PollingWatcher {
    pub fn new(options: WatcherOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    pub fn options(&self) -> &WatcherOptions {
        &self.options
    }

    /// Track `id` with its layout rectangle in document coordinates.
    /// Already tracked ids are left untouched.
    pub fn observe(&mut self, id: &str, rect: Rect) {
        if self.targets.iter().any(|t| t.id == id) {
            return;
        }
        self.targets.push(Tracked {
            id: id.to_string(),
            rect,
            last: None,
        });
    }

    pub fn unobserve(&mut self, id: &str) {
        self.targets.retain(|t| t.id != id);
    }

    pub fn disconnect(&mut self) {
        self.targets.clear();
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Compare every target with `viewport` (the root before margins) and
    /// return the entries whose state changed.
    pub fn sample(&mut self, viewport: Rect) -> Vec<IntersectionEntry> {
        let root = self.options.root_margin.apply(viewport);
        let threshold = self.options.threshold;

        let mut batch = Vec::new();
        for target in &mut self.targets {
            let hit = target.rect.intersect(&root);
            let ratio = match hit {
                Some(area) if target.rect.area() > 0.0 => area.area() / target.rect.area(),
                Some(_) => 1.0,
                None => 0.0,
            };
            let intersecting = hit.is_some();
            let crossing = Crossing {
                intersecting,
                above_threshold: intersecting && ratio >= threshold,
            };

            if target.last != Some(crossing) {
                target.last = Some(crossing);
                batch.push(IntersectionEntry {
                    target_id: target.id.clone(),
                    is_intersecting: intersecting,
                    intersection_ratio: ratio,
                });
            }
        }
        batch
    }
}
