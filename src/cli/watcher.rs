//! File system watcher for `simulate --watch`.
//!
//! Watches the layout file and reports when it has been rewritten, so the
//! simulation can re-bind the scroll-spy the way a client-side navigation
//! would.

use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::{AccessKind, AccessMode, ModifyKind},
};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

pub struct LayoutWatcher {
    // Kept alive for as long as events are wanted
    _watcher: RecommendedWatcher,
    receiver: Receiver<Result<Event, notify::Error>>,
    path: PathBuf,
    /// Debounce: ignore events within this duration of the last reload
    last_reload: Instant,
    debounce_duration: Duration,
}

impl LayoutWatcher {
    /// Start watching `path`.
    pub fn new(path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(tx)?;
        watcher.watch(path, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            path: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
            last_reload: Instant::now(),
            debounce_duration: Duration::from_millis(100),
        })
    }

    /// Block until the file changes. Returns `false` once the watcher has
    /// shut down.
    pub fn wait_for_change(&mut self) -> bool {
        loop {
            match self.receiver.recv_timeout(self.debounce_duration) {
                Ok(Ok(event)) if self.is_relevant_event(&event) => {
                    let now = Instant::now();
                    if now.duration_since(self.last_reload) >= self.debounce_duration {
                        self.last_reload = now;
                        return true;
                    }
                }
                // Watch errors and unrelated events are ignored
                Ok(_) | Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn is_relevant_event(&self, event: &Event) -> bool {
        let matches_path = event
            .paths
            .iter()
            .any(|p| p == &self.path || p.canonicalize().is_ok_and(|c| c == self.path));
        if !matches_path {
            return false;
        }

        matches!(
            event.kind,
            EventKind::Modify(ModifyKind::Data(_))
                | EventKind::Modify(ModifyKind::Any)
                | EventKind::Access(AccessKind::Close(AccessMode::Write))
                | EventKind::Create(_)
        )
    }
}
