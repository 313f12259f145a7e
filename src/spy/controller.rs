//! The scroll-spy controller.
//!
//! Owns at most one observation session. [`ScrollSpyController::initialize`]
//! tears the previous session down, rebuilds the link index from the
//! document, and registers every resolvable heading with a fresh watcher.
//! From then on the watcher's batches drive which link carries the active
//! class.

use super::host::{BatchHandler, IntersectionEntry, TocHost, VisibilityWatcher};
use super::index::LinkIndex;
use super::margin::WatcherOptions;
use super::scroll::ScrollIntoView;
use crate::config::SpyConfig;
use log::{debug, trace, warn};

/// Live watcher plus what it was registered with. Dropping the session
/// disconnects the watcher.
pub struct ObservationSession<W: VisibilityWatcher> {
    watcher: W,
    observed: usize,
}

impl<W: VisibilityWatcher> ObservationSession<W> {
    pub fn observed(&self) -> usize {
        self.observed
    }
}

impl<W: VisibilityWatcher> Drop for ObservationSession<W> {
    fn drop(&mut self) {
        self.watcher.disconnect();
    }
}

/// Handler state moved into the watcher callback.
struct Highlighter<H: TocHost> {
    host: H,
    links: Vec<H::Link>,
    index: LinkIndex<H::Link>,
    active_class: String,
    scroll: ScrollIntoView,
}

impl<H: TocHost> Highlighter<H> {
    fn handle(&self, entries: &[IntersectionEntry]) {
        for entry in entries.iter().filter(|e| e.is_intersecting) {
            for link in &self.links {
                self.host.set_class(link, &self.active_class, false);
            }
            if let Some(link) = self.index.get(&entry.target_id) {
                trace!("activating #{}", entry.target_id);
                self.host.set_class(link, &self.active_class, true);
                self.host.scroll_into_view(link, self.scroll);
            }
        }
    }
}

pub struct ScrollSpyController<H: TocHost> {
    host: H,
    link_selector: String,
    active_class: String,
    options: WatcherOptions,
    scroll: ScrollIntoView,
    session: Option<ObservationSession<H::Watcher>>,
}

impl<H: TocHost> ScrollSpyController<H> {
    /// Controller with the default selector (`.toc-list .toc-link`), class
    /// (`active`) and watcher options.
    pub fn new(host: H) -> Self {
        let config = SpyConfig::default();
        Self {
            host,
            link_selector: config.link_selector,
            active_class: config.active_class,
            options: WatcherOptions::default(),
            scroll: config.scroll,
            session: None,
        }
    }

    /// Controller using a validated configuration.
    pub fn with_config(host: H, config: &SpyConfig) -> crate::Result<Self> {
        let options = config.watcher_options()?;
        Ok(Self {
            host,
            link_selector: config.link_selector.clone(),
            active_class: config.active_class.clone(),
            options,
            scroll: config.scroll,
            session: None,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn options(&self) -> &WatcherOptions {
        &self.options
    }

    /// Whether a watcher is currently live.
    pub fn is_observing(&self) -> bool {
        self.session.is_some()
    }

    /// Number of headings registered with the live watcher.
    pub fn observed_count(&self) -> usize {
        self.session.as_ref().map_or(0, ObservationSession::observed)
    }

    /// Release the current session, if any. Link classes are left as they
    /// are; the next batch after re-initialization settles them.
    pub fn dispose(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(
                "disposing scroll-spy session ({} targets)",
                session.observed()
            );
            drop(session);
        }
    }

    /// (Re)bind the TOC to the current document. Safe to call repeatedly;
    /// never fails.
    pub fn initialize(&mut self) {
        self.dispose();

        let links = self.host.query_links(&self.link_selector);
        if links.is_empty() {
            debug!("no links match '{}', not observing", self.link_selector);
            return;
        }

        let mut index = LinkIndex::new();
        for link in &links {
            index.insert(self.host.href(link).as_deref(), link.clone());
        }
        let slugs: Vec<String> = index.slugs().map(str::to_string).collect();

        let highlighter = Highlighter {
            host: self.host.clone(),
            links,
            index,
            active_class: self.active_class.clone(),
            scroll: self.scroll,
        };
        let handler: BatchHandler =
            Box::new(move |entries: &[IntersectionEntry]| highlighter.handle(entries));

        let mut watcher = match self.host.create_watcher(&self.options, handler) {
            Ok(watcher) => watcher,
            Err(err) => {
                warn!("{}", err);
                return;
            }
        };

        let mut observed = 0;
        for slug in &slugs {
            match self.host.element_by_id(slug) {
                Some(target) => {
                    watcher.observe(&target);
                    observed += 1;
                }
                None => trace!("no element with id '{}', skipping", slug),
            }
        }

        debug!(
            "observing {} of {} TOC targets (rootMargin: {}, threshold: {})",
            observed,
            slugs.len(),
            self.options.root_margin,
            self.options.threshold
        );
        self.session = Some(ObservationSession { watcher, observed });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Heading, Layout, SimDocument, TocLink};

    fn layout(slugs: &[&str], heading_ids: &[&str]) -> Layout {
        Layout {
            links: slugs
                .iter()
                .map(|s| TocLink::new(format!("#{}", s)))
                .collect(),
            headings: heading_ids
                .iter()
                .enumerate()
                .map(|(i, id)| Heading::new(*id, 600.0 * i as f64, 40.0))
                .collect(),
            ..Layout::default()
        }
    }

    fn scenario() -> SimDocument {
        SimDocument::new(layout(
            &["intro", "body", "conclusion"],
            &["intro", "body", "conclusion"],
        ))
    }

    #[test]
    fn test_repeated_initialize_keeps_one_watcher() {
        let doc = scenario();
        let mut spy = ScrollSpyController::new(doc.clone());
        for _ in 0..5 {
            spy.initialize();
            assert_eq!(doc.live_watchers(), 1);
        }
        assert!(spy.is_observing());
        assert_eq!(spy.observed_count(), 3);
        assert_eq!(doc.peak_watchers(), 1);
    }

    #[test]
    fn test_no_links_creates_no_session() {
        let doc = SimDocument::new(layout(&[], &["intro"]));
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        assert!(!spy.is_observing());
        assert_eq!(doc.live_watchers(), 0);
        doc.scroll_to(500.0);
        assert!(doc.active_links().is_empty());
        assert_eq!(doc.nav_scroll(), (0.0, 0.0));
    }

    #[test]
    fn test_no_links_after_navigation_releases_old_watcher() {
        let doc = scenario();
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        doc.replace_layout(layout(&[], &[]));
        spy.initialize();
        assert!(!spy.is_observing());
        assert_eq!(doc.live_watchers(), 0);
    }

    #[test]
    fn test_slug_matching_activates_link() {
        let doc = SimDocument::new(layout(&["section-1", "section-2"], &["section-1", "section-2"]));
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        doc.deliver(&[IntersectionEntry::new("section-2", true)]);
        assert_eq!(doc.active_links(), vec!["#section-2"]);
    }

    #[test]
    fn test_orphan_slug_never_activates() {
        let doc = SimDocument::new(layout(&["intro", "missing"], &["intro"]));
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        assert_eq!(spy.observed_count(), 1);
        for y in [0.0, 300.0, 900.0, 5000.0] {
            doc.scroll_to(y);
            assert!(!doc.active_links().contains(&"#missing".to_string()));
        }
        // An entry for an id no link points at only clears the highlight
        doc.deliver(&[IntersectionEntry::new("stray", true)]);
        assert!(doc.active_links().is_empty());
    }

    #[test]
    fn test_duplicate_slugs_observe_once_and_activate_last_link() {
        let doc = SimDocument::new(layout(&["setup", "setup"], &["setup"]));
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        assert_eq!(spy.observed_count(), 1);

        let links = doc.query_links(".toc-list .toc-link");
        doc.set_class(&links[0], "active", true);

        doc.deliver(&[IntersectionEntry::new("setup", true)]);
        assert!(!doc.link_has_class(0, "active"));
        assert!(doc.link_has_class(1, "active"));

        doc.deliver(&[IntersectionEntry::new("stray", true)]);
        assert!(!doc.link_has_class(0, "active"));
        assert!(!doc.link_has_class(1, "active"));
    }

    #[test]
    fn test_last_intersecting_entry_in_batch_wins() {
        let doc = SimDocument::new(layout(&["a", "b"], &["a", "b"]));
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();

        doc.deliver(&[
            IntersectionEntry::new("a", true),
            IntersectionEntry::new("b", true),
        ]);
        assert_eq!(doc.active_links(), vec!["#b"]);

        doc.deliver(&[
            IntersectionEntry::new("b", true),
            IntersectionEntry::new("a", true),
        ]);
        assert_eq!(doc.active_links(), vec!["#a"]);

        // Non-intersecting entries leave the current link alone
        doc.deliver(&[IntersectionEntry::new("a", false)]);
        assert_eq!(doc.active_links(), vec!["#a"]);
    }

    #[test]
    fn test_at_most_one_link_active_while_scrolling() {
        let doc = scenario();
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        let mut y = 0.0;
        while y < 2000.0 {
            doc.scroll_to(y);
            assert!(doc.active_links().len() <= 1);
            y += 37.0;
        }
    }

    #[test]
    fn test_scenario_body_crosses_midpoint() {
        let mut layout = layout(
            &["intro", "body", "conclusion"],
            &["intro", "body", "conclusion"],
        );
        // Panel shows one row at a time so activation has to scroll it
        layout.nav.height = 24.0;
        let doc = SimDocument::new(layout);
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();

        doc.scroll_to(0.0);
        assert_eq!(doc.active_links(), vec!["#intro"]);
        assert_eq!(doc.nav_scroll(), (0.0, 0.0));

        // Trigger line at 250 + 400 = 650: body (600) crossed, conclusion (1200) not
        doc.scroll_to(250.0);
        assert_eq!(doc.active_links(), vec!["#body"]);
        assert_eq!(doc.nav_scroll(), (24.0, 0.0));
    }

    #[test]
    fn test_reinitialize_binds_new_document() {
        let doc = scenario();
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        doc.scroll_to(0.0);
        assert_eq!(doc.active_links(), vec!["#intro"]);

        doc.replace_layout(layout(&["next"], &["next"]));
        spy.initialize();
        assert_eq!(spy.observed_count(), 1);
        doc.scroll_to(0.0);
        assert_eq!(doc.active_links(), vec!["#next"]);
        assert_eq!(doc.live_watchers(), 1);
    }

    #[test]
    fn test_dispose_stops_updates() {
        let doc = scenario();
        let mut spy = ScrollSpyController::new(doc.clone());
        spy.initialize();
        doc.scroll_to(0.0);
        spy.dispose();
        assert!(!spy.is_observing());
        assert_eq!(doc.live_watchers(), 0);
        doc.scroll_to(900.0);
        // Teardown does not clear the last highlight
        assert_eq!(doc.active_links(), vec!["#intro"]);
    }

    #[test]
    fn test_dropping_controller_releases_watcher() {
        let doc = scenario();
        {
            let mut spy = ScrollSpyController::new(doc.clone());
            spy.initialize();
            assert_eq!(doc.live_watchers(), 1);
        }
        assert_eq!(doc.live_watchers(), 0);
    }

    #[test]
    fn test_custom_config() {
        let mut layout = layout(&["intro"], &["intro"]);
        layout.nav.classes = vec!["sidebar".to_string()];
        for link in &mut layout.links {
            link.classes = vec!["nav-item".to_string()];
        }
        let doc = SimDocument::new(layout);

        let config = SpyConfig {
            link_selector: ".sidebar .nav-item".to_string(),
            active_class: "is-current".to_string(),
            ..SpyConfig::default()
        };
        let mut spy = ScrollSpyController::with_config(doc.clone(), &config).unwrap();
        spy.initialize();
        doc.scroll_to(0.0);
        assert!(doc.link_has_class(0, "is-current"));
        assert!(!doc.link_has_class(0, "active"));

        let bad = SpyConfig {
            root_margin: "50vh".to_string(),
            ..SpyConfig::default()
        };
        assert!(ScrollSpyController::with_config(doc, &bad).is_err());
    }
}
