//! `web-sys` implementation of the host seam.

use crate::spy::{
    Alignment, BatchHandler, IntersectionEntry, ScrollIntoView, TocHost, VisibilityWatcher,
    WatchError, WatcherOptions,
};
use js_sys::Array;
use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    ScrollIntoViewOptions, ScrollLogicalPosition,
};

/// The live browser document.
#[derive(Clone)]
pub struct WebHost {
    document: Document,
}

impl WebHost {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the global `window`, if there is one.
    pub fn from_window() -> Option<Self> {
        web_sys::window()?.document().map(Self::new)
    }
}

fn logical_position(alignment: Alignment) -> ScrollLogicalPosition {
    match alignment {
        Alignment::Start => ScrollLogicalPosition::Start,
        Alignment::Center => ScrollLogicalPosition::Center,
        Alignment::End => ScrollLogicalPosition::End,
        Alignment::Nearest => ScrollLogicalPosition::Nearest,
    }
}

impl TocHost for WebHost {
    type Link = Element;
    type Target = Element;
    type Watcher = WebWatcher;

    fn query_links(&self, selector: &str) -> Vec<Element> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                warn!("invalid link selector '{}': {:?}", selector, err);
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn href(&self, link: &Element) -> Option<String> {
        link.get_attribute("href")
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn set_class(&self, link: &Element, class: &str, on: bool) {
        let classes = link.class_list();
        let result = if on {
            classes.add_1(class)
        } else {
            classes.remove_1(class)
        };
        if let Err(err) = result {
            warn!("could not update class '{}': {:?}", class, err);
        }
    }

    fn scroll_into_view(&self, link: &Element, options: ScrollIntoView) {
        let opts = ScrollIntoViewOptions::new();
        opts.set_block(logical_position(options.block));
        opts.set_inline(logical_position(options.inline));
        link.scroll_into_view_with_scroll_into_view_options(&opts);
    }

    fn create_watcher(
        &self,
        options: &WatcherOptions,
        mut handler: BatchHandler,
    ) -> Result<WebWatcher, WatchError> {
        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |records: Array, _observer: IntersectionObserver| {
                let batch: Vec<IntersectionEntry> = records
                    .iter()
                    .map(|record| record.unchecked_into::<IntersectionObserverEntry>())
                    .map(|entry| IntersectionEntry {
                        target_id: entry.target().id(),
                        is_intersecting: entry.is_intersecting(),
                        intersection_ratio: entry.intersection_ratio(),
                    })
                    .collect();
                handler(&batch);
            },
        );

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin.to_string());
        init.set_threshold(&JsValue::from_f64(options.threshold));

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(|err| WatchError(format!("{:?}", err)))?;

        Ok(WebWatcher {
            observer,
            _callback: callback,
        })
    }
}

/// An `IntersectionObserver` together with the closure it calls back into.
/// The closure must outlive the observer's last delivery, so both are
/// owned here and released together.
pub struct WebWatcher {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl VisibilityWatcher for WebWatcher {
    type Target = Element;

    fn observe(&mut self, target: &Element) {
        self.observer.observe(target);
    }

    fn disconnect(&mut self) {
        self.observer.disconnect();
    }
}
