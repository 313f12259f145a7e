//! Browser bindings.
//!
//! One [`ScrollSpyController`] per UI thread, driven from JavaScript:
//!
//! ```javascript
//! import init, { initTocHighlight } from 'tocspy';
//!
//! await init();
//! initTocHighlight();
//! // after a client-side navigation replaced the TOC and headings:
//! document.addEventListener('astro:page-load', () => initTocHighlight());
//! ```
//!
//! Calling `initTocHighlight()` again releases the previous
//! `IntersectionObserver` before creating the next one, so at most one is
//! ever live.

mod error;
mod host;

pub use error::{ErrorCode, WebError};
pub use host::{WebHost, WebWatcher};

use crate::config::SpyConfig;
use crate::spy::ScrollSpyController;
use log::{Level, LevelFilter, Log, Metadata, Record, warn};
use std::cell::RefCell;
use wasm_bindgen::prelude::*;

thread_local! {
    static CONTROLLER: RefCell<Option<ScrollSpyController<WebHost>>> = const { RefCell::new(None) };
    static CONFIG: RefCell<SpyConfig> = RefCell::new(SpyConfig::default());
}

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[tocspy] {}", record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Set up panic messages and console logging (warnings only by default).
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Warn);
    }
}

/// Change console log verbosity: `off`, `error`, `warn`, `info`, `debug`
/// or `trace`.
#[wasm_bindgen(js_name = setTocHighlightLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter: LevelFilter = level
        .parse()
        .map_err(|_| WebError::config(format!("unknown log level '{}'", level)))?;
    log::set_max_level(filter);
    Ok(())
}

fn build_controller(host: WebHost) -> ScrollSpyController<WebHost> {
    CONFIG.with_borrow(
        |config| match ScrollSpyController::with_config(host.clone(), config) {
            Ok(spy) => spy,
            Err(err) => {
                warn!("{}; using defaults", err);
                ScrollSpyController::new(host)
            }
        },
    )
}

/// Bind the TOC on the current page. Call once per page view and again
/// after any re-render that replaces the TOC or the headings.
#[wasm_bindgen(js_name = initTocHighlight)]
pub fn init_toc_highlight() {
    let Some(host) = WebHost::from_window() else {
        warn!("no document available, scroll-spy disabled");
        return;
    };
    CONTROLLER.with_borrow_mut(|slot| {
        slot.get_or_insert_with(|| build_controller(host)).initialize();
    });
}

/// Replace the scroll-spy options. Accepts `linkSelector`, `activeClass`,
/// `rootMargin`, `threshold` and `scroll: { block, inline }`; omitted keys
/// keep their defaults. A live scroll-spy is rebound with the new options;
/// a disposed or never started one only stores them for the next
/// `initTocHighlight()`.
#[wasm_bindgen(js_name = configureTocHighlight)]
pub fn configure_toc_highlight(options: JsValue) -> Result<(), JsValue> {
    let config: SpyConfig = if options.is_undefined() || options.is_null() {
        SpyConfig::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(WebError::from)?
    };
    config.watcher_options().map_err(WebError::from)?;

    CONFIG.with_borrow_mut(|current| *current = config);

    // The controller captured the old options, so it is rebuilt either way
    let was_live = CONTROLLER.with_borrow_mut(|slot| match slot.take() {
        Some(mut spy) => {
            let live = spy.is_observing();
            spy.dispose();
            live
        }
        None => false,
    });
    if was_live {
        init_toc_highlight();
    }
    Ok(())
}

/// Stop highlighting and release the observer.
#[wasm_bindgen(js_name = disposeTocHighlight)]
pub fn dispose_toc_highlight() {
    CONTROLLER.with_borrow_mut(|slot| {
        if let Some(spy) = slot.as_mut() {
            spy.dispose();
        }
    });
}

/// Whether an `IntersectionObserver` is currently live.
#[wasm_bindgen(js_name = isTocHighlightActive)]
pub fn is_toc_highlight_active() -> bool {
    CONTROLLER.with_borrow(|slot| slot.as_ref().is_some_and(|spy| spy.is_observing()))
}

/// Get the version of the tocspy library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
