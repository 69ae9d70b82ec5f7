//! Page scroll locking for overlays shown above the field

use nodefield_core::{ScrollHost, ScrollLock};
use wasm_bindgen::prelude::*;
use web_sys::Document;

/// Locks scrolling by hiding overflow on `document.body`
pub struct BodyScroll {
    document: Document,
}

impl ScrollHost for BodyScroll {
    fn set_scroll_locked(&mut self, locked: bool) {
        let Some(body) = self.document.body() else {
            tracing::warn!("document has no body, scroll lock ignored");
            return;
        };
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(|_| ())
        };
        if let Err(err) = result {
            tracing::warn!(?err, locked, "failed to update body overflow");
        }
    }
}

/// Reference counted scroll lock; the page scrolls again once every
/// `acquire` has been matched by a `release`
#[wasm_bindgen(js_name = ScrollLock)]
pub struct PageScrollLock {
    inner: ScrollLock<BodyScroll>,
}

#[wasm_bindgen(js_class = ScrollLock)]
impl PageScrollLock {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<PageScrollLock, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self {
            inner: ScrollLock::new(BodyScroll { document }),
        })
    }

    pub fn acquire(&mut self) {
        self.inner.acquire();
    }

    pub fn release(&mut self) {
        self.inner.release();
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }
}
