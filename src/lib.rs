//! Overlay Highlighter WASM Module
//!
//! Resolves anchors to text in a live document, paints overlay boxes that
//! follow the anchored text through layout changes and edits, and routes
//! hover, focus and click interaction to the right highlight.

pub mod anchor;
pub mod api;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod highlight;
pub mod hosts;
pub mod layout;
pub mod logging;
pub mod scheduler;

// Re-export commonly used types
pub use anchor::{DomAnchor, PdfPageHint, TextQuote};
pub use error::{HighlightError, Result};
pub use geometry::{combine, Rect};
pub use highlight::{
    HighlightEvent, HighlightHandlers, HighlightId, HighlightManager, HighlightManagerOptions,
    HighlightView,
};
pub use hosts::{AsyncDomAnchorHighlightManager, DomAnchorHighlightManager, PdfJsAnchorHighlightManager};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&JsValue::from_str(&format!("logger already set: {}", e)));
    }

    log::info!("Overlay highlighter WASM module initialized");
}
