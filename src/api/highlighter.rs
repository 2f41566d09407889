//! The `Highlighter` class exported to JavaScript

use super::helpers::{deserialize, deserialize_or_default, serialize, to_js_error, validate_text_range};
use crate::anchor::DomAnchor;
use crate::dom::{ContentNode, Document, DocumentRef, NodeId, TextIndex, Viewport};
use crate::geometry::{combine, Rect};
use crate::highlight::{
    ClickEvent, HighlightConfig, HighlightHandlers, HighlightId, HighlightManagerOptions,
};
use crate::hosts::DomAnchorHighlightManager;
use crate::layout::{FlowLayout, FlowLayoutConfig};
use crate::logging::ConsoleLogger;
use crate::scheduler::BrowserScheduler;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlighterConfig {
    pub highlight: HighlightConfig,
    pub layout: FlowLayoutConfig,
}

/// A document, its layout and one highlight manager over its content
#[wasm_bindgen]
pub struct Highlighter {
    doc: DocumentRef,
    container: NodeId,
    layout: Rc<FlowLayout>,
    manager: DomAnchorHighlightManager<Value>,
}

#[wasm_bindgen]
impl Highlighter {
    /// Create a highlighter; `config` may be omitted
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<Highlighter, JsValue> {
        let config: HighlighterConfig = deserialize_or_default(config, "Invalid highlighter config")?;

        let mut document = Document::new();
        let root = document.root();
        let container = document.append_element(root, "div");
        let doc = document.shared();

        let layout = Rc::new(FlowLayout::new(config.layout));
        let options = HighlightManagerOptions::from_config(
            container,
            Rc::new(BrowserScheduler),
            &config.highlight,
        )
        .with_logger(Rc::new(ConsoleLogger::default()));
        let manager = DomAnchorHighlightManager::new(doc.clone(), layout.clone(), options)
            .map_err(to_js_error)?;

        log::info!("Highlighter created (manager {})", manager.id());
        Ok(Highlighter {
            doc,
            container,
            layout,
            manager,
        })
    }

    /// Replace the highlighted content with a `ContentNode` tree and
    /// reanchor
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&self, content: JsValue) -> Result<(), JsValue> {
        let content: ContentNode = deserialize(content, "Invalid content")?;
        {
            let mut doc = self.doc.borrow_mut();
            let existing: Vec<NodeId> = doc
                .children(self.container)
                .iter()
                .copied()
                .filter(|n| !doc.is_overlay(*n))
                .collect();
            for node in existing {
                doc.remove(node);
            }
            doc.append_content(self.container, &content);
        }
        self.manager.handle_mutations();
        Ok(())
    }

    /// Text the highlights are anchored against
    #[wasm_bindgen(js_name = textContent)]
    pub fn text_content(&self) -> String {
        let doc = self.doc.borrow();
        TextIndex::build(&doc, self.container).chars().iter().collect()
    }

    /// Create a highlight from a serialized `DomAnchor`; returns its id
    #[wasm_bindgen(js_name = createHighlight)]
    pub fn create_highlight(
        &self,
        anchor: JsValue,
        data: JsValue,
        on_click: Option<js_sys::Function>,
    ) -> Result<f64, JsValue> {
        let anchor: DomAnchor = deserialize(anchor, "Invalid anchor")?;
        let data: Value = deserialize_or_default(data, "Invalid highlight data")?;
        let view = self
            .manager
            .create_highlight(anchor, data, click_handlers(on_click));
        Ok(view.id().0 as f64)
    }

    /// Create a highlight over flat text offsets `[start, end)`
    #[wasm_bindgen(js_name = createHighlightFromOffsets)]
    pub fn create_highlight_from_offsets(
        &self,
        start: usize,
        end: usize,
        data: JsValue,
        on_click: Option<js_sys::Function>,
    ) -> Result<f64, JsValue> {
        let range = {
            let doc = self.doc.borrow();
            let index = TextIndex::build(&doc, self.container);
            validate_text_range(start, end, index.len()).map_err(|e| JsValue::from_str(&e))?;
            index
                .range_for(start, end)
                .ok_or_else(|| JsValue::from_str("Text range does not map to the document"))?
        };
        let data: Value = deserialize_or_default(data, "Invalid highlight data")?;
        let view = self
            .manager
            .create_highlight_from_range(range, data, click_handlers(on_click))
            .map_err(to_js_error)?;
        Ok(view.id().0 as f64)
    }

    /// Serialized anchor of a highlight
    #[wasm_bindgen(js_name = getAnchor)]
    pub fn anchor(&self, id: f64) -> Result<JsValue, JsValue> {
        match self.manager.highlight(HighlightId(id as u64)) {
            Some(view) => serialize(view.anchor(), "Failed to serialize anchor"),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    #[wasm_bindgen(js_name = removeHighlight)]
    pub fn remove_highlight(&self, id: f64) {
        self.manager.remove_highlight(HighlightId(id as u64));
    }

    #[wasm_bindgen(js_name = removeAllHighlights)]
    pub fn remove_all_highlights(&self) {
        self.manager.remove_all_highlights();
    }

    #[wasm_bindgen(js_name = highlightCount)]
    pub fn highlight_count(&self) -> usize {
        self.manager.len()
    }

    /// Scroll a highlight into view and focus it; resolves when done
    #[wasm_bindgen(js_name = focusHighlight)]
    pub fn focus_highlight(&self, id: f64) -> js_sys::Promise {
        let manager = self.manager.clone();
        let target = HighlightId(id as u64);
        wasm_bindgen_futures::future_to_promise(async move {
            manager
                .focus_highlight_by_id(target)
                .await
                .map(|()| JsValue::UNDEFINED)
                .map_err(to_js_error)
        })
    }

    /// Hover whatever lies under the pointer; returns the hovered id
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f64, y: f64) -> Option<f64> {
        self.manager.handle_pointer_move(x, y).map(|id| id.0 as f64)
    }

    /// Returns whether a highlight click handler ran
    pub fn click(&self, x: f64, y: f64) -> bool {
        self.manager.handle_click(ClickEvent::at(x, y))
    }

    /// Container width changed
    pub fn resize(&self, wrap_width: f64) {
        self.layout.set_wrap_width(wrap_width);
        self.manager.handle_resize();
    }

    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&self, zoom: f64) {
        self.layout.set_zoom(zoom);
        self.manager.refresh_geometry();
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&self, viewport: JsValue) -> Result<(), JsValue> {
        let viewport: Viewport = deserialize(viewport, "Invalid viewport")?;
        self.doc.borrow_mut().set_viewport(viewport);
        Ok(())
    }

    #[wasm_bindgen(js_name = getViewport)]
    pub fn viewport(&self) -> Result<JsValue, JsValue> {
        serialize(&self.doc.borrow().viewport(), "Failed to serialize viewport")
    }

    /// Every overlay with its box, classes and border flags
    #[wasm_bindgen(js_name = displayList)]
    pub fn display_list(&self) -> Result<JsValue, JsValue> {
        serialize(&self.manager.display_list(), "Failed to serialize display list")
    }

    #[wasm_bindgen(js_name = boundingClientRect)]
    pub fn bounding_client_rect(&self, id: f64) -> Result<JsValue, JsValue> {
        match self.manager.bounding_client_rect(HighlightId(id as u64)) {
            Some(rect) => serialize(&rect, "Failed to serialize rect"),
            None => Ok(JsValue::NULL),
        }
    }

    /// Apply mutations made since the last call
    #[wasm_bindgen(js_name = handleMutations)]
    pub fn handle_mutations(&self) -> usize {
        self.manager.handle_mutations()
    }
}

fn click_handlers(on_click: Option<js_sys::Function>) -> HighlightHandlers<Value> {
    match on_click {
        Some(callback) => HighlightHandlers::on_click(move |data: &Value| {
            let arg = serialize(data, "Failed to serialize highlight data").unwrap_or(JsValue::NULL);
            if let Err(e) = callback.call1(&JsValue::NULL, &arg) {
                log::error!("highlight click handler threw: {:?}", e);
            }
        }),
        None => HighlightHandlers::none(),
    }
}

/// Merge rects the way highlight overlays are merged
#[wasm_bindgen(js_name = combineRects)]
pub fn combine_rects(rects: JsValue) -> Result<JsValue, JsValue> {
    let rects: Vec<Rect> = deserialize(rects, "Invalid rects")?;
    serialize(&combine(&rects), "Failed to serialize rects")
}
