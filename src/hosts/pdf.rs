//! Highlights in a paginated viewer whose pages mount lazily
//!
//! Text for a page only exists once the viewer has rendered it, so
//! focusing a highlight on an unrendered page asks the viewer to scroll
//! there and then waits for the highlight to gain overlays.

use super::dom::DomAnchorHighlightManager;
use crate::anchor::{DomAnchor, PdfPageHint};
use crate::dom::{Document, DocumentRef, NodeId, Range, Selection};
use crate::error::{HighlightError, Result};
use crate::highlight::{
    wait_for_event, BeforeFocusHook, HighlightEvent, HighlightHandlers, HighlightManager,
    HighlightManagerOptions, HighlightView,
};
use crate::layout::LayoutEngine;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::rc::Rc;

pub const DEFAULT_FOCUS_TIMEOUT_MS: u32 = 5000;

/// The host viewer, as far as highlighting needs it
pub trait PdfViewer {
    /// Page whose container holds `node`
    fn page_containing(&self, doc: &Document, node: NodeId) -> Option<PdfPageHint>;

    /// Ask the viewer to bring a page (1-based) into view, rendering it
    /// if needed
    fn scroll_page_into_view(&self, page_number: u32);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PdfFocusConfig {
    /// How long focusing waits for a page's overlays to appear
    pub timeout_ms: u32,
}

impl Default for PdfFocusConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_FOCUS_TIMEOUT_MS,
        }
    }
}

pub struct PdfJsAnchorHighlightManager<D> {
    inner: DomAnchorHighlightManager<D>,
    viewer: Rc<dyn PdfViewer>,
}

impl<D> Clone for PdfJsAnchorHighlightManager<D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            viewer: self.viewer.clone(),
        }
    }
}

impl<D> Deref for PdfJsAnchorHighlightManager<D> {
    type Target = HighlightManager<DomAnchor, D>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<D: Clone + PartialEq + 'static> PdfJsAnchorHighlightManager<D> {
    /// Resize relayout is disabled; the viewer reports geometry changes
    /// through `on_view_area_changed`
    pub fn new(
        doc: DocumentRef,
        layout: Rc<dyn LayoutEngine>,
        viewer: Rc<dyn PdfViewer>,
        options: HighlightManagerOptions<DomAnchor, D>,
        focus: PdfFocusConfig,
    ) -> Result<Self> {
        let hook = page_focus_hook(viewer.clone(), options.scheduler.clone(), focus.timeout_ms);
        let options = options.with_listen_resize(false).with_before_focus(hook);
        Ok(Self {
            inner: DomAnchorHighlightManager::new(doc, layout, options)?,
            viewer,
        })
    }

    /// Pages were scrolled, zoomed or (un)rendered
    pub fn on_view_area_changed(&self) {
        self.inner.refresh_geometry();
    }

    pub fn create_highlight_from_current_selection(
        &self,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        let selection = self
            .document()
            .borrow()
            .selection()
            .copied()
            .ok_or(HighlightError::NoSelection)?;
        self.create_highlight_from_selection(&selection, data, handlers)
    }

    pub fn create_highlight_from_selection(
        &self,
        selection: &Selection,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        if selection.is_collapsed() {
            return Err(HighlightError::CollapsedSelection);
        }
        let range = selection.to_range(&self.document().borrow());
        self.create_highlight_from_range(range, data, handlers)
    }

    /// The range must start inside one of the viewer's pages
    pub fn create_highlight_from_range(
        &self,
        range: Range,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        if range.is_collapsed() {
            return Err(HighlightError::CollapsedSelection);
        }
        let page = self
            .viewer
            .page_containing(&self.document().borrow(), range.start.node)
            .ok_or(HighlightError::OutsidePaginatedHost)?;
        let anchor = self.inner.anchor_for_range(range, Some(page))?;
        Ok(self.inner.create_highlight(anchor, data, handlers))
    }
}

fn page_focus_hook<D: Clone + 'static>(
    viewer: Rc<dyn PdfViewer>,
    scheduler: Rc<dyn crate::scheduler::Scheduler>,
    timeout_ms: u32,
) -> BeforeFocusHook<DomAnchor, D> {
    Rc::new(move |view: HighlightView<DomAnchor, D>| {
        let viewer = viewer.clone();
        let scheduler = scheduler.clone();
        async move {
            // Without a page hint there is nothing to render
            let Some(page) = view.anchor().pdf.as_ref().map(|p| p.page_number) else {
                return Ok(());
            };
            let scroll = || viewer.scroll_page_into_view(page);
            if view.has_elements() {
                scroll();
                return Ok(());
            }
            wait_for_event(
                &view,
                HighlightEvent::NewElements,
                scroll,
                scheduler.as_ref(),
                timeout_ms,
            )
            .await
        }
        .boxed_local()
    })
}
