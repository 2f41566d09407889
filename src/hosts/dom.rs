//! Highlights anchored by `DomAnchor` in a plain document

use crate::anchor::{anchor_from_range, normalize_range, DomAnchor, DomAnchorResolver, PdfPageHint};
use crate::dom::{DocumentRef, Range, Selection};
use crate::error::{HighlightError, Result};
use crate::highlight::{HighlightHandlers, HighlightManager, HighlightManagerOptions, HighlightView};
use crate::layout::LayoutEngine;
use std::ops::Deref;
use std::rc::Rc;

/// `HighlightManager` over `DomAnchor`s that can also build anchors from
/// live selections and ranges
pub struct DomAnchorHighlightManager<D> {
    manager: HighlightManager<DomAnchor, D>,
}

impl<D> Clone for DomAnchorHighlightManager<D> {
    fn clone(&self) -> Self {
        Self {
            manager: self.manager.clone(),
        }
    }
}

impl<D> Deref for DomAnchorHighlightManager<D> {
    type Target = HighlightManager<DomAnchor, D>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

impl<D: Clone + PartialEq + 'static> DomAnchorHighlightManager<D> {
    pub fn new(
        doc: DocumentRef,
        layout: Rc<dyn LayoutEngine>,
        options: HighlightManagerOptions<DomAnchor, D>,
    ) -> Result<Self> {
        let resolver = DomAnchorResolver::new(options.logger.clone());
        Ok(Self {
            manager: HighlightManager::new(doc, layout, resolver, options)?,
        })
    }

    pub fn manager(&self) -> &HighlightManager<DomAnchor, D> {
        &self.manager
    }

    /// Highlight whatever the document's selection currently covers
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

    pub fn create_highlight_from_range(
        &self,
        range: Range,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        let anchor = self.anchor_for_range(range, None)?;
        Ok(self.manager.create_highlight(anchor, data, handlers))
    }

    /// Normalize `range` and capture it as an anchor
    pub fn anchor_for_range(&self, mut range: Range, pdf: Option<PdfPageHint>) -> Result<DomAnchor> {
        let doc = self.document().borrow();
        normalize_range(&doc, &mut range, self.logger().as_ref());
        anchor_from_range(&doc, self.container(), &range, pdf)
    }
}
