//! A DOM highlight manager that may not exist yet
//!
//! Hosts that only learn their container after some asynchronous setup
//! hand over a future of the manager. Every call waits for it and then
//! delegates; an initialization failure is returned by every call.

use super::dom::DomAnchorHighlightManager;
use crate::anchor::DomAnchor;
use crate::dom::{Range, Selection};
use crate::error::Result;
use crate::highlight::{HighlightHandlers, HighlightId, HighlightView};
use futures::future::{self, LocalBoxFuture, Shared};
use futures::FutureExt;
use std::future::Future;

pub struct AsyncDomAnchorHighlightManager<D> {
    ready: Shared<LocalBoxFuture<'static, Result<DomAnchorHighlightManager<D>>>>,
}

impl<D> Clone for AsyncDomAnchorHighlightManager<D> {
    fn clone(&self) -> Self {
        Self {
            ready: self.ready.clone(),
        }
    }
}

impl<D: Clone + PartialEq + 'static> AsyncDomAnchorHighlightManager<D> {
    pub fn new(init: impl Future<Output = Result<DomAnchorHighlightManager<D>>> + 'static) -> Self {
        Self {
            ready: init.boxed_local().shared(),
        }
    }

    /// Wrap a manager that is already constructed
    pub fn from_manager(manager: DomAnchorHighlightManager<D>) -> Self {
        Self::new(future::ready(Ok(manager)))
    }

    pub async fn manager(&self) -> Result<DomAnchorHighlightManager<D>> {
        self.ready.clone().await
    }

    pub async fn create_highlight(
        &self,
        anchor: DomAnchor,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        Ok(self.manager().await?.create_highlight(anchor, data, handlers))
    }

    pub async fn create_highlight_from_current_selection(
        &self,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        self.manager()
            .await?
            .create_highlight_from_current_selection(data, handlers)
    }

    pub async fn create_highlight_from_selection(
        &self,
        selection: Selection,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        self.manager()
            .await?
            .create_highlight_from_selection(&selection, data, handlers)
    }

    pub async fn create_highlight_from_range(
        &self,
        range: Range,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> Result<HighlightView<DomAnchor, D>> {
        self.manager()
            .await?
            .create_highlight_from_range(range, data, handlers)
    }

    pub async fn highlights(&self) -> Result<Vec<HighlightView<DomAnchor, D>>> {
        Ok(self.manager().await?.highlights())
    }

    pub async fn remove_highlight(&self, id: HighlightId) -> Result<()> {
        self.manager().await?.remove_highlight(id);
        Ok(())
    }

    pub async fn remove_highlights(&self, predicate: impl Fn(&D) -> bool) -> Result<()> {
        self.manager().await?.remove_highlights(predicate);
        Ok(())
    }

    pub async fn remove_all_highlights(&self) -> Result<()> {
        self.manager().await?.remove_all_highlights();
        Ok(())
    }

    pub async fn focus_highlight(&self, predicate: impl Fn(&D) -> bool) -> Result<()> {
        let manager = self.manager().await?;
        manager.focus_highlight(predicate).await
    }

    pub async fn focus_highlight_by_id(&self, id: HighlightId) -> Result<()> {
        self.manager().await?.focus_highlight_by_id(id).await
    }

    pub async fn update_highlights_class_names(&self, predicate: impl Fn(&D) -> bool) -> Result<()> {
        self.manager().await?.update_highlights_class_names(predicate);
        Ok(())
    }

    pub async fn refresh_geometry(&self) -> Result<()> {
        self.manager().await?.refresh_geometry();
        Ok(())
    }

    pub async fn handle_mutations(&self) -> Result<usize> {
        Ok(self.manager().await?.handle_mutations())
    }
}
