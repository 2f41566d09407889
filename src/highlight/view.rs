//! Read-only highlight handles returned to callers

use super::events::{EventHandler, HighlightEvent};
use super::manager::ManagerInner;
use super::state::HighlightId;
use crate::error::Result;
use futures::future::LocalBoxFuture;
use std::fmt;
use std::rc::{Rc, Weak};

/// Awaited by `focus_highlight` before scrolling, e.g. to bring a lazily
/// rendered page into existence
pub type BeforeFocusHook<A, D> = Rc<dyn Fn(HighlightView<A, D>) -> LocalBoxFuture<'static, Result<()>>>;

/// Snapshot of a highlight's identity plus live queries against its
/// manager
///
/// Views do not keep the manager alive; once it is dropped the live
/// queries report nothing.
pub struct HighlightView<A, D> {
    id: HighlightId,
    anchor: A,
    data: D,
    class_names: Vec<String>,
    manager: Weak<ManagerInner<A, D>>,
}

impl<A, D> HighlightView<A, D> {
    pub(crate) fn new(
        id: HighlightId,
        anchor: A,
        data: D,
        class_names: Vec<String>,
        manager: Weak<ManagerInner<A, D>>,
    ) -> Self {
        Self {
            id,
            anchor,
            data,
            class_names,
            manager,
        }
    }

    pub fn id(&self) -> HighlightId {
        self.id
    }

    pub fn anchor(&self) -> &A {
        &self.anchor
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Whether any overlay of this highlight is currently shown
    pub fn has_elements(&self) -> bool {
        self.manager.upgrade().map_or(false, |inner| {
            inner
                .state
                .borrow()
                .get(self.id)
                .map_or(false, |h| h.has_elements())
        })
    }

    /// Whether the highlight is still part of its manager
    pub fn is_live(&self) -> bool {
        self.manager
            .upgrade()
            .map_or(false, |inner| inner.state.borrow().get(self.id).is_some())
    }

    pub fn on(&self, event: HighlightEvent, handler: EventHandler) -> bool {
        self.manager
            .upgrade()
            .map_or(false, |inner| inner.events.borrow_mut().on(self.id, event, handler))
    }

    pub fn off(&self, event: HighlightEvent, handler: &EventHandler) -> bool {
        self.manager
            .upgrade()
            .map_or(false, |inner| inner.events.borrow_mut().off(self.id, event, handler))
    }
}

impl<A: Clone, D: Clone> Clone for HighlightView<A, D> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            anchor: self.anchor.clone(),
            data: self.data.clone(),
            class_names: self.class_names.clone(),
            manager: self.manager.clone(),
        }
    }
}

impl<A: fmt::Debug, D: fmt::Debug> fmt::Debug for HighlightView<A, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightView")
            .field("id", &self.id)
            .field("anchor", &self.anchor)
            .field("data", &self.data)
            .field("class_names", &self.class_names)
            .finish()
    }
}
