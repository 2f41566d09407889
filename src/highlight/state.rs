//! Per-highlight state owned by a manager

use crate::dom::{Document, NodeId, Range};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Identifier unique within a manager; never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HighlightId(pub u64);

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type ClickHandler<D> = Rc<dyn Fn(&D)>;

/// Optional per-highlight callbacks
pub struct HighlightHandlers<D> {
    pub on_click: Option<ClickHandler<D>>,
}

impl<D> HighlightHandlers<D> {
    pub fn none() -> Self {
        Self { on_click: None }
    }

    pub fn on_click(handler: impl Fn(&D) + 'static) -> Self {
        Self {
            on_click: Some(Rc::new(handler)),
        }
    }
}

impl<D> Default for HighlightHandlers<D> {
    fn default() -> Self {
        Self::none()
    }
}

/// One mounted overlay element; hidden slots are kept for reuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OverlaySlot {
    pub node: NodeId,
    pub visible: bool,
}

pub(crate) struct Highlight<A, D> {
    pub id: HighlightId,
    pub anchor: A,
    pub data: D,
    pub ranges: Vec<Range>,
    pub slots: Vec<OverlaySlot>,
    pub class_names: Vec<String>,
    pub on_click: Option<ClickHandler<D>>,
}

impl<A, D> Highlight<A, D> {
    /// No range has any extent (vacuously true with no ranges)
    pub fn is_unanchored(&self) -> bool {
        self.ranges.iter().all(Range::is_collapsed)
    }

    /// Some range boundary no longer lives under `container`
    pub fn has_detached_range(&self, doc: &Document, container: NodeId) -> bool {
        self.ranges.iter().any(|r| !r.is_within(doc, container))
    }

    /// Some range starts or ends in an edited text node, or points past
    /// the end of its node
    pub fn has_stale_range(&self, doc: &Document, edited: &[NodeId]) -> bool {
        self.ranges
            .iter()
            .any(|r| r.touches_any(edited) || !r.is_in_bounds(doc))
    }

    pub fn has_elements(&self) -> bool {
        self.slots.iter().any(|s| s.visible)
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().filter(|s| s.visible).map(|s| s.node)
    }

    pub fn all_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots.iter().map(|s| s.node)
    }
}
