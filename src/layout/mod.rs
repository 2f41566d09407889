//! Layout
//!
//! Highlights never measure text themselves; they ask a `LayoutEngine`
//! for the client rects of a range. `FlowLayout` is the built-in
//! fixed-pitch engine; hosts with real text metrics plug in their own.

pub mod flow;

pub use flow::{FlowLayout, FlowLayoutConfig};

use crate::dom::{Document, NodeId, Range};
use crate::geometry::Rect;

pub trait LayoutEngine {
    /// Rects a range renders as, in document coordinates, unmerged
    fn client_rects(&self, doc: &Document, range: &Range) -> Vec<Rect>;

    /// Bounding box of a node's rendered content
    fn node_rect(&self, doc: &Document, node: NodeId) -> Option<Rect>;
}
