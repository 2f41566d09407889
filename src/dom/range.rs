//! Ranges and selections
//!
//! Ranges are plain boundary-point pairs. They do not follow mutations;
//! a range whose boundary nodes were detached, edited or shortened is
//! detected by the highlight manager and re-derived from its anchor
//! instead.

use super::document::{Document, NodeId};
use super::position::compare_boundary_points;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A position inside a node: a character offset for text nodes, a child
/// index for elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: BoundaryPoint,
    pub end: BoundaryPoint,
}

impl Range {
    pub fn new(start: BoundaryPoint, end: BoundaryPoint) -> Self {
        Self { start, end }
    }

    pub fn collapsed_at(point: BoundaryPoint) -> Self {
        Self { start: point, end: point }
    }

    /// Range covering the whole of `node`'s contents
    pub fn select_node_contents(doc: &Document, node: NodeId) -> Self {
        Self::new(
            BoundaryPoint::new(node, 0),
            BoundaryPoint::new(node, doc.node_length(node)),
        )
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Identical boundary points on both ends
    pub fn is_coextensive(&self, other: &Range) -> bool {
        self.start == other.start && self.end == other.end
    }

    /// Both offsets still fit their boundary nodes
    pub fn is_in_bounds(&self, doc: &Document) -> bool {
        self.start.offset <= doc.node_length(self.start.node)
            && self.end.offset <= doc.node_length(self.end.node)
    }

    /// Either boundary sits in one of `nodes`
    pub fn touches_any(&self, nodes: &[NodeId]) -> bool {
        nodes.contains(&self.start.node) || nodes.contains(&self.end.node)
    }

    /// Both boundary containers still live under `root`
    pub fn is_within(&self, doc: &Document, root: NodeId) -> bool {
        doc.contains(root, self.start.node) && doc.contains(root, self.end.node)
    }
}

/// A user selection: anchor is where it started, focus where it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub anchor: BoundaryPoint,
    pub focus: BoundaryPoint,
}

impl Selection {
    pub fn new(anchor: BoundaryPoint, focus: BoundaryPoint) -> Self {
        Self { anchor, focus }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// The selected range, ordered start-before-end
    pub fn to_range(&self, doc: &Document) -> Range {
        match compare_boundary_points(doc, self.anchor, self.focus) {
            Ordering::Greater => Range::new(self.focus, self.anchor),
            _ => Range::new(self.anchor, self.focus),
        }
    }
}
