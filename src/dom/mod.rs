//! Document model
//!
//! The document tree, ranges over it, document-order utilities and the
//! flattened text view used for anchoring.

pub mod document;
pub mod position;
pub mod range;
pub mod text;

pub use document::{
    ContentNode, Display, Document, DocumentRef, ElementData, MutationKind, MutationRecord,
    NodeId, NodeKind, ObserverId, OverlayStyle, ScrollBehavior, ScrollBlock, ScrollRequest,
    Viewport,
};
pub use position::{compare_boundary_points, compare_position, previous_leaf_node};
pub use range::{BoundaryPoint, Range, Selection};
pub use text::{Bias, TextIndex};
