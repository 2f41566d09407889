//! Geometry primitives
//!
//! Axis-aligned rectangles and the combiner that collapses the fragment
//! rects a range renders as into the minimal visually distinct set.

pub mod rect;

pub use rect::{bounding, combine, Rect};
