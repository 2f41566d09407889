//! Overlay highlighter WASM API
//!
//! JavaScript pushes content into a Rust-owned document, forwards pointer
//! and viewport events, and reads back the overlay display list to paint.
//!
//! # Module Structure
//!
//! - `helpers`: serialization and error conversion
//! - `highlighter`: the `Highlighter` class and free functions

pub mod helpers;
pub mod highlighter;

pub use highlighter::{combine_rects, Highlighter};
