//! Managers specialized for a kind of host document

pub mod async_manager;
pub mod dom;
pub mod pdf;

pub use async_manager::AsyncDomAnchorHighlightManager;
pub use dom::DomAnchorHighlightManager;
pub use pdf::{PdfFocusConfig, PdfJsAnchorHighlightManager, PdfViewer};
