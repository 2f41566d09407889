//! Error types
//!
//! Only direct misuse of the API is an error. Anchors that fail to
//! resolve produce empty range lists, and missing focus targets are
//! logged, never raised.

use crate::dom::NodeId;
use crate::highlight::{HighlightEvent, HighlightId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HighlightError {
    #[error("container {0:?} is missing or not attached to the document")]
    MissingContainer(NodeId),

    #[error("cannot anchor a collapsed selection")]
    CollapsedSelection,

    #[error("no selection to anchor")]
    NoSelection,

    #[error("selected text is empty")]
    EmptyQuote,

    #[error("range is not inside the highlight container")]
    OutsideContainer,

    #[error("range is not inside any page of the paginated host")]
    OutsidePaginatedHost,

    #[error("timed out after {timeout_ms}ms waiting for '{event}' on highlight {highlight}")]
    Timeout {
        highlight: HighlightId,
        event: HighlightEvent,
        timeout_ms: u32,
    },

    #[error("before-focus hook failed: {0}")]
    Hook(String),

    #[error("invalid text fragment: {0}")]
    InvalidFragment(String),

    #[error("highlight manager failed to initialize: {0}")]
    Initialization(String),
}

pub type Result<T> = std::result::Result<T, HighlightError>;
