//! Highlight collections
//!
//! A `HighlightManager` owns highlights for one container: it resolves
//! their anchors, mounts overlays for the resolved ranges, keeps those
//! overlays in step with the document and routes pointer interaction.

pub mod display;
pub mod events;
pub mod manager;
pub mod options;
pub mod sorted;
pub mod state;
pub mod view;

pub use display::OverlaySnapshot;
pub use events::{wait_for_event, EventHandler, HighlightEvent};
pub use manager::{ClickEvent, HighlightManager, INDEX_ATTRIBUTE, MANAGER_ATTRIBUTE};
pub use options::{
    default_equivalence, ClassNamePolicy, HighlightConfig, HighlightManagerOptions,
    DEFAULT_FOCUS_CLASS, DEFAULT_HIGHLIGHT_CLASS, DEFAULT_HOVER_CLASS,
};
pub use sorted::SortedElementIndex;
pub use state::{ClickHandler, HighlightHandlers, HighlightId};
pub use view::{BeforeFocusHook, HighlightView};
