//! Serializable overlay state for JS rendering

use super::state::HighlightId;
use crate::geometry::Rect;
use serde::Serialize;

/// One overlay element as the renderer should paint it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlaySnapshot {
    pub highlight_id: HighlightId,
    pub manager_id: u32,
    pub rect: Rect,
    pub class_names: Vec<String>,
    pub border_left: bool,
    pub border_right: bool,
    pub hidden: bool,
}
