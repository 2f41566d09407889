//! Fixed-pitch flow layout
//!
//! Every character is one `char_width` wide and one `line_height` tall.
//! Block elements start and end a line; text wraps per character at
//! `wrap_width`. Rects come out the way a browser reports them: one per
//! text node per line, plus one per line for every inline element the
//! range covers completely.

use super::LayoutEngine;
use crate::dom::{Display, Document, NodeId, NodeKind, Range, TextIndex};
use crate::geometry::{bounding, Rect};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowLayoutConfig {
    /// Advance of every character in pixels
    pub char_width: f64,
    pub line_height: f64,
    /// Available line width before wrapping
    pub wrap_width: f64,
    /// Extra space after each block
    pub block_gap: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    /// Scale applied to character and line metrics
    pub zoom: f64,
}

impl Default for FlowLayoutConfig {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
            wrap_width: 800.0,
            block_gap: 0.0,
            origin_x: 0.0,
            origin_y: 0.0,
            zoom: 1.0,
        }
    }
}

/// Per text node, one box per character
type GlyphMap = HashMap<NodeId, Vec<Rect>>;

struct Pen<'a> {
    config: &'a FlowLayoutConfig,
    x: f64,
    y: f64,
    line_has_content: bool,
    glyphs: GlyphMap,
}

impl<'a> Pen<'a> {
    fn char_width(&self) -> f64 {
        self.config.char_width * self.config.zoom
    }

    fn line_height(&self) -> f64 {
        self.config.line_height * self.config.zoom
    }

    fn new_line(&mut self) {
        self.y += self.line_height();
        self.x = self.config.origin_x;
        self.line_has_content = false;
    }

    fn break_line(&mut self, gap: f64) {
        if self.line_has_content {
            self.new_line();
            self.y += gap;
        }
    }

    fn place_text(&mut self, node: NodeId, text: &str) {
        let mut boxes = Vec::with_capacity(text.len());
        let width = self.char_width();
        let right_edge = self.config.origin_x + self.config.wrap_width * self.config.zoom;
        for ch in text.chars() {
            if ch == '\n' {
                boxes.push(Rect::new(self.x, self.y, 0.0, self.line_height()));
                self.new_line();
                continue;
            }
            if self.x + width > right_edge && self.x > self.config.origin_x {
                self.new_line();
            }
            boxes.push(Rect::new(self.x, self.y, width, self.line_height()));
            self.x += width;
            self.line_has_content = true;
        }
        self.glyphs.insert(node, boxes);
    }

    fn walk(&mut self, doc: &Document, node: NodeId) {
        match doc.kind(node) {
            Some(NodeKind::Text(text)) => self.place_text(node, text),
            Some(NodeKind::Element(element)) => {
                if element.overlay.is_some() || element.display == Display::None {
                    return;
                }
                let block = element.display == Display::Block;
                if block {
                    self.break_line(0.0);
                }
                for child in doc.children(node) {
                    self.walk(doc, *child);
                }
                if block {
                    self.break_line(self.config.block_gap * self.config.zoom);
                }
            }
            None => {}
        }
    }
}

/// Union of consecutive same-row boxes
fn line_boxes(boxes: &[Rect]) -> Vec<Rect> {
    let mut lines: Vec<Rect> = Vec::new();
    for glyph in boxes {
        match lines.last_mut() {
            Some(line) if line.top == glyph.top => *line = line.union(glyph),
            _ => lines.push(*glyph),
        }
    }
    lines
}

#[derive(Debug, Default)]
pub struct FlowLayout {
    config: RefCell<FlowLayoutConfig>,
}

impl FlowLayout {
    pub fn new(config: FlowLayoutConfig) -> Self {
        Self {
            config: RefCell::new(config),
        }
    }

    pub fn config(&self) -> FlowLayoutConfig {
        self.config.borrow().clone()
    }

    /// Replace the metrics; hosts call this on resize or zoom and then
    /// notify their managers
    pub fn set_config(&self, config: FlowLayoutConfig) {
        *self.config.borrow_mut() = config;
    }

    pub fn set_wrap_width(&self, wrap_width: f64) {
        self.config.borrow_mut().wrap_width = wrap_width;
    }

    pub fn set_zoom(&self, zoom: f64) {
        self.config.borrow_mut().zoom = zoom;
    }

    fn glyphs(&self, doc: &Document) -> GlyphMap {
        let config = self.config.borrow();
        let mut pen = Pen {
            config: &config,
            x: config.origin_x,
            y: config.origin_y,
            line_has_content: false,
            glyphs: HashMap::new(),
        };
        pen.walk(doc, doc.root());
        pen.glyphs
    }
}

impl LayoutEngine for FlowLayout {
    fn client_rects(&self, doc: &Document, range: &Range) -> Vec<Rect> {
        let root = doc.root();
        let index = TextIndex::build(doc, root);
        let Some((start, end)) = index.range_offsets(doc, range) else {
            return Vec::new();
        };
        if start == end {
            return Vec::new();
        }
        let glyphs = self.glyphs(doc);

        let mut rects = Vec::new();
        for entry in index.entries() {
            let lo = start.max(entry.start);
            let hi = end.min(entry.end());
            if lo >= hi {
                continue;
            }
            if let Some(boxes) = glyphs.get(&entry.node) {
                let slice = &boxes[(lo - entry.start).min(boxes.len())..(hi - entry.start).min(boxes.len())];
                rects.extend(line_boxes(slice));
            }
        }

        // Inline elements the range covers entirely report their own boxes
        for node in doc.descendants(root) {
            let Some(element) = doc.element(node) else {
                continue;
            };
            if element.display != Display::Inline || element.overlay.is_some() {
                continue;
            }
            let whole = Range::select_node_contents(doc, node);
            let Some((a, b)) = index.range_offsets(doc, &whole) else {
                continue;
            };
            if a < b && start <= a && b <= end {
                let boxes: Vec<Rect> = doc
                    .descendants(node)
                    .into_iter()
                    .filter_map(|n| glyphs.get(&n))
                    .flatten()
                    .copied()
                    .collect();
                rects.extend(line_boxes(&boxes));
            }
        }
        rects
    }

    fn node_rect(&self, doc: &Document, node: NodeId) -> Option<Rect> {
        let glyphs = self.glyphs(doc);
        let boxes: Vec<Rect> = doc
            .descendants(node)
            .into_iter()
            .filter_map(|n| glyphs.get(&n))
            .flatten()
            .copied()
            .collect();
        bounding(&boxes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::BoundaryPoint;
    use crate::geometry::combine;

    #[test]
    fn test_single_line_rect() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p");
        let text = doc.append_text(p, "This is some sample text");
        let layout = FlowLayout::default();

        let range = Range::new(BoundaryPoint::new(text, 0), BoundaryPoint::new(text, 12));
        let rects = layout.client_rects(&doc, &range);
        assert_eq!(rects, vec![Rect::new(0.0, 0.0, 96.0, 16.0)]);
    }

    #[test]
    fn test_blocks_stack_vertically() {
        let mut doc = Document::new();
        let root = doc.root();
        let p1 = doc.append_element(root, "p");
        doc.append_text(p1, "first");
        let p2 = doc.append_element(root, "p");
        let second = doc.append_text(p2, "second");
        let layout = FlowLayout::default();

        assert_eq!(layout.node_rect(&doc, p2), Some(Rect::new(0.0, 16.0, 48.0, 16.0)));
        let range = Range::select_node_contents(&doc, second);
        assert_eq!(layout.client_rects(&doc, &range)[0].top, 16.0);
    }

    #[test]
    fn test_wrapping_produces_one_rect_per_line() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.append_text(root, "abcdefghijkl");
        let layout = FlowLayout::new(FlowLayoutConfig {
            wrap_width: 40.0,
            ..FlowLayoutConfig::default()
        });

        let rects = layout.client_rects(&doc, &Range::select_node_contents(&doc, text));
        assert_eq!(
            rects,
            vec![
                Rect::new(0.0, 0.0, 40.0, 16.0),
                Rect::new(0.0, 16.0, 40.0, 16.0),
                Rect::new(0.0, 32.0, 16.0, 16.0),
            ]
        );
    }

    #[test]
    fn test_inline_element_box_is_reported_and_combined_away() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p");
        let before = doc.append_text(p, "a ");
        let em = doc.append_element(p, "em");
        doc.append_text(em, "bold");
        let after = doc.append_text(p, " z");
        let layout = FlowLayout::default();

        let range = Range::new(BoundaryPoint::new(before, 0), BoundaryPoint::new(after, 2));
        let rects = layout.client_rects(&doc, &range);
        // three text runs plus the em box, which duplicates the middle run
        assert_eq!(rects.len(), 4);
        assert_eq!(combine(&rects), vec![Rect::new(0.0, 0.0, 64.0, 16.0)]);
    }

    #[test]
    fn test_zoom_scales_metrics() {
        let mut doc = Document::new();
        let root = doc.root();
        let text = doc.append_text(root, "ab");
        let layout = FlowLayout::default();
        layout.set_zoom(2.0);

        let rects = layout.client_rects(&doc, &Range::select_node_contents(&doc, text));
        assert_eq!(rects, vec![Rect::new(0.0, 0.0, 32.0, 32.0)]);
    }

    #[test]
    fn test_hidden_content_has_no_rects() {
        let mut doc = Document::new();
        let root = doc.root();
        let hidden = doc.append_element(root, "div");
        if let Some(element) = doc.element_mut(hidden) {
            element.display = Display::None;
        }
        let text = doc.append_text(hidden, "secret");
        let layout = FlowLayout::default();
        assert!(layout
            .client_rects(&doc, &Range::select_node_contents(&doc, text))
            .is_empty());
    }
}
