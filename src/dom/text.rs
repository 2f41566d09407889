//! Flattened text view of a subtree
//!
//! Maps between boundary points and character offsets into the
//! concatenated text content of a root node. Quote search, fragment
//! resolution and layout all work on these flat offsets.

use super::document::{Document, NodeId};
use super::range::{BoundaryPoint, Range};
use std::collections::HashMap;

/// Which node wins when a flat offset sits on the seam between two text
/// nodes: `Start` picks the beginning of the later node, `End` the end of
/// the earlier one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    Start,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEntry {
    pub node: NodeId,
    /// Flat offset of the node's first character
    pub start: usize,
    /// Length in characters
    pub len: usize,
    order: usize,
}

impl TextEntry {
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

#[derive(Debug, Clone)]
pub struct TextIndex {
    entries: Vec<TextEntry>,
    chars: Vec<char>,
    order: HashMap<NodeId, usize>,
    subtree_end: HashMap<NodeId, usize>,
}

impl TextIndex {
    pub fn build(doc: &Document, root: NodeId) -> Self {
        let mut index = Self {
            entries: Vec::new(),
            chars: Vec::new(),
            order: HashMap::new(),
            subtree_end: HashMap::new(),
        };
        index.visit(doc, root);
        index
    }

    fn visit(&mut self, doc: &Document, node: NodeId) {
        let order = self.order.len();
        self.order.insert(node, order);
        if let Some(text) = doc.text(node) {
            let start = self.chars.len();
            self.chars.extend(text.chars());
            self.entries.push(TextEntry {
                node,
                start,
                len: self.chars.len() - start,
                order,
            });
        }
        for child in doc.children(node) {
            self.visit(doc, *child);
        }
        self.subtree_end.insert(node, self.order.len() - 1);
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn entries(&self) -> &[TextEntry] {
        &self.entries
    }

    pub fn entry(&self, node: NodeId) -> Option<&TextEntry> {
        self.entries.iter().find(|e| e.node == node)
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Flat offset of the text preceding the node at pre-order `order`
    fn offset_before(&self, order: usize) -> usize {
        self.entries
            .iter()
            .find(|e| e.order >= order)
            .map(|e| e.start)
            .unwrap_or(self.chars.len())
    }

    /// Flat offset of a boundary point, `None` when it lies outside the root
    pub fn flat_offset(&self, doc: &Document, point: BoundaryPoint) -> Option<usize> {
        let node_order = *self.order.get(&point.node)?;
        if let Some(entry) = self.entry(point.node) {
            return Some(entry.start + point.offset.min(entry.len));
        }
        let children = doc.children(point.node);
        let pivot = match children.get(point.offset) {
            Some(child) => *self.order.get(child)?,
            None => self.subtree_end.get(&point.node).copied().unwrap_or(node_order) + 1,
        };
        Some(self.offset_before(pivot))
    }

    pub fn range_offsets(&self, doc: &Document, range: &Range) -> Option<(usize, usize)> {
        let start = self.flat_offset(doc, range.start)?;
        let end = self.flat_offset(doc, range.end)?;
        Some((start, end.max(start)))
    }

    /// Boundary point inside a text node for a flat offset
    pub fn point_at(&self, flat: usize, bias: Bias) -> Option<BoundaryPoint> {
        let mut non_empty = self.entries.iter().filter(|e| e.len > 0);
        let found = match bias {
            Bias::Start => non_empty.find(|e| flat >= e.start && flat < e.end()),
            Bias::End => non_empty.find(|e| flat > e.start && flat <= e.end()),
        };
        if let Some(entry) = found {
            return Some(BoundaryPoint::new(entry.node, flat - entry.start));
        }
        // Offsets at the very edges of the text
        let mut non_empty = self.entries.iter().filter(|e| e.len > 0);
        if flat == 0 {
            return non_empty.next().map(|e| BoundaryPoint::new(e.node, 0));
        }
        if flat == self.chars.len() {
            return non_empty.last().map(|e| BoundaryPoint::new(e.node, e.len));
        }
        None
    }

    /// Range spanning the flat offsets `start..end`
    pub fn range_for(&self, start: usize, end: usize) -> Option<Range> {
        if start == end {
            return self.point_at(start, Bias::Start).map(Range::collapsed_at);
        }
        Some(Range::new(
            self.point_at(start, Bias::Start)?,
            self.point_at(end, Bias::End)?,
        ))
    }

    /// Text covered by `range`
    pub fn range_text(&self, doc: &Document, range: &Range) -> Option<String> {
        let (start, end) = self.range_offsets(doc, range)?;
        Some(self.slice(start, end))
    }
}

/// First occurrence of `needle` in `hay` at or after `from`
pub fn find_chars(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || needle.len() > hay.len() {
        return None;
    }
    (from..=hay.len() - needle.len()).find(|&i| hay[i..i + needle.len()] == *needle)
}

/// Every occurrence of `needle` in `hay`, overlapping ones included
pub fn find_all_chars(hay: &[char], needle: &[char]) -> Vec<usize> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(i) = find_chars(hay, needle, from) {
        found.push(i);
        from = i + 1;
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        // body > p > ["Hello ", em > "big", " world"]
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p");
        let hello = doc.append_text(p, "Hello ");
        let em = doc.append_element(p, "em");
        let big = doc.append_text(em, "big");
        doc.append_text(p, " world");
        (doc, p, hello, em, big)
    }

    #[test]
    fn test_flat_offsets() {
        let (doc, p, hello, em, big) = sample();
        let index = TextIndex::build(&doc, doc.root());

        assert_eq!(index.len(), 15);
        assert_eq!(index.flat_offset(&doc, BoundaryPoint::new(hello, 2)), Some(2));
        assert_eq!(index.flat_offset(&doc, BoundaryPoint::new(big, 1)), Some(7));
        assert_eq!(index.flat_offset(&doc, BoundaryPoint::new(p, 1)), Some(6));
        assert_eq!(index.flat_offset(&doc, BoundaryPoint::new(p, 3)), Some(15));
        assert_eq!(index.flat_offset(&doc, BoundaryPoint::new(em, 1)), Some(9));
    }

    #[test]
    fn test_point_at_bias() {
        let (doc, _, hello, _, big) = sample();
        let index = TextIndex::build(&doc, doc.root());

        assert_eq!(index.point_at(6, Bias::Start), Some(BoundaryPoint::new(big, 0)));
        assert_eq!(index.point_at(6, Bias::End), Some(BoundaryPoint::new(hello, 6)));
        assert_eq!(index.point_at(0, Bias::End), Some(BoundaryPoint::new(hello, 0)));
        assert_eq!(index.point_at(99, Bias::Start), None);
    }

    #[test]
    fn test_range_text_round_trip() {
        let (doc, ..) = sample();
        let index = TextIndex::build(&doc, doc.root());
        let range = index.range_for(4, 11).unwrap();
        assert_eq!(index.range_text(&doc, &range).as_deref(), Some("o big w"));
    }

    #[test]
    fn test_outside_root_is_none() {
        let (mut doc, p, ..) = sample();
        let loose = doc.create_text("loose");
        let index = TextIndex::build(&doc, p);
        assert_eq!(index.flat_offset(&doc, BoundaryPoint::new(loose, 0)), None);
    }

    #[test]
    fn test_find_chars() {
        let hay: Vec<char> = "abcabc".chars().collect();
        let needle: Vec<char> = "bc".chars().collect();
        assert_eq!(find_chars(&hay, &needle, 0), Some(1));
        assert_eq!(find_chars(&hay, &needle, 2), Some(4));
        assert_eq!(find_all_chars(&hay, &needle), vec![1, 4]);
        assert_eq!(find_chars(&hay, &[], 0), None);
    }
}
