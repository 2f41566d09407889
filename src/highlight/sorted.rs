//! Overlays in reading order
//!
//! Ordered by top, then left, then wider-first, then the document order
//! of the range that produced the overlay, then mount order.

use super::state::HighlightId;
use crate::dom::NodeId;
use crate::geometry::Rect;
use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeSet, HashMap};

/// Total order over `f64` for use as a set key
#[derive(Debug, Clone, Copy)]
struct OrderedF64(f64);

impl PartialEq for OrderedF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrderedF64 {}

impl PartialOrd for OrderedF64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrderedF64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    top: OrderedF64,
    left: OrderedF64,
    right: Reverse<OrderedF64>,
    range_order: usize,
    node: NodeId,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortedEntry {
    pub node: NodeId,
    pub highlight: HighlightId,
    pub rect: Rect,
    /// Flat text offset of the producing range's start
    pub range_order: usize,
}

impl SortedEntry {
    fn key(&self) -> SortKey {
        SortKey {
            top: OrderedF64(self.rect.top),
            left: OrderedF64(self.rect.left),
            right: Reverse(OrderedF64(self.rect.right())),
            range_order: self.range_order,
            node: self.node,
        }
    }
}

/// Border visibility computed for one overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderFlags {
    pub node: NodeId,
    pub left: bool,
    pub right: bool,
}

#[derive(Debug, Default)]
pub struct SortedElementIndex {
    keys: BTreeSet<SortKey>,
    entries: HashMap<NodeId, SortedEntry>,
}

impl SortedElementIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or reposition an overlay
    pub fn insert(&mut self, entry: SortedEntry) {
        if let Some(old) = self.entries.insert(entry.node, entry) {
            self.keys.remove(&old.key());
        }
        self.keys.insert(entry.key());
    }

    pub fn remove(&mut self, node: NodeId) -> Option<SortedEntry> {
        let old = self.entries.remove(&node)?;
        self.keys.remove(&old.key());
        Some(old)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.entries.contains_key(&node)
    }

    pub fn get(&self, node: NodeId) -> Option<&SortedEntry> {
        self.entries.get(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortedEntry> + '_ {
        self.keys.iter().filter_map(|k| self.entries.get(&k.node))
    }

    pub fn previous(&self, node: NodeId) -> Option<&SortedEntry> {
        let key = self.entries.get(&node)?.key();
        let prev = self.keys.range(..key).next_back()?;
        self.entries.get(&prev.node)
    }

    pub fn next(&self, node: NodeId) -> Option<&SortedEntry> {
        let key = self.entries.get(&node)?.key();
        let next = self.keys.range(key..).nth(1)?;
        self.entries.get(&next.node)
    }

    /// Hide facing borders of neighbouring overlays that belong to the
    /// same highlight, share a row and touch
    pub fn border_flags(&self) -> Vec<BorderFlags> {
        let ordered: Vec<&SortedEntry> = self.iter().collect();
        let mut flags: Vec<BorderFlags> = ordered
            .iter()
            .map(|e| BorderFlags {
                node: e.node,
                left: true,
                right: true,
            })
            .collect();
        for i in 1..ordered.len() {
            let (a, b) = (ordered[i - 1], ordered[i]);
            if a.highlight == b.highlight && same_row(&a.rect, &b.rect) && touches(&a.rect, &b.rect)
            {
                flags[i - 1].right = false;
                flags[i].left = false;
            }
        }
        flags
    }
}

fn same_row(a: &Rect, b: &Rect) -> bool {
    a.top == b.top && a.height == b.height
}

fn touches(a: &Rect, b: &Rect) -> bool {
    b.left <= a.right() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(node: usize, highlight: u64, rect: Rect, range_order: usize) -> SortedEntry {
        SortedEntry {
            node: NodeId(node),
            highlight: HighlightId(highlight),
            rect,
            range_order,
        }
    }

    #[test]
    fn test_orders_by_top_then_left_then_wider_first() {
        let mut index = SortedElementIndex::new();
        index.insert(entry(1, 1, Rect::new(50.0, 16.0, 10.0, 16.0), 0));
        index.insert(entry(2, 1, Rect::new(0.0, 16.0, 10.0, 16.0), 0));
        index.insert(entry(3, 2, Rect::new(0.0, 16.0, 40.0, 16.0), 0));
        index.insert(entry(4, 2, Rect::new(200.0, 0.0, 10.0, 16.0), 0));

        let order: Vec<usize> = index.iter().map(|e| e.node.0).collect();
        assert_eq!(order, vec![4, 3, 2, 1]);
        assert_eq!(index.previous(NodeId(2)).map(|e| e.node), Some(NodeId(3)));
        assert_eq!(index.next(NodeId(2)).map(|e| e.node), Some(NodeId(1)));
        assert_eq!(index.next(NodeId(1)), None);
    }

    #[test]
    fn test_reinsert_moves_entry() {
        let mut index = SortedElementIndex::new();
        index.insert(entry(1, 1, Rect::new(0.0, 0.0, 10.0, 16.0), 0));
        index.insert(entry(2, 1, Rect::new(0.0, 16.0, 10.0, 16.0), 0));
        index.insert(entry(1, 1, Rect::new(0.0, 32.0, 10.0, 16.0), 0));

        assert_eq!(index.len(), 2);
        let order: Vec<usize> = index.iter().map(|e| e.node.0).collect();
        assert_eq!(order, vec![2, 1]);

        assert!(index.remove(NodeId(1)).is_some());
        assert!(index.remove(NodeId(1)).is_none());
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_border_suppression_between_touching_neighbours() {
        let mut index = SortedElementIndex::new();
        index.insert(entry(1, 1, Rect::new(0.0, 0.0, 40.0, 16.0), 0));
        index.insert(entry(2, 1, Rect::new(40.0, 0.0, 24.0, 16.0), 5));
        // Same row, other highlight
        index.insert(entry(3, 2, Rect::new(64.0, 0.0, 16.0, 16.0), 8));
        // Same highlight, next line
        index.insert(entry(4, 1, Rect::new(0.0, 16.0, 16.0, 16.0), 10));

        let flags = index.border_flags();
        let find = |n: usize| flags.iter().find(|f| f.node == NodeId(n)).copied();
        assert_eq!(find(1).map(|f| (f.left, f.right)), Some((true, false)));
        assert_eq!(find(2).map(|f| (f.left, f.right)), Some((false, true)));
        assert_eq!(find(3).map(|f| (f.left, f.right)), Some((true, true)));
        assert_eq!(find(4).map(|f| (f.left, f.right)), Some((true, true)));
    }

    #[test]
    fn test_gap_keeps_borders() {
        let mut index = SortedElementIndex::new();
        index.insert(entry(1, 1, Rect::new(0.0, 0.0, 10.0, 16.0), 0));
        index.insert(entry(2, 1, Rect::new(30.0, 0.0, 10.0, 16.0), 3));
        assert!(index.border_flags().iter().all(|f| f.left && f.right));
    }
}
