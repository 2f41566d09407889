//! Document-order comparisons
//!
//! Used to order ranges for the sorted element index and to repair end
//! boundaries that spill onto offset 0 of the following block.

use super::document::{Document, NodeId};
use super::range::BoundaryPoint;
use std::cmp::Ordering;

/// Compare two nodes by document order
///
/// `Less` when `a` contains `b` or precedes it, `Equal` for the same node,
/// `Greater` otherwise (including nodes in unrelated trees).
pub fn compare_position(doc: &Document, a: NodeId, b: NodeId) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let mut chain_a = vec![a];
    chain_a.extend(doc.ancestors(a));
    let mut chain_b = vec![b];
    chain_b.extend(doc.ancestors(b));

    if chain_b.contains(&a) {
        return Ordering::Less;
    }
    if chain_a.contains(&b) {
        return Ordering::Greater;
    }

    let Some(lca_index_a) = chain_a.iter().position(|n| chain_b.contains(n)) else {
        return Ordering::Greater;
    };
    let lca = chain_a[lca_index_a];
    let Some(lca_index_b) = chain_b.iter().position(|n| *n == lca) else {
        return Ordering::Greater;
    };

    // Both chains have at least one node below the common ancestor since
    // neither node contains the other
    let sibling_a = chain_a[lca_index_a - 1];
    let sibling_b = chain_b[lca_index_b - 1];

    let mut cursor = doc.next_sibling(sibling_a);
    while let Some(node) = cursor {
        if node == sibling_b {
            return Ordering::Less;
        }
        cursor = doc.next_sibling(node);
    }
    Ordering::Greater
}

/// Compare two boundary points by document order
pub fn compare_boundary_points(doc: &Document, a: BoundaryPoint, b: BoundaryPoint) -> Ordering {
    if a.node == b.node {
        return a.offset.cmp(&b.offset);
    }

    match (compare_position(doc, a.node, b.node), compare_position(doc, b.node, a.node)) {
        // Unrelated trees: fall back to a stable arbitrary order
        (Ordering::Greater, Ordering::Greater) => return a.node.cmp(&b.node),
        (Ordering::Greater, _) => return compare_boundary_points(doc, b, a).reverse(),
        _ => {}
    }

    if doc.contains(a.node, b.node) {
        let mut child = b.node;
        while let Some(parent) = doc.parent(child) {
            if parent == a.node {
                break;
            }
            child = parent;
        }
        let index = doc.index_in_parent(child).unwrap_or(0);
        if index < a.offset {
            return Ordering::Greater;
        }
    }
    Ordering::Less
}

/// Whether `node` is passed over when looking for a previous leaf
fn is_skippable_leaf(doc: &Document, node: NodeId) -> bool {
    match doc.text(node) {
        Some(text) => text.trim().is_empty(),
        None => doc.is_overlay(node),
    }
}

/// Previous childless node in document order
///
/// Whitespace-only text nodes and overlay boxes are skipped. Returns
/// `None` when nothing precedes `node` in its tree.
pub fn previous_leaf_node(doc: &Document, node: NodeId) -> Option<NodeId> {
    let mut current = node;
    loop {
        let Some(previous) = doc.previous_sibling(current) else {
            current = doc.parent(current)?;
            continue;
        };
        let mut leaf = previous;
        while let Some(last) = doc.last_child(leaf) {
            leaf = last;
        }
        if is_skippable_leaf(doc, leaf) {
            current = leaf;
            continue;
        }
        return Some(leaf);
    }
}
