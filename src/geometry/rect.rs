//! Rectangle model and combiner
//!
//! A range usually renders as several rects: one per line box, one per
//! inline element it fully covers, and occasionally exact duplicates.
//! `combine` drops the nested ones and merges same-row neighbours.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Horizontal tolerance for sub-pixel gaps between neighbouring rects
const MERGE_TOLERANCE_PX: f64 = 1.0;

/// Axis-aligned rectangle in document coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// True when `other` lies entirely within this rect (edges may touch)
    pub fn encompasses(&self, other: &Rect) -> bool {
        self.left <= other.left
            && self.right() >= other.right()
            && self.top <= other.top
            && self.bottom() >= other.bottom()
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rect bounding both
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Bounding rect of a set of rects, `None` for an empty set
pub fn bounding(rects: &[Rect]) -> Option<Rect> {
    let (first, rest) = rects.split_first()?;
    Some(rest.iter().fold(*first, |acc, r| acc.union(r)))
}

/// Combine the fragment rects of a range into visually distinct rects
///
/// 1. Any rect fully encompassed by another is dropped (of two identical
///    rects exactly one survives).
/// 2. The survivors are sorted by top, then left, and a rect is merged
///    into its predecessor when both share `top` and `height` and the gap
///    between them is at most one pixel.
pub fn combine(rects: &[Rect]) -> Vec<Rect> {
    let mut kept: Vec<Rect> = rects
        .iter()
        .enumerate()
        .filter(|(i, rect)| {
            !rects.iter().enumerate().any(|(j, other)| {
                j != *i && other.encompasses(rect) && (other != *rect || j < *i)
            })
        })
        .map(|(_, rect)| *rect)
        .collect();

    kept.sort_by(|a, b| match a.top.total_cmp(&b.top) {
        Ordering::Equal => a.left.total_cmp(&b.left),
        other => other,
    });

    let mut merged: Vec<Rect> = Vec::with_capacity(kept.len());
    for rect in kept {
        match merged.last_mut() {
            Some(current)
                if current.top == rect.top
                    && current.height == rect.height
                    && rect.left <= current.right() + MERGE_TOLERANCE_PX =>
            {
                current.width = rect.right().max(current.right()) - current.left;
            }
            _ => merged.push(rect),
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_empty_and_single() {
        assert!(combine(&[]).is_empty());

        let single = Rect::new(3.0, 4.0, 10.0, 12.0);
        assert_eq!(combine(&[single]), vec![single]);
    }

    #[test]
    fn test_combine_adjacent_same_row() {
        let rects = [
            Rect::new(0.0, 0.0, 50.0, 50.0),
            Rect::new(50.0, 0.0, 50.0, 50.0),
        ];
        assert_eq!(combine(&rects), vec![Rect::new(0.0, 0.0, 100.0, 50.0)]);
    }

    #[test]
    fn test_combine_order_insensitive() {
        let rects = [
            Rect::new(50.0, 0.0, 50.0, 50.0),
            Rect::new(0.0, 0.0, 50.0, 50.0),
        ];
        assert_eq!(combine(&rects), vec![Rect::new(0.0, 0.0, 100.0, 50.0)]);
    }

    #[test]
    fn test_combine_subpixel_gap_merges() {
        let rects = [
            Rect::new(0.0, 10.0, 20.0, 16.0),
            Rect::new(20.8, 10.0, 20.0, 16.0),
        ];
        let out = combine(&rects);
        assert_eq!(out.len(), 1);
        assert!((out[0].width - 40.8).abs() < 1e-9);
    }

    #[test]
    fn test_combine_wide_gap_stays_split() {
        let rects = [
            Rect::new(0.0, 0.0, 20.0, 16.0),
            Rect::new(22.0, 0.0, 20.0, 16.0),
        ];
        assert_eq!(combine(&rects).len(), 2);
    }

    #[test]
    fn test_combine_different_height_never_merges() {
        let rects = [
            Rect::new(0.0, 0.0, 20.0, 16.0),
            Rect::new(20.0, 0.0, 20.0, 18.0),
        ];
        assert_eq!(combine(&rects).len(), 2);
    }

    #[test]
    fn test_combine_drops_encompassed() {
        let outer = Rect::new(0.0, 0.0, 100.0, 20.0);
        let inner = Rect::new(10.0, 2.0, 30.0, 10.0);
        assert_eq!(combine(&[inner, outer]), vec![outer]);
    }

    #[test]
    fn test_combine_duplicates_collapse_to_one() {
        let r = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(combine(&[r, r, r]), vec![r]);
    }

    #[test]
    fn test_combine_overlapping_extends_to_furthest_right() {
        let rects = [
            Rect::new(0.0, 0.0, 60.0, 16.0),
            Rect::new(40.0, 0.0, 10.0, 16.0),
            Rect::new(55.0, 0.0, 30.0, 16.0),
        ];
        // the middle rect is encompassed by the first; the third overlaps it
        assert_eq!(combine(&rects), vec![Rect::new(0.0, 0.0, 85.0, 16.0)]);
    }

    #[test]
    fn test_combine_multiline_keeps_rows() {
        let rects = [
            Rect::new(40.0, 0.0, 60.0, 16.0),
            Rect::new(0.0, 16.0, 30.0, 16.0),
        ];
        let out = combine(&rects);
        assert_eq!(out, vec![rects[0], rects[1]]);
    }

    #[test]
    fn test_bounding() {
        assert_eq!(bounding(&[]), None);
        let b = bounding(&[Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 5.0, 5.0, 20.0)]);
        assert_eq!(b, Some(Rect::new(0.0, 0.0, 25.0, 25.0)));
    }
}
