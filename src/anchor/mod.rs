//! Anchors and anchor resolution
//!
//! A `DomAnchor` durably identifies a span independent of any live range.
//! Resolution walks an ordered list of strategies: the text-fragment
//! locator first (cheap and precise when valid), then text-quote search.
//! New anchor kinds plug in as extra strategies.

pub mod fragment;
pub mod quote;

pub use fragment::{FragmentStrategy, TextDirective};
pub use quote::TextQuoteStrategy;

use crate::dom::{
    compare_boundary_points, compare_position, previous_leaf_node, BoundaryPoint, Document,
    NodeId, Range, Selection, TextIndex,
};
use crate::error::{HighlightError, Result};
use crate::logging::HighlightLogger;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::rc::Rc;

/// Characters of context stored on each side of a quote
pub const QUOTE_CONTEXT_CHARS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextQuote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    pub exact: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
}

impl TextQuote {
    pub fn new(exact: &str) -> Self {
        Self {
            prefix: None,
            exact: exact.to_string(),
            suffix: None,
        }
    }
}

/// Page hint for anchors created inside a paginated host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfPageHint {
    pub page_number: u32,
    pub page_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomAnchor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fragment: Option<String>,
    pub text: TextQuote,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<PdfPageHint>,
}

impl DomAnchor {
    pub fn from_quote(exact: &str) -> Self {
        Self {
            fragment: None,
            text: TextQuote::new(exact),
            pdf: None,
        }
    }

    pub fn with_fragment(mut self, fragment: &str) -> Self {
        self.fragment = Some(fragment.to_string());
        self
    }

    pub fn with_pdf(mut self, page_number: u32, page_label: &str) -> Self {
        self.pdf = Some(PdfPageHint {
            page_number,
            page_label: page_label.to_string(),
        });
        self
    }
}

/// Turns an anchor value into live ranges under `root`
pub trait AnchorResolver<A> {
    fn resolve(&self, doc: &Document, root: NodeId, anchor: &A) -> Vec<Range>;
}

impl<A, F> AnchorResolver<A> for F
where
    F: Fn(&Document, NodeId, &A) -> Vec<Range>,
{
    fn resolve(&self, doc: &Document, root: NodeId, anchor: &A) -> Vec<Range> {
        self(doc, root, anchor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyOutcome {
    Resolved(Vec<Range>),
    /// The anchor carries nothing this strategy can use
    NotApplicable,
    Failed(String),
}

pub trait ResolveStrategy {
    fn name(&self) -> &'static str;
    fn resolve(&self, doc: &Document, root: NodeId, anchor: &DomAnchor) -> StrategyOutcome;
}

/// Resolver for `DomAnchor` running its strategies in order
pub struct DomAnchorResolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
    logger: Rc<dyn HighlightLogger>,
}

impl DomAnchorResolver {
    /// Fragment first, then quote search
    pub fn new(logger: Rc<dyn HighlightLogger>) -> Self {
        Self::with_strategies(
            vec![Box::new(FragmentStrategy), Box::new(TextQuoteStrategy)],
            logger,
        )
    }

    pub fn with_strategies(
        strategies: Vec<Box<dyn ResolveStrategy>>,
        logger: Rc<dyn HighlightLogger>,
    ) -> Self {
        Self { strategies, logger }
    }

    pub fn push_strategy(&mut self, strategy: Box<dyn ResolveStrategy>) {
        self.strategies.push(strategy);
    }
}

impl AnchorResolver<DomAnchor> for DomAnchorResolver {
    fn resolve(&self, doc: &Document, root: NodeId, anchor: &DomAnchor) -> Vec<Range> {
        for strategy in &self.strategies {
            match strategy.resolve(doc, root, anchor) {
                StrategyOutcome::Resolved(ranges) if !ranges.is_empty() => return ranges,
                StrategyOutcome::Resolved(_) | StrategyOutcome::NotApplicable => {}
                StrategyOutcome::Failed(reason) => {
                    let message = format!("{} resolution failed: {}", strategy.name(), reason);
                    // Pages of a paginated host mount lazily, so misses there are routine
                    if anchor.pdf.is_some() {
                        self.logger.debug(&message);
                    } else {
                        self.logger.info(&message);
                    }
                }
            }
        }
        Vec::new()
    }
}

/// Pull an end boundary at offset 0 of a later node back to the end of
/// the previous leaf
///
/// Selecting up to the start of the next block leaves the end at
/// `(next_block_text, 0)`; the visual selection ends one leaf earlier.
pub fn normalize_range(doc: &Document, range: &mut Range, logger: &dyn HighlightLogger) {
    let (start, end) = (range.start, range.end);
    if end.offset != 0 || end.node == start.node || doc.contains(start.node, end.node) {
        return;
    }
    if compare_position(doc, end.node, start.node) != Ordering::Greater {
        return;
    }
    let Some(leaf) = previous_leaf_node(doc, end.node) else {
        logger.warn("normalize_range: no previous leaf node for range end");
        return;
    };
    let new_end = BoundaryPoint::new(leaf, doc.node_length(leaf));
    if compare_boundary_points(doc, start, new_end) == Ordering::Greater {
        logger.warn("normalize_range: previous leaf lies before range start");
        return;
    }
    range.end = new_end;
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Build an anchor for `range`, which must lie under `root`
///
/// Fragment generation is best effort; an anchor without one still
/// resolves through its quote.
pub fn anchor_from_range(
    doc: &Document,
    root: NodeId,
    range: &Range,
    pdf: Option<PdfPageHint>,
) -> Result<DomAnchor> {
    if range.is_collapsed() {
        return Err(HighlightError::CollapsedSelection);
    }
    let index = TextIndex::build(doc, root);
    let (start, end) = index
        .range_offsets(doc, range)
        .ok_or(HighlightError::OutsideContainer)?;
    let exact = index.slice(start, end);
    if exact.is_empty() {
        return Err(HighlightError::EmptyQuote);
    }
    Ok(DomAnchor {
        fragment: fragment::generate_fragment(&index, start, end),
        text: TextQuote {
            prefix: non_empty(index.slice(start.saturating_sub(QUOTE_CONTEXT_CHARS), start)),
            exact,
            suffix: non_empty(index.slice(end, end + QUOTE_CONTEXT_CHARS)),
        },
        pdf,
    })
}

/// Build an anchor for a non-collapsed selection
pub fn anchor_from_selection(
    doc: &Document,
    root: NodeId,
    selection: &Selection,
    pdf: Option<PdfPageHint>,
) -> Result<DomAnchor> {
    if selection.is_collapsed() {
        return Err(HighlightError::CollapsedSelection);
    }
    anchor_from_range(doc, root, &selection.to_range(doc), pdf)
}
