//! Text-quote resolution
//!
//! Finds `exact` in the container's text. When it occurs more than once
//! the occurrence whose surroundings best agree with the quote's prefix
//! and suffix wins; ties go to the earliest.

use super::{DomAnchor, ResolveStrategy, StrategyOutcome, TextQuote};
use crate::dom::text::find_all_chars;
use crate::dom::{Document, NodeId, TextIndex};

/// Characters of `quote.prefix` and `quote.suffix` that agree with the
/// text around `start..end`
fn context_score(text: &[char], start: usize, end: usize, quote: &TextQuote) -> usize {
    let mut score = 0;
    if let Some(prefix) = &quote.prefix {
        let prefix: Vec<char> = prefix.chars().collect();
        score += prefix
            .iter()
            .rev()
            .zip(text[..start].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();
    }
    if let Some(suffix) = &quote.suffix {
        score += suffix
            .chars()
            .zip(text[end..].iter())
            .take_while(|(a, b)| a == *b)
            .count();
    }
    score
}

/// Flat `start..end` of the best occurrence of the quote
pub fn find_quote(text: &[char], quote: &TextQuote) -> Option<(usize, usize)> {
    let exact: Vec<char> = quote.exact.chars().collect();
    let mut best: Option<(usize, usize)> = None;
    for start in find_all_chars(text, &exact) {
        let end = start + exact.len();
        let score = context_score(text, start, end, quote);
        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((start, score));
        }
    }
    best.map(|(start, _)| (start, start + exact.len()))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextQuoteStrategy;

impl ResolveStrategy for TextQuoteStrategy {
    fn name(&self) -> &'static str {
        "text-quote"
    }

    fn resolve(&self, doc: &Document, root: NodeId, anchor: &DomAnchor) -> StrategyOutcome {
        if anchor.text.exact.is_empty() {
            return StrategyOutcome::NotApplicable;
        }
        let index = TextIndex::build(doc, root);
        match find_quote(index.chars(), &anchor.text).and_then(|(s, e)| index.range_for(s, e)) {
            Some(range) => StrategyOutcome::Resolved(vec![range]),
            None => StrategyOutcome::Failed(format!("quote \"{}\" not found", anchor.text.exact)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_find_unique_quote() {
        let text = chars("This is some sample text");
        assert_eq!(find_quote(&text, &TextQuote::new("some")), Some((8, 12)));
        assert_eq!(find_quote(&text, &TextQuote::new("absent")), None);
    }

    #[test]
    fn test_context_disambiguates() {
        let text = chars("red apple, green apple, blue apple");
        let quote = TextQuote {
            prefix: Some("green ".into()),
            exact: "apple".into(),
            suffix: None,
        };
        assert_eq!(find_quote(&text, &quote), Some((17, 22)));

        let quote = TextQuote {
            prefix: None,
            exact: "apple".into(),
            suffix: Some(", blue".into()),
        };
        assert_eq!(find_quote(&text, &quote), Some((17, 22)));
    }

    #[test]
    fn test_ties_pick_first() {
        let text = chars("abc abc");
        assert_eq!(find_quote(&text, &TextQuote::new("abc")), Some((0, 3)));
    }

    #[test]
    fn test_strategy_spans_text_nodes() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_element(root, "p");
        let first = doc.append_text(p, "Hello ");
        let b = doc.append_element(p, "b");
        let second = doc.append_text(b, "world");

        let anchor = DomAnchor::from_quote("lo wor");
        match TextQuoteStrategy.resolve(&doc, root, &anchor) {
            StrategyOutcome::Resolved(ranges) => {
                assert_eq!(ranges.len(), 1);
                assert_eq!(ranges[0].start.node, first);
                assert_eq!(ranges[0].start.offset, 3);
                assert_eq!(ranges[0].end.node, second);
                assert_eq!(ranges[0].end.offset, 3);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
