//! Text-fragment directives
//!
//! The structural locator stored in `DomAnchor::fragment` uses the
//! text-fragment syntax: `:~:text=[prefix-,]start[,end][,-suffix]`, with
//! several directives joined by `&`. Each directive resolves to one
//! range; the fragment resolves only when every directive does.

use super::{DomAnchor, ResolveStrategy, StrategyOutcome};
use crate::dom::text::{find_all_chars, find_chars};
use crate::dom::{Document, NodeId, TextIndex};
use crate::error::{HighlightError, Result};
use std::fmt;

pub const DIRECTIVE_DELIMITER: &str = ":~:";

/// Quotes up to this many characters are stored whole; longer ones are
/// stored as a start/end word pair
const MAX_EXACT_CHARS: usize = 80;
const EDGE_WORDS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDirective {
    pub prefix: Option<String>,
    pub start: String,
    pub end: Option<String>,
    pub suffix: Option<String>,
}

/// Percent-encode a directive part; `-`, `,` and `&` are syntax
fn encode_part(part: &str) -> String {
    urlencoding::encode(part).replace('-', "%2D")
}

fn decode_part(part: &str) -> Result<String> {
    urlencoding::decode(part)
        .map(|s| s.into_owned())
        .map_err(|e| HighlightError::InvalidFragment(format!("bad encoding in '{}': {}", part, e)))
}

/// `needle` ends at `pos`, ignoring whitespace just before `pos`
fn ends_before(text: &[char], pos: usize, needle: &[char]) -> bool {
    let mut i = pos;
    while i > 0 && text[i - 1].is_whitespace() {
        i -= 1;
    }
    i >= needle.len() && text[i - needle.len()..i] == *needle
}

/// `needle` starts at `pos`, ignoring whitespace just after `pos`
fn starts_after(text: &[char], pos: usize, needle: &[char]) -> bool {
    let mut i = pos;
    while i < text.len() && text[i].is_whitespace() {
        i += 1;
    }
    i + needle.len() <= text.len() && text[i..i + needle.len()] == *needle
}

impl TextDirective {
    pub fn exact(start: &str) -> Self {
        Self {
            prefix: None,
            start: start.to_string(),
            end: None,
            suffix: None,
        }
    }

    /// Parse the value of a `text=` directive
    pub fn parse(value: &str) -> Result<Self> {
        let mut parts: Vec<&str> = value.split(',').collect();
        let prefix = match parts.first() {
            Some(first) if parts.len() > 1 && first.ends_with('-') => {
                let p = decode_part(first.trim_end_matches('-'))?;
                parts.remove(0);
                Some(p)
            }
            _ => None,
        };
        let suffix = match parts.last() {
            Some(last) if parts.len() > 1 && last.starts_with('-') => {
                let s = decode_part(last.trim_start_matches('-'))?;
                parts.pop();
                Some(s)
            }
            _ => None,
        };
        let (start, end) = match parts.as_slice() {
            [start] => (decode_part(start)?, None),
            [start, end] => (decode_part(start)?, Some(decode_part(end)?)),
            _ => {
                return Err(HighlightError::InvalidFragment(format!(
                    "malformed text directive '{}'",
                    value
                )))
            }
        };
        if start.is_empty() || end.as_deref() == Some("") {
            return Err(HighlightError::InvalidFragment(format!(
                "empty text in directive '{}'",
                value
            )));
        }
        Ok(Self {
            prefix,
            start,
            end,
            suffix,
        })
    }

    /// First match in `text` as flat `start..end`
    pub fn find(&self, text: &[char]) -> Option<(usize, usize)> {
        let start: Vec<char> = self.start.chars().collect();
        let end: Option<Vec<char>> = self.end.as_ref().map(|e| e.chars().collect());
        let prefix: Option<Vec<char>> = self.prefix.as_ref().map(|p| p.chars().collect());
        let suffix: Option<Vec<char>> = self.suffix.as_ref().map(|s| s.chars().collect());

        for candidate in find_all_chars(text, &start) {
            if let Some(prefix) = &prefix {
                if !ends_before(text, candidate, prefix) {
                    continue;
                }
            }
            let match_end = match &end {
                Some(end) => match find_chars(text, end, candidate + start.len()) {
                    Some(found) => found + end.len(),
                    None => break,
                },
                None => candidate + start.len(),
            };
            if let Some(suffix) = &suffix {
                if !starts_after(text, match_end, suffix) {
                    continue;
                }
            }
            return Some((candidate, match_end));
        }
        None
    }
}

impl fmt::Display for TextDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "text=")?;
        if let Some(prefix) = &self.prefix {
            write!(f, "{}-,", encode_part(prefix))?;
        }
        write!(f, "{}", encode_part(&self.start))?;
        if let Some(end) = &self.end {
            write!(f, ",{}", encode_part(end))?;
        }
        if let Some(suffix) = &self.suffix {
            write!(f, ",-{}", encode_part(suffix))?;
        }
        Ok(())
    }
}

/// Extract the text directives of a fragment
///
/// Accepts `#:~:text=...`, `:~:text=...` or a bare `text=...`; other
/// directive kinds are ignored.
pub fn parse_fragment(fragment: &str) -> Result<Vec<TextDirective>> {
    let fragment = fragment.trim_start_matches('#');
    let directives = match fragment.find(DIRECTIVE_DELIMITER) {
        Some(i) => &fragment[i + DIRECTIVE_DELIMITER.len()..],
        None => fragment,
    };
    let parsed = directives
        .split('&')
        .filter_map(|part| part.strip_prefix("text="))
        .map(TextDirective::parse)
        .collect::<Result<Vec<_>>>()?;
    if parsed.is_empty() {
        return Err(HighlightError::InvalidFragment(format!(
            "no text directive in '{}'",
            fragment
        )));
    }
    Ok(parsed)
}

pub fn format_fragment(directives: &[TextDirective]) -> String {
    let joined: Vec<String> = directives.iter().map(|d| d.to_string()).collect();
    format!("{}{}", DIRECTIVE_DELIMITER, joined.join("&"))
}

/// `start..end` spans of the words in `chars`
fn word_spans(chars: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut word_start = None;
    for (i, ch) in chars.iter().enumerate() {
        match (ch.is_whitespace(), word_start) {
            (false, None) => word_start = Some(i),
            (true, Some(s)) => {
                spans.push((s, i));
                word_start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = word_start {
        spans.push((s, chars.len()));
    }
    spans
}

/// Generate a fragment that resolves back to exactly `start..end`
///
/// Best effort: `None` when the text is blank or no unambiguous
/// directive could be found.
pub fn generate_fragment(index: &TextIndex, start: usize, end: usize) -> Option<String> {
    let text = index.chars();
    if start >= end || end > text.len() {
        return None;
    }
    let exact = &text[start..end];
    if exact.iter().all(|c| c.is_whitespace()) {
        return None;
    }

    let words = word_spans(exact);
    let mut directive = if exact.len() <= MAX_EXACT_CHARS || words.len() < EDGE_WORDS * 2 {
        TextDirective::exact(&exact.iter().collect::<String>())
    } else {
        let head_end = words[EDGE_WORDS - 1].1;
        let tail_start = words[words.len() - EDGE_WORDS].0;
        TextDirective {
            prefix: None,
            start: exact[..head_end].iter().collect(),
            end: Some(exact[tail_start..].iter().collect()),
            suffix: None,
        }
    };
    if directive.find(text) == Some((start, end)) {
        return Some(format_fragment(&[directive]));
    }

    directive.prefix = word_spans(&text[..start])
        .last()
        .map(|(s, e)| text[*s..*e].iter().collect());
    directive.suffix = word_spans(&text[end..])
        .first()
        .map(|(s, e)| text[end + s..end + e].iter().collect());
    (directive.find(text) == Some((start, end))).then(|| format_fragment(&[directive]))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FragmentStrategy;

impl ResolveStrategy for FragmentStrategy {
    fn name(&self) -> &'static str {
        "text-fragment"
    }

    fn resolve(&self, doc: &Document, root: NodeId, anchor: &DomAnchor) -> StrategyOutcome {
        let Some(fragment) = &anchor.fragment else {
            return StrategyOutcome::NotApplicable;
        };
        let directives = match parse_fragment(fragment) {
            Ok(directives) => directives,
            Err(e) => return StrategyOutcome::Failed(e.to_string()),
        };
        let index = TextIndex::build(doc, root);
        let mut ranges = Vec::with_capacity(directives.len());
        for directive in &directives {
            match directive
                .find(index.chars())
                .and_then(|(s, e)| index.range_for(s, e))
            {
                Some(range) => ranges.push(range),
                None => {
                    return StrategyOutcome::Failed(format!("directive '{}' did not match", directive))
                }
            }
        }
        StrategyOutcome::Resolved(ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn index_of(text: &str) -> (Document, TextIndex) {
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_text(root, text);
        let index = TextIndex::build(&doc, root);
        (doc, index)
    }

    #[test]
    fn test_parse_full_directive() {
        let directives = parse_fragment("#:~:text=an-,example,text,-that").unwrap();
        assert_eq!(
            directives,
            vec![TextDirective {
                prefix: Some("an".into()),
                start: "example".into(),
                end: Some("text".into()),
                suffix: Some("that".into()),
            }]
        );
    }

    #[test]
    fn test_parse_multiple_and_encoded() {
        let directives = parse_fragment(":~:text=foo%2Dbar&unknown=1&text=a%2C%20b").unwrap();
        assert_eq!(directives.len(), 2);
        assert_eq!(directives[0].start, "foo-bar");
        assert_eq!(directives[1].start, "a, b");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_fragment(":~:nothing").is_err());
        assert!(parse_fragment(":~:text=a,b,c").is_err());
        assert!(parse_fragment(":~:text=").is_err());
    }

    #[test]
    fn test_display_escapes_syntax() {
        let directive = TextDirective {
            prefix: Some("x-y".into()),
            start: "a,b".into(),
            end: None,
            suffix: Some("&".into()),
        };
        let rendered = directive.to_string();
        assert_eq!(rendered, "text=x%2Dy-,a%2Cb,-%26");
        assert_eq!(TextDirective::parse(&rendered["text=".len()..]).unwrap(), directive);
    }

    #[test]
    fn test_find_with_range_and_context() {
        let text = chars("one example of text, another example with more text that ends");
        let directive = TextDirective {
            prefix: Some("another".into()),
            start: "example".into(),
            end: Some("text".into()),
            suffix: Some("that".into()),
        };
        assert_eq!(directive.find(&text), Some((29, 51)));

        let without_context = TextDirective {
            prefix: None,
            start: "example".into(),
            end: Some("text".into()),
            suffix: None,
        };
        assert_eq!(without_context.find(&text), Some((4, 19)));
    }

    #[test]
    fn test_generate_short_unique() {
        let (_, index) = index_of("The quick brown fox");
        let fragment = generate_fragment(&index, 4, 9).unwrap();
        assert_eq!(fragment, ":~:text=quick");
    }

    #[test]
    fn test_generate_adds_context_for_duplicates() {
        let (_, index) = index_of("cat dog cat bird");
        let fragment = generate_fragment(&index, 8, 11).unwrap();
        let directives = parse_fragment(&fragment).unwrap();
        assert_eq!(directives[0].prefix.as_deref(), Some("dog"));
        assert_eq!(directives[0].find(index.chars()), Some((8, 11)));
    }

    #[test]
    fn test_generate_long_uses_start_and_end() {
        let body = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu nu xi omicron pi rho sigma";
        let (_, index) = index_of(body);
        let fragment = generate_fragment(&index, 0, index.len()).unwrap();
        let directives = parse_fragment(&fragment).unwrap();
        assert_eq!(directives[0].start, "alpha beta gamma");
        assert_eq!(directives[0].end.as_deref(), Some("pi rho sigma"));
    }

    #[test]
    fn test_generate_blank_is_none() {
        let (_, index) = index_of("a    b");
        assert_eq!(generate_fragment(&index, 1, 5), None);
    }

    #[test]
    fn test_strategy_requires_every_directive() {
        let (doc, _) = index_of("first second third");
        let root = doc.root();

        let anchor = DomAnchor::from_quote("first").with_fragment(":~:text=first&text=third");
        match FragmentStrategy.resolve(&doc, root, &anchor) {
            StrategyOutcome::Resolved(ranges) => assert_eq!(ranges.len(), 2),
            other => panic!("unexpected outcome {:?}", other),
        }

        let anchor = DomAnchor::from_quote("first").with_fragment(":~:text=first&text=missing");
        assert!(matches!(
            FragmentStrategy.resolve(&doc, root, &anchor),
            StrategyOutcome::Failed(_)
        ));
    }
}
