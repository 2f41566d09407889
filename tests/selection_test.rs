// Creating highlights from selections and ranges

mod common;

use common::{note, Fixture, Note, SAMPLE};
use overlay_highlighter::dom::{BoundaryPoint, Range, Selection};
use overlay_highlighter::error::HighlightError;
use overlay_highlighter::highlight::HighlightHandlers;

#[test]
fn test_current_selection_becomes_anchor() {
    let f = Fixture::new(&[SAMPLE]);
    let m = f.manager::<Note>();
    let text = f.texts[0];
    f.doc.borrow_mut().set_selection(Some(Selection::new(
        BoundaryPoint::new(text, 8),
        BoundaryPoint::new(text, 19),
    )));

    let view = m
        .create_highlight_from_current_selection(note(1), HighlightHandlers::none())
        .unwrap();

    let anchor = view.anchor();
    assert_eq!(anchor.text.exact, "some sample");
    assert_eq!(anchor.text.prefix.as_deref(), Some("This is "));
    assert_eq!(anchor.text.suffix.as_deref(), Some(" text for anchoring"));
    assert_eq!(anchor.fragment.as_deref(), Some(":~:text=some%20sample"));
    assert!(anchor.pdf.is_none());
    assert_eq!(f.overlays().len(), 1);
}

#[test]
fn test_backward_selection_is_ordered() {
    let f = Fixture::new(&[SAMPLE]);
    let m = f.manager::<Note>();
    let text = f.texts[0];
    let backward = Selection::new(BoundaryPoint::new(text, 12), BoundaryPoint::new(text, 8));

    let view = m
        .create_highlight_from_selection(&backward, note(1), HighlightHandlers::none())
        .unwrap();
    assert_eq!(view.anchor().text.exact, "some");
}

#[test]
fn test_selection_ending_at_next_paragraph_is_trimmed() {
    let f = Fixture::new(&[SAMPLE, "Second paragraph"]);
    let m = f.manager::<Note>();
    let selection = Selection::new(
        BoundaryPoint::new(f.texts[0], 20),
        BoundaryPoint::new(f.texts[1], 0),
    );

    let view = m
        .create_highlight_from_selection(&selection, note(1), HighlightHandlers::none())
        .unwrap();
    assert_eq!(view.anchor().text.exact, "text for anchoring");
    let ranges = m.ranges(view.id());
    assert_eq!(ranges[0].end, BoundaryPoint::new(f.texts[0], 38));
}

#[test]
fn test_collapsed_and_missing_selections_are_rejected() {
    let f = Fixture::new(&[SAMPLE]);
    let m = f.manager::<Note>();
    let text = f.texts[0];

    let missing = m.create_highlight_from_current_selection(note(1), HighlightHandlers::none());
    assert_eq!(missing.err(), Some(HighlightError::NoSelection));

    let point = BoundaryPoint::new(text, 4);
    let collapsed = m.create_highlight_from_selection(
        &Selection::new(point, point),
        note(1),
        HighlightHandlers::none(),
    );
    assert_eq!(collapsed.err(), Some(HighlightError::CollapsedSelection));

    let empty_range = m.create_highlight_from_range(
        Range::collapsed_at(point),
        note(1),
        HighlightHandlers::none(),
    );
    assert_eq!(empty_range.err(), Some(HighlightError::CollapsedSelection));
    assert!(m.is_empty());
}

#[test]
fn test_range_outside_container_is_rejected() {
    let f = Fixture::new(&[SAMPLE]);
    let m = f.manager::<Note>();
    let outside = {
        let mut doc = f.doc.borrow_mut();
        let root = doc.root();
        let aside = doc.append_element(root, "aside");
        doc.append_text(aside, "elsewhere")
    };
    let range = Range::new(BoundaryPoint::new(outside, 0), BoundaryPoint::new(outside, 4));

    let result = m.create_highlight_from_range(range, note(1), HighlightHandlers::none());
    assert_eq!(result.err(), Some(HighlightError::OutsideContainer));
}
