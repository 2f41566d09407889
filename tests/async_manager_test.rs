// Deferred manager construction

mod common;

use common::{note, Fixture, Note, SAMPLE};
use futures::channel::oneshot;
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use overlay_highlighter::anchor::DomAnchor;
use overlay_highlighter::error::HighlightError;
use overlay_highlighter::highlight::{HighlightHandlers, HighlightId, HighlightManagerOptions};
use overlay_highlighter::hosts::{AsyncDomAnchorHighlightManager, DomAnchorHighlightManager};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn test_calls_wait_for_the_manager() {
    let f = Fixture::new(&[SAMPLE]);
    let (ready, waiting) = oneshot::channel::<()>();
    let doc = f.doc.clone();
    let layout = f.layout.clone();
    let options = f.options::<Note>();
    let facade = AsyncDomAnchorHighlightManager::new(async move {
        let _ = waiting.await;
        DomAnchorHighlightManager::new(doc, layout, options)
    });

    let mut pool = LocalPool::new();
    let created: Rc<RefCell<Option<HighlightId>>> = Rc::new(RefCell::new(None));
    let slot = created.clone();
    let pending = facade.clone();
    pool.spawner()
        .spawn_local(async move {
            let view = pending
                .create_highlight(DomAnchor::from_quote("sample"), note(1), HighlightHandlers::none())
                .await
                .unwrap();
            *slot.borrow_mut() = Some(view.id());
        })
        .unwrap();

    pool.run_until_stalled();
    assert!(created.borrow().is_none());
    assert!(f.overlays().is_empty());

    ready.send(()).unwrap();
    pool.run_until_stalled();
    assert!(created.borrow().is_some());
    assert_eq!(f.overlays().len(), 1);

    // Later calls reuse the same manager
    let highlights = block_on(facade.highlights()).unwrap();
    assert_eq!(highlights.len(), 1);
    block_on(facade.remove_all_highlights()).unwrap();
    assert!(f.overlays().is_empty());
}

#[test]
fn test_initialization_failure_reaches_every_call() {
    let f = Fixture::new(&[SAMPLE]);
    let detached = f.doc.borrow_mut().create_element("section");
    let doc = f.doc.clone();
    let layout = f.layout.clone();
    let options =
        HighlightManagerOptions::<DomAnchor, Note>::new(detached, Rc::new(f.scheduler.clone()));
    let facade = AsyncDomAnchorHighlightManager::new(async move {
        DomAnchorHighlightManager::new(doc, layout, options)
    });

    let expected = HighlightError::MissingContainer(detached);
    let created = block_on(facade.create_highlight(
        DomAnchor::from_quote("sample"),
        note(1),
        HighlightHandlers::none(),
    ));
    assert_eq!(created.err(), Some(expected.clone()));
    assert_eq!(block_on(facade.remove_all_highlights()), Err(expected.clone()));
    assert_eq!(block_on(facade.focus_highlight(|_| true)), Err(expected));
}

#[test]
fn test_delegates_to_ready_manager() {
    let f = Fixture::new(&[SAMPLE]);
    let facade = AsyncDomAnchorHighlightManager::from_manager(f.manager::<Note>());

    block_on(facade.create_highlight(DomAnchor::from_quote("This"), note(1), HighlightHandlers::none()))
        .unwrap();
    block_on(facade.create_highlight(DomAnchor::from_quote("text"), note(2), HighlightHandlers::none()))
        .unwrap();
    assert_eq!(f.overlays().len(), 2);

    block_on(facade.focus_highlight(|n| n.id == 2)).unwrap();
    assert!(f.doc.borrow().last_scroll().is_some());

    block_on(facade.remove_highlights(|n| n.id == 1)).unwrap();
    let left = block_on(facade.highlights()).unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].data(), &note(2));
}
