//! Highlight collection manager
//!
//! Owns every highlight created through it and the overlay elements that
//! paint them. Geometry is recomputed on a deferred task after creation,
//! on resize, and after observed mutations of the container subtree.

use super::display::OverlaySnapshot;
use super::events::{EventHandler, EventTable, HighlightEvent};
use super::options::{ClassNamePolicy, EquivalenceFn, HighlightManagerOptions};
use super::sorted::{SortedElementIndex, SortedEntry};
use super::state::{Highlight, HighlightHandlers, HighlightId, OverlaySlot};
use super::view::{BeforeFocusHook, HighlightView};
use crate::anchor::AnchorResolver;
use crate::dom::{
    Document, DocumentRef, MutationKind, MutationRecord, NodeId, ObserverId, OverlayStyle, Range,
    ScrollBehavior, ScrollBlock, TextIndex,
};
use crate::error::{HighlightError, Result};
use crate::geometry::{bounding, combine, Rect};
use crate::layout::LayoutEngine;
use crate::logging::HighlightLogger;
use crate::scheduler::Scheduler;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Marks overlays with the id of the manager that owns them
pub const MANAGER_ATTRIBUTE: &str = "data-highlight-manager";
/// Marks overlays with the id of the highlight they paint
pub const INDEX_ATTRIBUTE: &str = "data-highlight-index";

/// Clicks landing on these never count as highlight clicks
const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "label", "summary", "option",
];

static NEXT_MANAGER_ID: AtomicU32 = AtomicU32::new(1);

/// Pointer click in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickEvent {
    pub x: f64,
    pub y: f64,
    /// Node the click was originally dispatched to, if known
    pub target: Option<NodeId>,
}

impl ClickEvent {
    pub fn at(x: f64, y: f64) -> Self {
        Self { x, y, target: None }
    }
}

pub(crate) struct CollectionState<A, D> {
    pub(crate) highlights: Vec<Highlight<A, D>>,
    next_id: u64,
    sorted: SortedElementIndex,
    refresh_scheduled: bool,
}

impl<A, D> CollectionState<A, D> {
    pub(crate) fn get(&self, id: HighlightId) -> Option<&Highlight<A, D>> {
        self.highlights.iter().find(|h| h.id == id)
    }

    fn position(&self, id: HighlightId) -> Option<usize> {
        self.highlights.iter().position(|h| h.id == id)
    }

    fn owner_of(&self, node: NodeId) -> Option<HighlightId> {
        self.highlights
            .iter()
            .find(|h| h.all_nodes().any(|n| n == node))
            .map(|h| h.id)
    }
}

pub(crate) struct ManagerInner<A, D> {
    id: u32,
    doc: DocumentRef,
    container: NodeId,
    layout: Rc<dyn LayoutEngine>,
    resolver: Box<dyn AnchorResolver<A>>,
    class_names: ClassNamePolicy<D>,
    highlight_class: String,
    hover_class: String,
    focus_class: String,
    are_equivalent: EquivalenceFn<A, D>,
    listen_resize: bool,
    logger: Rc<dyn HighlightLogger>,
    scheduler: Rc<dyn Scheduler>,
    before_focus: RefCell<Option<BeforeFocusHook<A, D>>>,
    observer: ObserverId,
    pub(crate) state: RefCell<CollectionState<A, D>>,
    pub(crate) events: RefCell<EventTable>,
}

impl<A, D> Drop for ManagerInner<A, D> {
    fn drop(&mut self) {
        if let Ok(mut doc) = self.doc.try_borrow_mut() {
            doc.disconnect(self.observer);
        }
    }
}

/// Manager for highlights anchored by `A` and carrying host data `D`
pub struct HighlightManager<A, D> {
    inner: Rc<ManagerInner<A, D>>,
}

impl<A, D> Clone for HighlightManager<A, D> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A, D> HighlightManager<A, D>
where
    A: Clone + PartialEq + 'static,
    D: Clone + PartialEq + 'static,
{
    /// Fails with `MissingContainer` unless the container is an element
    /// attached to the document
    pub fn new(
        doc: DocumentRef,
        layout: Rc<dyn LayoutEngine>,
        resolver: impl AnchorResolver<A> + 'static,
        options: HighlightManagerOptions<A, D>,
    ) -> Result<Self> {
        let container = options.container;
        let observer = {
            let mut d = doc.borrow_mut();
            if d.element(container).is_none() || !d.is_connected(container) {
                return Err(HighlightError::MissingContainer(container));
            }
            d.observe(container)
        };
        let id = NEXT_MANAGER_ID.fetch_add(1, Ordering::Relaxed);
        options
            .logger
            .debug(&format!("highlight manager {} attached to {:?}", id, container));

        Ok(Self {
            inner: Rc::new(ManagerInner {
                id,
                doc,
                container,
                layout,
                resolver: Box::new(resolver),
                class_names: options.class_names,
                highlight_class: options.highlight_class,
                hover_class: options.hover_class,
                focus_class: options.focus_class,
                are_equivalent: options.are_equivalent,
                listen_resize: options.listen_resize,
                logger: options.logger,
                scheduler: options.scheduler,
                before_focus: RefCell::new(options.before_focus),
                observer,
                state: RefCell::new(CollectionState {
                    highlights: Vec::new(),
                    next_id: 1,
                    sorted: SortedElementIndex::new(),
                    refresh_scheduled: false,
                }),
                events: RefCell::new(EventTable::default()),
            }),
        })
    }

    pub fn id(&self) -> u32 {
        self.inner.id
    }

    pub fn document(&self) -> &DocumentRef {
        &self.inner.doc
    }

    pub fn container(&self) -> NodeId {
        self.inner.container
    }

    pub fn logger(&self) -> &Rc<dyn HighlightLogger> {
        &self.inner.logger
    }

    pub fn scheduler(&self) -> &Rc<dyn Scheduler> {
        &self.inner.scheduler
    }

    pub fn set_before_focus(&self, hook: Option<BeforeFocusHook<A, D>>) {
        *self.inner.before_focus.borrow_mut() = hook;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    fn view_of(&self, h: &Highlight<A, D>) -> HighlightView<A, D> {
        HighlightView::new(
            h.id,
            h.anchor.clone(),
            h.data.clone(),
            h.class_names.clone(),
            Rc::downgrade(&self.inner),
        )
    }

    /// Every highlight, in creation order
    pub fn highlights(&self) -> Vec<HighlightView<A, D>> {
        let state = self.inner.state.borrow();
        state.highlights.iter().map(|h| self.view_of(h)).collect()
    }

    pub fn highlight(&self, id: HighlightId) -> Option<HighlightView<A, D>> {
        let state = self.inner.state.borrow();
        state.get(id).map(|h| self.view_of(h))
    }

    /// First highlight whose data satisfies `predicate`
    pub fn find(&self, predicate: impl Fn(&D) -> bool) -> Option<HighlightView<A, D>> {
        let state = self.inner.state.borrow();
        state
            .highlights
            .iter()
            .find(|h| predicate(&h.data))
            .map(|h| self.view_of(h))
    }

    pub fn len(&self) -> usize {
        self.inner.state.borrow().highlights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolved ranges of a highlight
    pub fn ranges(&self, id: HighlightId) -> Vec<Range> {
        self.inner
            .state
            .borrow()
            .get(id)
            .map(|h| h.ranges.clone())
            .unwrap_or_default()
    }

    /// Overlay nodes currently shown for a highlight
    pub fn elements(&self, id: HighlightId) -> Vec<NodeId> {
        self.inner
            .state
            .borrow()
            .get(id)
            .map(|h| h.visible_nodes().collect())
            .unwrap_or_default()
    }

    /// Boxes of the visible overlays, in viewport coordinates
    pub fn client_rects(&self, id: HighlightId) -> Vec<Rect> {
        let doc = self.inner.doc.borrow();
        let viewport = doc.viewport();
        self.elements(id)
            .into_iter()
            .filter_map(|node| doc.overlay(node).map(|s| s.rect))
            .map(|r| r.translate(-viewport.scroll_x, -viewport.scroll_y))
            .collect()
    }

    pub fn bounding_client_rect(&self, id: HighlightId) -> Option<Rect> {
        bounding(&self.client_rects(id))
    }

    /// Every overlay owned by this manager, in reading order
    pub fn display_list(&self) -> Vec<OverlaySnapshot> {
        let doc = self.inner.doc.borrow();
        let state = self.inner.state.borrow();
        let mut out = Vec::new();
        for entry in state.sorted.iter() {
            if let Some(style) = doc.overlay(entry.node) {
                out.push(OverlaySnapshot {
                    highlight_id: entry.highlight,
                    manager_id: self.inner.id,
                    rect: style.rect,
                    class_names: doc.classes(entry.node).to_vec(),
                    border_left: style.border_left,
                    border_right: style.border_right,
                    hidden: style.hidden,
                });
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Creation and removal
    // ------------------------------------------------------------------

    /// Create a highlight, or return the existing one that is equivalent
    /// or resolves to the same ranges
    pub fn create_highlight(
        &self,
        anchor: A,
        data: D,
        handlers: HighlightHandlers<D>,
    ) -> HighlightView<A, D> {
        if let Some(existing) = self.find_equivalent(&anchor, &data) {
            return existing;
        }
        let ranges = {
            let doc = self.inner.doc.borrow();
            self.inner.resolver.resolve(&doc, self.inner.container, &anchor)
        };
        if let Some(existing) = self.find_coextensive(&ranges) {
            return existing;
        }

        let view = {
            let mut state = self.inner.state.borrow_mut();
            let id = HighlightId(state.next_id);
            state.next_id += 1;
            let class_names = self.inner.class_names.class_names(&data, state.highlights.len());
            state.highlights.push(Highlight {
                id,
                anchor,
                data,
                ranges,
                slots: Vec::new(),
                class_names,
                on_click: handlers.on_click,
            });
            let created = &state.highlights[state.highlights.len() - 1];
            self.view_of(created)
        };

        let mounted = self.render(&[view.id()]);
        self.schedule_refresh();
        self.emit_new_elements(&mounted);
        view
    }

    fn find_equivalent(&self, anchor: &A, data: &D) -> Option<HighlightView<A, D>> {
        let state = self.inner.state.borrow();
        state
            .highlights
            .iter()
            .find(|h| h.anchor == *anchor || (self.inner.are_equivalent)(&h.anchor, &h.data, anchor, data))
            .map(|h| self.view_of(h))
    }

    fn find_coextensive(&self, ranges: &[Range]) -> Option<HighlightView<A, D>> {
        if ranges.is_empty() {
            return None;
        }
        let state = self.inner.state.borrow();
        state
            .highlights
            .iter()
            .find(|h| {
                h.ranges.len() == ranges.len()
                    && h.ranges.iter().zip(ranges).all(|(a, b)| a.is_coextensive(b))
            })
            .map(|h| self.view_of(h))
    }

    /// Remove a highlight and its overlays; unknown ids are ignored
    pub fn remove_highlight(&self, id: HighlightId) {
        {
            let mut doc = self.inner.doc.borrow_mut();
            let mut state = self.inner.state.borrow_mut();
            let state = &mut *state;
            let Some(pos) = state.position(id) else {
                return;
            };
            let mut highlight = state.highlights.remove(pos);
            teardown(&mut doc, &mut state.sorted, &mut highlight);
            apply_borders(&mut doc, &state.sorted);
        }
        self.inner.events.borrow_mut().clear(id);
    }

    pub fn remove_highlights(&self, predicate: impl Fn(&D) -> bool) {
        let ids: Vec<HighlightId> = self
            .inner
            .state
            .borrow()
            .highlights
            .iter()
            .filter(|h| predicate(&h.data))
            .map(|h| h.id)
            .collect();
        for id in ids {
            self.remove_highlight(id);
        }
    }

    pub fn remove_all_highlights(&self) {
        self.remove_highlights(|_| true);
    }

    // ------------------------------------------------------------------
    // Interaction
    // ------------------------------------------------------------------

    /// Bring the first highlight matching `predicate` into view and mark
    /// it focused
    ///
    /// A timeout from the before-focus hook is returned; any other hook
    /// failure is logged and focusing carries on.
    pub async fn focus_highlight(&self, predicate: impl Fn(&D) -> bool) -> Result<()> {
        let Some(view) = self.find(&predicate) else {
            self.inner
                .logger
                .error("focus_highlight: no highlight matches the predicate");
            return Ok(());
        };
        self.focus_view(view).await
    }

    /// Like `focus_highlight`, for one highlight by id
    pub async fn focus_highlight_by_id(&self, id: HighlightId) -> Result<()> {
        let Some(view) = self.highlight(id) else {
            self.inner
                .logger
                .error(&format!("focus_highlight: no highlight {}", id));
            return Ok(());
        };
        self.focus_view(view).await
    }

    async fn focus_view(&self, view: HighlightView<A, D>) -> Result<()> {
        self.reset_styles();

        let hook = self.inner.before_focus.borrow().clone();
        if let Some(hook) = hook {
            match hook(view.clone()).await {
                Ok(()) => {}
                Err(e @ HighlightError::Timeout { .. }) => return Err(e),
                Err(e) => self
                    .inner
                    .logger
                    .warn(&format!("focus_highlight: {}; focusing anyway", e)),
            }
        }

        let mut doc = self.inner.doc.borrow_mut();
        let state = self.inner.state.borrow();
        let Some(highlight) = state.get(view.id()) else {
            self.inner.logger.error(&format!(
                "focus_highlight: highlight {} was removed while focusing",
                view.id()
            ));
            return Ok(());
        };
        let nodes: Vec<NodeId> = highlight.visible_nodes().collect();
        let Some(target) = nodes.first().and_then(|n| doc.overlay(*n)).map(|s| s.rect) else {
            self.inner.logger.error(&format!(
                "focus_highlight: highlight {} has no elements",
                view.id()
            ));
            return Ok(());
        };
        doc.scroll_into_view(target, ScrollBehavior::Smooth, ScrollBlock::Center);
        for node in nodes {
            doc.add_class(node, &self.inner.focus_class);
        }
        Ok(())
    }

    /// Recompute class names of matching highlights and swap them on
    /// their overlays
    pub fn update_highlights_class_names(&self, predicate: impl Fn(&D) -> bool) {
        let mut doc = self.inner.doc.borrow_mut();
        let mut state = self.inner.state.borrow_mut();
        for (index, highlight) in state.highlights.iter_mut().enumerate() {
            if !predicate(&highlight.data) {
                continue;
            }
            let fresh = self.inner.class_names.class_names(&highlight.data, index);
            for node in highlight.all_nodes() {
                for old in highlight.class_names.iter().filter(|c| !fresh.contains(c)) {
                    doc.remove_class(node, old);
                }
                for class in &fresh {
                    doc.add_class(node, class);
                }
            }
            highlight.class_names = fresh;
        }
    }

    /// Hover the topmost highlight under the pointer; returns its id
    pub fn handle_pointer_move(&self, x: f64, y: f64) -> Option<HighlightId> {
        let mut doc = self.inner.doc.borrow_mut();
        let state = self.inner.state.borrow();
        self.clear_interaction_classes(&mut doc, &state);
        let hit = hit_test(&mut doc, &*state, x, y)?;
        if let Some(highlight) = state.get(hit) {
            for node in highlight.visible_nodes() {
                doc.add_class(node, &self.inner.hover_class);
            }
        }
        Some(hit)
    }

    /// Dispatch a click to the highlight under the pointer
    ///
    /// Returns whether a click handler ran.
    pub fn handle_click(&self, event: ClickEvent) -> bool {
        let (handler, data) = {
            let mut doc = self.inner.doc.borrow_mut();
            let state = self.inner.state.borrow();
            let Some(hit) = hit_test(&mut doc, &*state, event.x, event.y) else {
                return false;
            };
            if let Some(target) = event.target {
                if self.is_interactive(&doc, target) {
                    return false;
                }
            }
            let Some(highlight) = state.get(hit) else {
                return false;
            };
            let Some(handler) = highlight.on_click.clone() else {
                return false;
            };
            (handler, highlight.data.clone())
        };
        handler(&data);
        true
    }

    /// Drop hover and focus styling from every overlay
    pub fn reset_styles(&self) {
        let mut doc = self.inner.doc.borrow_mut();
        let state = self.inner.state.borrow();
        self.clear_interaction_classes(&mut doc, &state);
    }

    fn clear_interaction_classes(&self, doc: &mut Document, state: &CollectionState<A, D>) {
        for node in state.highlights.iter().flat_map(|h| h.all_nodes()) {
            doc.remove_class(node, &self.inner.hover_class);
            doc.remove_class(node, &self.inner.focus_class);
        }
    }

    fn is_own_overlay(&self, doc: &Document, node: NodeId) -> bool {
        doc.attribute(node, MANAGER_ATTRIBUTE)
            .map_or(false, |v| v == self.inner.id.to_string())
    }

    fn is_interactive(&self, doc: &Document, target: NodeId) -> bool {
        let mut chain = vec![target];
        chain.extend(doc.ancestors(target));
        for node in chain {
            if node == self.inner.container || self.is_own_overlay(doc, node) {
                return false;
            }
            let Some(tag) = doc.tag(node) else { continue };
            if INTERACTIVE_TAGS.contains(&tag)
                || doc.attribute(node, "contenteditable").map_or(false, |v| v != "false")
            {
                return true;
            }
        }
        false
    }

    // ------------------------------------------------------------------
    // Geometry and reanchoring
    // ------------------------------------------------------------------

    /// Relayout every highlight
    pub fn refresh_geometry(&self) {
        let ids: Vec<HighlightId> = self
            .inner
            .state
            .borrow()
            .highlights
            .iter()
            .map(|h| h.id)
            .collect();
        let mounted = self.render(&ids);
        self.emit_new_elements(&mounted);
    }

    /// Window resize; ignored when resize listening is off
    pub fn handle_resize(&self) {
        if self.inner.listen_resize {
            self.refresh_geometry();
        }
    }

    /// Drain observed mutations, reanchor what they invalidated and
    /// relayout
    ///
    /// Records caused solely by this manager's own overlays are ignored.
    pub fn handle_mutations(&self) -> usize {
        let records: Vec<MutationRecord> = {
            let mut doc = self.inner.doc.borrow_mut();
            let records = doc.take_records(self.inner.observer);
            records
                .into_iter()
                .filter(|r| !self.is_own_record(&doc, r))
                .collect()
        };
        if records.is_empty() {
            return 0;
        }
        let added = records.iter().any(|r| !r.added.is_empty());
        let removed = records.iter().any(|r| !r.removed.is_empty());
        let edited: Vec<NodeId> = records
            .iter()
            .filter(|r| r.kind == MutationKind::CharacterData)
            .map(|r| r.target)
            .collect();

        {
            let doc = self.inner.doc.borrow();
            let mut state = self.inner.state.borrow_mut();
            for highlight in state.highlights.iter_mut() {
                let stale = (added && highlight.is_unanchored())
                    || (removed && highlight.has_detached_range(&doc, self.inner.container))
                    || highlight.has_stale_range(&doc, &edited);
                if stale {
                    highlight.ranges =
                        self.inner
                            .resolver
                            .resolve(&doc, self.inner.container, &highlight.anchor);
                }
            }
        }
        self.refresh_geometry();
        records.len()
    }

    fn is_own_record(&self, doc: &Document, record: &MutationRecord) -> bool {
        record.kind == MutationKind::ChildList
            && !(record.added.is_empty() && record.removed.is_empty())
            && record
                .added
                .iter()
                .chain(&record.removed)
                .all(|n| self.is_own_overlay(doc, *n))
    }

    fn schedule_refresh(&self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if state.refresh_scheduled {
                return;
            }
            state.refresh_scheduled = true;
        }
        let weak = Rc::downgrade(&self.inner);
        self.inner.scheduler.defer(Box::new(move || {
            let Some(inner) = weak.upgrade() else { return };
            inner.state.borrow_mut().refresh_scheduled = false;
            HighlightManager { inner }.refresh_geometry();
        }));
    }

    fn emit_new_elements(&self, ids: &[HighlightId]) {
        for id in ids {
            let handlers = self
                .inner
                .events
                .borrow()
                .handlers(*id, HighlightEvent::NewElements);
            for handler in handlers {
                handler(*id);
            }
        }
    }

    /// Subscribe to a highlight event by id
    pub fn on(&self, id: HighlightId, event: HighlightEvent, handler: EventHandler) -> bool {
        self.inner.events.borrow_mut().on(id, event, handler)
    }

    pub fn off(&self, id: HighlightId, event: HighlightEvent, handler: &EventHandler) -> bool {
        self.inner.events.borrow_mut().off(id, event, handler)
    }

    /// Lay out the given highlights; returns those that gained or
    /// revealed overlays
    fn render(&self, ids: &[HighlightId]) -> Vec<HighlightId> {
        let inner = &self.inner;
        let mut doc = inner.doc.borrow_mut();
        let mut state = inner.state.borrow_mut();
        let CollectionState {
            highlights, sorted, ..
        } = &mut *state;
        let index = TextIndex::build(&doc, doc.root());

        let mut mounted = Vec::new();
        for id in ids {
            let Some(highlight) = highlights.iter_mut().find(|h| h.id == *id) else {
                continue;
            };
            if highlight.is_unanchored() {
                teardown(&mut doc, sorted, highlight);
                highlight.ranges = inner.resolver.resolve(&doc, inner.container, &highlight.anchor);
                if highlight.is_unanchored() {
                    continue;
                }
            }
            if self.layout_highlight(&mut doc, sorted, &index, highlight) {
                mounted.push(*id);
            }
        }
        apply_borders(&mut doc, sorted);
        mounted
    }

    fn layout_highlight(
        &self,
        doc: &mut Document,
        sorted: &mut SortedElementIndex,
        index: &TextIndex,
        highlight: &mut Highlight<A, D>,
    ) -> bool {
        let mut placements: Vec<(usize, Rect)> = Vec::new();
        for (range_index, range) in highlight.ranges.iter().enumerate() {
            if range.is_collapsed() {
                continue;
            }
            let rects = self.inner.layout.client_rects(doc, range);
            placements.extend(combine(&rects).into_iter().map(|r| (range_index, r)));
        }

        let mut mounted = false;
        for (i, (range_index, rect)) in placements.iter().enumerate() {
            let node = match highlight.slots.get_mut(i) {
                Some(slot) => {
                    mounted |= !slot.visible;
                    slot.visible = true;
                    slot.node
                }
                None => {
                    let node = self.create_overlay(doc, highlight);
                    highlight.slots.push(OverlaySlot {
                        node,
                        visible: true,
                    });
                    mounted = true;
                    node
                }
            };
            if let Some(style) = doc.overlay_mut(node) {
                style.rect = *rect;
                style.hidden = false;
            }
            let start = highlight.ranges[*range_index].start;
            sorted.insert(SortedEntry {
                node,
                highlight: highlight.id,
                rect: *rect,
                range_order: index.flat_offset(doc, start).unwrap_or(usize::MAX),
            });
        }

        for slot in highlight.slots.iter_mut().skip(placements.len()) {
            slot.visible = false;
            if let Some(style) = doc.overlay_mut(slot.node) {
                style.hidden = true;
            }
            sorted.remove(slot.node);
        }
        mounted
    }

    fn create_overlay(&self, doc: &mut Document, highlight: &Highlight<A, D>) -> NodeId {
        let node = doc.create_element("div");
        doc.set_attribute(node, MANAGER_ATTRIBUTE, &self.inner.id.to_string());
        doc.set_attribute(node, INDEX_ATTRIBUTE, &highlight.id.to_string());
        doc.add_class(node, &self.inner.highlight_class);
        for class in &highlight.class_names {
            doc.add_class(node, class);
        }
        doc.set_overlay(node, OverlayStyle::default());
        doc.append_child(self.inner.container, node);
        node
    }
}

fn teardown<A, D>(doc: &mut Document, sorted: &mut SortedElementIndex, highlight: &mut Highlight<A, D>) {
    for slot in highlight.slots.drain(..) {
        sorted.remove(slot.node);
        doc.remove(slot.node);
    }
}

fn apply_borders(doc: &mut Document, sorted: &SortedElementIndex) {
    for flags in sorted.border_flags() {
        if let Some(style) = doc.overlay_mut(flags.node) {
            style.border_left = flags.left;
            style.border_right = flags.right;
        }
    }
}

/// Topmost overlay of this collection under the pointer
///
/// Overlays ignore the pointer except for the duration of the query.
fn hit_test<A, D>(
    doc: &mut Document,
    state: &CollectionState<A, D>,
    x: f64,
    y: f64,
) -> Option<HighlightId> {
    let nodes: Vec<NodeId> = state.highlights.iter().flat_map(|h| h.all_nodes()).collect();
    set_pointer_events(doc, &nodes, true);
    let hit = doc.element_from_point(x, y);
    set_pointer_events(doc, &nodes, false);
    hit.and_then(|node| state.owner_of(node))
}

fn set_pointer_events(doc: &mut Document, nodes: &[NodeId], enabled: bool) {
    for node in nodes {
        if let Some(style) = doc.overlay_mut(*node) {
            style.pointer_events = enabled;
        }
    }
}
