//! In-memory document tree
//!
//! An arena of element and text nodes with just enough of the DOM to host
//! highlights: tree mutation with observer records, attributes and class
//! lists, absolutely-positioned overlay boxes, hit testing and a scrollable
//! viewport. Node ids are never reused; detached subtrees keep their ids
//! and contents so stale ranges can still be inspected.

use super::range::Selection;
use crate::geometry::Rect;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Shared handle to a document; the host and every manager hold one
pub type DocumentRef = Rc<RefCell<Document>>;

/// Tags laid out inline when no explicit display is given
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "code", "em", "i", "kbd", "label", "mark", "q", "s", "small", "span",
    "strong", "sub", "sup", "u",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Display {
    #[default]
    Block,
    Inline,
    None,
}

impl Display {
    pub fn for_tag(tag: &str) -> Self {
        if INLINE_TAGS.contains(&tag.to_ascii_lowercase().as_str()) {
            Display::Inline
        } else {
            Display::Block
        }
    }
}

/// Style of an absolutely-positioned overlay element
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Border box in document coordinates
    pub rect: Rect,
    pub hidden: bool,
    /// Overlays are normally transparent to the pointer
    pub pointer_events: bool,
    pub border_left: bool,
    pub border_right: bool,
    pub z_index: i32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            rect: Rect::default(),
            hidden: false,
            pointer_events: false,
            border_left: true,
            border_right: true,
            z_index: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: Vec<String>,
    pub display: Display,
    /// Present only for out-of-flow overlay boxes
    pub overlay: Option<OverlayStyle>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    CharacterData,
}

/// One observed change, delivered to every observer whose target
/// contains the mutated node
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub kind: MutationKind,
    pub target: NodeId,
    pub added: Vec<NodeId>,
    pub removed: Vec<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

#[derive(Debug)]
struct Observer {
    id: ObserverId,
    target: NodeId,
    pending: Vec<MutationRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Auto,
    Smooth,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBlock {
    Start,
    Center,
    Nearest,
}

/// Last scroll performed through `scroll_into_view`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub target: Rect,
    pub behavior: ScrollBehavior,
    pub block: ScrollBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_x: 0.0,
            scroll_y: 0.0,
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Declarative content tree, used to load documents from JS and in tests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentNode {
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub display: Option<Display>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub children: Vec<ContentNode>,
}

impl ContentNode {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn element(tag: &str, children: Vec<ContentNode>) -> Self {
        Self {
            tag: Some(tag.to_string()),
            children,
            ..Self::default()
        }
    }
}

#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    observers: Vec<Observer>,
    next_observer: usize,
    viewport: Viewport,
    last_scroll: Option<ScrollRequest>,
    selection: Option<Selection>,
}

impl Document {
    /// Create an empty document with a `body` root
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            observers: Vec::new(),
            next_observer: 0,
            viewport: Viewport::default(),
            last_scroll: None,
            selection: None,
        };
        doc.root = doc.create_element("body");
        doc
    }

    /// Wrap into the shared handle managers expect
    pub fn shared(self) -> DocumentRef {
        Rc::new(RefCell::new(self))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // ------------------------------------------------------------------
    // Node creation
    // ------------------------------------------------------------------

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_node(NodeKind::Element(ElementData {
            tag: tag.to_string(),
            attributes: BTreeMap::new(),
            classes: Vec::new(),
            display: Display::for_tag(tag),
            overlay: None,
        }))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push_node(NodeKind::Text(text.to_string()))
    }

    fn push_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let node = self.create_element(tag);
        self.append_child(parent, node);
        node
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Build `content` and append it under `parent`
    pub fn append_content(&mut self, parent: NodeId, content: &ContentNode) -> NodeId {
        let node = self.build_content(content);
        self.append_child(parent, node);
        node
    }

    fn build_content(&mut self, content: &ContentNode) -> NodeId {
        if let (None, Some(text)) = (&content.tag, &content.text) {
            return self.create_text(text);
        }
        let tag = content.tag.as_deref().unwrap_or("div");
        let node = self.create_element(tag);
        if let Some(element) = self.element_mut(node) {
            if let Some(display) = content.display {
                element.display = display;
            }
            for (name, value) in &content.attributes {
                if name == "class" {
                    element.classes = value.split_whitespace().map(str::to_string).collect();
                } else {
                    element.attributes.insert(name.clone(), value.clone());
                }
            }
        }
        if let Some(text) = &content.text {
            let text_node = self.create_text(text);
            self.attach(node, text_node, None);
        }
        for child in &content.children {
            let child_node = self.build_content(child);
            self.attach(node, child_node, None);
        }
        node
    }

    // ------------------------------------------------------------------
    // Tree mutation
    // ------------------------------------------------------------------

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` under `parent` before `reference` (or last)
    ///
    /// A child that already has a parent is moved, producing a removal
    /// record followed by an addition record.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        if self.contains(child, parent) {
            log::warn!("Refusing to insert {:?} into its own subtree", child);
            return;
        }
        if self.nodes[child.0].parent.is_some() {
            self.remove(child);
        }
        self.attach(parent, child, reference);
        self.record(MutationRecord {
            kind: MutationKind::ChildList,
            target: parent,
            added: vec![child],
            removed: Vec::new(),
        });
    }

    /// Link without recording; used while building detached content
    fn attach(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        let siblings = &mut self.nodes[parent.0].children;
        let index = reference
            .and_then(|r| siblings.iter().position(|c| *c == r))
            .unwrap_or(siblings.len());
        siblings.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach `node` (and its subtree) from its parent
    pub fn remove(&mut self, node: NodeId) {
        let Some(parent) = self.nodes[node.0].parent.take() else {
            return;
        };
        self.nodes[parent.0].children.retain(|c| *c != node);
        self.record(MutationRecord {
            kind: MutationKind::ChildList,
            target: parent,
            added: Vec::new(),
            removed: vec![node],
        });
    }

    /// Replace the data of a text node
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        if let NodeKind::Text(data) = &mut self.nodes[node.0].kind {
            *data = text.to_string();
            self.record(MutationRecord {
                kind: MutationKind::CharacterData,
                target: node,
                added: Vec::new(),
                removed: Vec::new(),
            });
        }
    }

    // ------------------------------------------------------------------
    // Mutation observers
    // ------------------------------------------------------------------

    /// Start observing child-list and character-data changes in the
    /// subtree rooted at `target`
    pub fn observe(&mut self, target: NodeId) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push(Observer {
            id,
            target,
            pending: Vec::new(),
        });
        id
    }

    pub fn disconnect(&mut self, observer: ObserverId) {
        self.observers.retain(|o| o.id != observer);
    }

    /// Drain the records queued for `observer`
    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord> {
        self.observers
            .iter_mut()
            .find(|o| o.id == observer)
            .map(|o| std::mem::take(&mut o.pending))
            .unwrap_or_default()
    }

    fn record(&mut self, record: MutationRecord) {
        let interested: Vec<usize> = self
            .observers
            .iter()
            .enumerate()
            .filter(|(_, o)| self.contains(o.target, record.target))
            .map(|(i, _)| i)
            .collect();
        for i in interested {
            self.observers[i].pending.push(record.clone());
        }
    }

    // ------------------------------------------------------------------
    // Tree queries
    // ------------------------------------------------------------------

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.get(node.0)?.parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes
            .get(node.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).first().copied()
    }

    pub fn last_child(&self, node: NodeId) -> Option<NodeId> {
        self.children(node).last().copied()
    }

    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(node)?);
        let index = siblings.iter().position(|c| *c == node)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(node)?);
        let index = siblings.iter().position(|c| *c == node)?;
        siblings.get(index + 1).copied()
    }

    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let siblings = self.children(self.parent(node)?);
        siblings.iter().position(|c| *c == node)
    }

    pub fn exists(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    pub fn kind(&self, node: NodeId) -> Option<&NodeKind> {
        self.nodes.get(node.0).map(|n| &n.kind)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        match self.kind(node)? {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut ElementData> {
        match &mut self.nodes.get_mut(node.0)?.kind {
            NodeKind::Element(element) => Some(element),
            NodeKind::Text(_) => None,
        }
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.kind(node)? {
            NodeKind::Text(text) => Some(text.as_str()),
            NodeKind::Element(_) => None,
        }
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        self.text(node).is_some()
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    /// Offset range of a node: characters for text, children for elements
    pub fn node_length(&self, node: NodeId) -> usize {
        match self.kind(node) {
            Some(NodeKind::Text(text)) => text.chars().count(),
            Some(NodeKind::Element(_)) => self.children(node).len(),
            None => 0,
        }
    }

    /// Inclusive containment: a node contains itself
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == ancestor {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    pub fn is_connected(&self, node: NodeId) -> bool {
        self.exists(node) && self.contains(self.root, node)
    }

    /// Ancestors from parent up to the tree root
    pub fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = self.parent(node);
        while let Some(n) = current {
            result.push(n);
            current = self.parent(n);
        }
        result
    }

    /// `node` and its descendants in document (pre-)order
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            result.push(n);
            stack.extend(self.children(n).iter().rev());
        }
        result
    }

    /// Concatenated data of all descendant text nodes
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|n| self.text(n))
            .collect()
    }

    // ------------------------------------------------------------------
    // Attributes and classes
    // ------------------------------------------------------------------

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(element) = self.element_mut(node) {
            element.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attributes.get(name).map(String::as_str)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            if !element.classes.iter().any(|c| c == class) {
                element.classes.push(class.to_string());
            }
        }
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.element_mut(node) {
            element.classes.retain(|c| c != class);
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.element(node)
            .map(|e| e.classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn classes(&self, node: NodeId) -> &[String] {
        self.element(node)
            .map(|e| e.classes.as_slice())
            .unwrap_or(&[])
    }

    // ------------------------------------------------------------------
    // Overlays, hit testing and scrolling
    // ------------------------------------------------------------------

    pub fn overlay(&self, node: NodeId) -> Option<&OverlayStyle> {
        self.element(node)?.overlay.as_ref()
    }

    pub fn overlay_mut(&mut self, node: NodeId) -> Option<&mut OverlayStyle> {
        self.element_mut(node)?.overlay.as_mut()
    }

    pub fn set_overlay(&mut self, node: NodeId, style: OverlayStyle) {
        if let Some(element) = self.element_mut(node) {
            element.overlay = Some(style);
        }
    }

    pub fn is_overlay(&self, node: NodeId) -> bool {
        self.overlay(node).is_some()
    }

    /// Topmost hit-testable overlay under a viewport point
    ///
    /// Higher z-index wins, then later tree order. Hidden overlays and
    /// overlays with pointer events disabled are skipped.
    pub fn element_from_point(&self, x: f64, y: f64) -> Option<NodeId> {
        let doc_x = x + self.viewport.scroll_x;
        let doc_y = y + self.viewport.scroll_y;
        self.descendants(self.root)
            .into_iter()
            .enumerate()
            .filter_map(|(order, node)| {
                let style = self.overlay(node)?;
                (!style.hidden && style.pointer_events && style.rect.contains_point(doc_x, doc_y))
                    .then_some((style.z_index, order, node))
            })
            .max_by_key(|(z, order, _)| (*z, *order))
            .map(|(_, _, node)| node)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Scroll the viewport vertically so that `target` is visible
    pub fn scroll_into_view(&mut self, target: Rect, behavior: ScrollBehavior, block: ScrollBlock) {
        let vp = &mut self.viewport;
        let desired = match block {
            ScrollBlock::Start => target.top,
            ScrollBlock::Center => target.center_y() - vp.height / 2.0,
            ScrollBlock::Nearest => {
                if target.top < vp.scroll_y {
                    target.top
                } else if target.bottom() > vp.scroll_y + vp.height {
                    target.bottom() - vp.height
                } else {
                    vp.scroll_y
                }
            }
        };
        vp.scroll_y = desired.max(0.0);
        self.last_scroll = Some(ScrollRequest {
            target,
            behavior,
            block,
        });
    }

    pub fn last_scroll(&self) -> Option<ScrollRequest> {
        self.last_scroll
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
