// Shared fixtures for integration tests
#![allow(dead_code)]

use overlay_highlighter::anchor::DomAnchor;
use overlay_highlighter::dom::{Document, DocumentRef, NodeId};
use overlay_highlighter::highlight::{HighlightManagerOptions, MANAGER_ATTRIBUTE};
use overlay_highlighter::hosts::DomAnchorHighlightManager;
use overlay_highlighter::layout::FlowLayout;
use overlay_highlighter::logging::RecordingLogger;
use overlay_highlighter::scheduler::ManualScheduler;
use std::rc::Rc;

pub const SAMPLE: &str = "This is some sample text for anchoring";

#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: u32,
}

pub fn note(id: u32) -> Note {
    Note { id }
}

pub struct Fixture {
    pub doc: DocumentRef,
    pub container: NodeId,
    pub paragraphs: Vec<NodeId>,
    pub texts: Vec<NodeId>,
    pub layout: Rc<FlowLayout>,
    pub scheduler: ManualScheduler,
    pub logger: Rc<RecordingLogger>,
}

impl Fixture {
    /// A container `div` holding one `p` per paragraph
    pub fn new(paragraphs: &[&str]) -> Self {
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc.append_element(root, "div");
        let mut ps = Vec::new();
        let mut texts = Vec::new();
        for text in paragraphs {
            let p = doc.append_element(container, "p");
            texts.push(doc.append_text(p, text));
            ps.push(p);
        }
        Self {
            doc: doc.shared(),
            container,
            paragraphs: ps,
            texts,
            layout: Rc::new(FlowLayout::default()),
            scheduler: ManualScheduler::new(),
            logger: Rc::new(RecordingLogger::new()),
        }
    }

    pub fn options<D: PartialEq + 'static>(&self) -> HighlightManagerOptions<DomAnchor, D> {
        HighlightManagerOptions::new(self.container, Rc::new(self.scheduler.clone()))
            .with_logger(self.logger.clone())
    }

    pub fn manager<D: Clone + PartialEq + 'static>(&self) -> DomAnchorHighlightManager<D> {
        DomAnchorHighlightManager::new(self.doc.clone(), self.layout.clone(), self.options())
            .expect("container is attached")
    }

    /// Overlay elements attached anywhere under the container
    pub fn overlays(&self) -> Vec<NodeId> {
        let doc = self.doc.borrow();
        doc.descendants(self.container)
            .into_iter()
            .filter(|n| doc.attribute(*n, MANAGER_ATTRIBUTE).is_some())
            .collect()
    }

    /// Overlays currently shown
    pub fn visible_overlays(&self) -> Vec<NodeId> {
        let doc = self.doc.borrow();
        self.overlays()
            .into_iter()
            .filter(|n| doc.overlay(*n).map_or(false, |s| !s.hidden))
            .collect()
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.doc.borrow().has_class(node, class)
    }
}
