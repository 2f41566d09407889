//! Manager construction options

use super::view::BeforeFocusHook;
use crate::dom::NodeId;
use crate::logging::{ConsoleLogger, HighlightLogger};
use crate::scheduler::Scheduler;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

pub type EquivalenceFn<A, D> = Rc<dyn Fn(&A, &D, &A, &D) -> bool>;
pub type ClassNameFn<D> = Rc<dyn Fn(&D, usize) -> Vec<String>>;

pub const DEFAULT_HIGHLIGHT_CLASS: &str = "highlight";
pub const DEFAULT_HOVER_CLASS: &str = "highlight--hover";
pub const DEFAULT_FOCUS_CLASS: &str = "highlight--focus";

pub fn default_rotation() -> Vec<String> {
    (1..=5).map(|i| format!("highlight--color-{}", i)).collect()
}

/// How per-highlight class names are chosen
pub enum ClassNamePolicy<D> {
    /// Cycle through a palette by position in the collection
    Rotate(Vec<String>),
    /// Ask the host, given the data and the position
    Callback(ClassNameFn<D>),
}

impl<D> ClassNamePolicy<D> {
    pub fn callback(f: impl Fn(&D, usize) -> Vec<String> + 'static) -> Self {
        ClassNamePolicy::Callback(Rc::new(f))
    }

    pub fn class_names(&self, data: &D, index: usize) -> Vec<String> {
        match self {
            ClassNamePolicy::Rotate(palette) if palette.is_empty() => Vec::new(),
            ClassNamePolicy::Rotate(palette) => vec![palette[index % palette.len()].clone()],
            ClassNamePolicy::Callback(f) => f(data, index),
        }
    }
}

impl<D> Clone for ClassNamePolicy<D> {
    fn clone(&self) -> Self {
        match self {
            ClassNamePolicy::Rotate(p) => ClassNamePolicy::Rotate(p.clone()),
            ClassNamePolicy::Callback(f) => ClassNamePolicy::Callback(f.clone()),
        }
    }
}

impl<D> Default for ClassNamePolicy<D> {
    fn default() -> Self {
        ClassNamePolicy::Rotate(default_rotation())
    }
}

/// Highlights are the same when their anchors match or their data do
pub fn default_equivalence<A: PartialEq, D: PartialEq>(a1: &A, d1: &D, a2: &A, d2: &D) -> bool {
    a1 == a2 || d1 == d2
}

/// Class-name settings as they arrive from JS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightConfig {
    pub highlight_class: String,
    pub hover_class: String,
    pub focus_class: String,
    /// Palette for `ClassNamePolicy::Rotate`
    pub rotate_class_names: Vec<String>,
    pub listen_resize: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            highlight_class: DEFAULT_HIGHLIGHT_CLASS.to_string(),
            hover_class: DEFAULT_HOVER_CLASS.to_string(),
            focus_class: DEFAULT_FOCUS_CLASS.to_string(),
            rotate_class_names: default_rotation(),
            listen_resize: true,
        }
    }
}

pub struct HighlightManagerOptions<A, D> {
    pub container: NodeId,
    pub class_names: ClassNamePolicy<D>,
    pub highlight_class: String,
    pub hover_class: String,
    pub focus_class: String,
    pub are_equivalent: EquivalenceFn<A, D>,
    pub listen_resize: bool,
    pub logger: Rc<dyn HighlightLogger>,
    pub scheduler: Rc<dyn Scheduler>,
    pub before_focus: Option<BeforeFocusHook<A, D>>,
}

impl<A, D> HighlightManagerOptions<A, D>
where
    A: PartialEq + 'static,
    D: PartialEq + 'static,
{
    pub fn new(container: NodeId, scheduler: Rc<dyn Scheduler>) -> Self {
        Self::from_config(container, scheduler, &HighlightConfig::default())
    }

    pub fn from_config(
        container: NodeId,
        scheduler: Rc<dyn Scheduler>,
        config: &HighlightConfig,
    ) -> Self {
        Self {
            container,
            class_names: ClassNamePolicy::Rotate(config.rotate_class_names.clone()),
            highlight_class: config.highlight_class.clone(),
            hover_class: config.hover_class.clone(),
            focus_class: config.focus_class.clone(),
            are_equivalent: Rc::new(default_equivalence::<A, D>),
            listen_resize: config.listen_resize,
            logger: Rc::new(ConsoleLogger::default()),
            scheduler,
            before_focus: None,
        }
    }
}

impl<A, D> HighlightManagerOptions<A, D> {
    pub fn with_logger(mut self, logger: Rc<dyn HighlightLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_class_names(mut self, policy: ClassNamePolicy<D>) -> Self {
        self.class_names = policy;
        self
    }

    pub fn with_equivalence(mut self, f: impl Fn(&A, &D, &A, &D) -> bool + 'static) -> Self {
        self.are_equivalent = Rc::new(f);
        self
    }

    pub fn with_listen_resize(mut self, listen: bool) -> Self {
        self.listen_resize = listen;
        self
    }

    pub fn with_before_focus(mut self, hook: BeforeFocusHook<A, D>) -> Self {
        self.before_focus = Some(hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_cycles() {
        let policy: ClassNamePolicy<()> = ClassNamePolicy::Rotate(vec!["a".into(), "b".into()]);
        assert_eq!(policy.class_names(&(), 0), vec!["a"]);
        assert_eq!(policy.class_names(&(), 1), vec!["b"]);
        assert_eq!(policy.class_names(&(), 2), vec!["a"]);

        let empty: ClassNamePolicy<()> = ClassNamePolicy::Rotate(Vec::new());
        assert!(empty.class_names(&(), 3).is_empty());
    }

    #[test]
    fn test_callback_policy_sees_data() {
        let policy = ClassNamePolicy::callback(|d: &String, i| vec![format!("{}-{}", d, i)]);
        assert_eq!(policy.class_names(&"note".to_string(), 4), vec!["note-4"]);
    }

    #[test]
    fn test_default_equivalence_is_either() {
        assert!(default_equivalence(&1, &"x", &1, &"y"));
        assert!(default_equivalence(&1, &"x", &2, &"x"));
        assert!(!default_equivalence(&1, &"x", &2, &"y"));
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: HighlightConfig =
            serde_json::from_str(r#"{"hoverClass":"hot","listenResize":false}"#).unwrap();
        assert_eq!(config.hover_class, "hot");
        assert_eq!(config.highlight_class, DEFAULT_HIGHLIGHT_CLASS);
        assert!(!config.listen_resize);
        assert_eq!(config.rotate_class_names.len(), 5);
    }
}
