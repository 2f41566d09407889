//! Per-highlight event subscriptions
//!
//! Handlers live in a table keyed by highlight id and event. Adding the
//! same `Rc` twice is a no-op and removing an absent handler is harmless.

use super::state::HighlightId;
use super::view::HighlightView;
use crate::error::{HighlightError, Result};
use crate::scheduler::Scheduler;
use futures::channel::oneshot;
use futures::future::{self, Either};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighlightEvent {
    /// New overlay elements were mounted for the highlight
    #[serde(rename = "newelements")]
    NewElements,
}

impl HighlightEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightEvent::NewElements => "newelements",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "newelements" => Some(HighlightEvent::NewElements),
            _ => None,
        }
    }
}

impl fmt::Display for HighlightEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub type EventHandler = Rc<dyn Fn(HighlightId)>;

fn same_handler(a: &EventHandler, b: &EventHandler) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const u8, Rc::as_ptr(b) as *const u8)
}

#[derive(Default)]
pub(crate) struct EventTable {
    handlers: HashMap<(HighlightId, HighlightEvent), Vec<EventHandler>>,
}

impl EventTable {
    /// Returns false when the handler was already subscribed
    pub fn on(&mut self, id: HighlightId, event: HighlightEvent, handler: EventHandler) -> bool {
        let list = self.handlers.entry((id, event)).or_default();
        if list.iter().any(|h| same_handler(h, &handler)) {
            return false;
        }
        list.push(handler);
        true
    }

    /// Returns false when the handler was not subscribed
    pub fn off(&mut self, id: HighlightId, event: HighlightEvent, handler: &EventHandler) -> bool {
        let Some(list) = self.handlers.get_mut(&(id, event)) else {
            return false;
        };
        let before = list.len();
        list.retain(|h| !same_handler(h, handler));
        let removed = list.len() != before;
        if list.is_empty() {
            self.handlers.remove(&(id, event));
        }
        removed
    }

    pub fn clear(&mut self, id: HighlightId) {
        self.handlers.retain(|(hid, _), _| *hid != id);
    }

    /// Snapshot, so handlers can run without the table borrowed
    pub fn handlers(&self, id: HighlightId, event: HighlightEvent) -> Vec<EventHandler> {
        self.handlers.get(&(id, event)).cloned().unwrap_or_default()
    }
}

/// Subscribe to `event`, run `trigger`, then wait for the event or the
/// timeout, whichever comes first
///
/// Subscribing before triggering means an event fired synchronously by
/// the trigger is not missed.
pub async fn wait_for_event<A, D>(
    view: &HighlightView<A, D>,
    event: HighlightEvent,
    trigger: impl FnOnce(),
    scheduler: &dyn Scheduler,
    timeout_ms: u32,
) -> Result<()> {
    let (sender, receiver) = oneshot::channel::<()>();
    let sender = RefCell::new(Some(sender));
    let handler: EventHandler = Rc::new(move |_| {
        if let Some(sender) = sender.borrow_mut().take() {
            let _ = sender.send(());
        }
    });

    view.on(event, handler.clone());
    trigger();
    let outcome = future::select(receiver, scheduler.sleep(timeout_ms)).await;
    view.off(event, &handler);

    match outcome {
        Either::Left((Ok(()), _)) => Ok(()),
        Either::Left((Err(_), _)) => Err(HighlightError::Hook(format!(
            "event source for highlight {} went away",
            view.id()
        ))),
        Either::Right(_) => Err(HighlightError::Timeout {
            highlight: view.id(),
            event,
            timeout_ms,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_on_is_idempotent_and_off_is_safe() {
        let mut table = EventTable::default();
        let id = HighlightId(1);
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let handler: EventHandler = Rc::new(move |_| counter.set(counter.get() + 1));

        assert!(table.on(id, HighlightEvent::NewElements, handler.clone()));
        assert!(!table.on(id, HighlightEvent::NewElements, handler.clone()));
        assert_eq!(table.handlers(id, HighlightEvent::NewElements).len(), 1);

        for h in table.handlers(id, HighlightEvent::NewElements) {
            h(id);
        }
        assert_eq!(calls.get(), 1);

        assert!(table.off(id, HighlightEvent::NewElements, &handler));
        assert!(!table.off(id, HighlightEvent::NewElements, &handler));
        assert!(table.handlers(id, HighlightEvent::NewElements).is_empty());
    }

    #[test]
    fn test_distinct_handlers_coexist() {
        let mut table = EventTable::default();
        let id = HighlightId(7);
        let a: EventHandler = Rc::new(|_| {});
        let b: EventHandler = Rc::new(|_| {});
        table.on(id, HighlightEvent::NewElements, a);
        table.on(id, HighlightEvent::NewElements, b);
        assert_eq!(table.handlers(id, HighlightEvent::NewElements).len(), 2);

        table.clear(id);
        assert_eq!(table.handlers(id, HighlightEvent::NewElements).len(), 0);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(HighlightEvent::parse("newelements"), Some(HighlightEvent::NewElements));
        assert_eq!(HighlightEvent::parse("other"), None);
        assert_eq!(HighlightEvent::NewElements.to_string(), "newelements");
    }
}
