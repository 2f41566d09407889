//! Injectable logging
//!
//! Managers log through a `HighlightLogger` handed to them at
//! construction. The default forwards to the `log` facade, which WASM
//! builds wire to the browser console.

use log::Level;
use std::cell::RefCell;

pub trait HighlightLogger {
    fn error(&self, message: &str);
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn debug(&self, message: &str) {
        let _ = message;
    }
}

/// Forwards to the `log` crate
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    target: String,
}

impl ConsoleLogger {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        Self::new(module_path!().split("::").next().unwrap_or("overlay_highlighter"))
    }
}

impl HighlightLogger for ConsoleLogger {
    fn error(&self, message: &str) {
        log::error!(target: &self.target, "{}", message);
    }

    fn warn(&self, message: &str) {
        log::warn!(target: &self.target, "{}", message);
    }

    fn info(&self, message: &str) {
        log::info!(target: &self.target, "{}", message);
    }

    fn debug(&self, message: &str) {
        log::debug!(target: &self.target, "{}", message);
    }
}

/// Keeps every message in memory; handy for hosts that surface
/// diagnostics themselves and for tests
#[derive(Debug, Default)]
pub struct RecordingLogger {
    entries: RefCell<Vec<(Level, String)>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.borrow().clone()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn push(&self, level: Level, message: &str) {
        self.entries.borrow_mut().push((level, message.to_string()));
    }
}

impl HighlightLogger for RecordingLogger {
    fn error(&self, message: &str) {
        self.push(Level::Error, message);
    }

    fn warn(&self, message: &str) {
        self.push(Level::Warn, message);
    }

    fn info(&self, message: &str) {
        self.push(Level::Info, message);
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }
}
