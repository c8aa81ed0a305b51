//! User-facing build output.
//!
//! The orchestrator reports progress through a [`Diagnostics`] sink handed to
//! it for one build, instead of writing to process-wide state. The CLI plugs
//! in its terminal output manager; tests plug in [`RecordingDiagnostics`].

use super::builder::BuildStep;
use std::cell::RefCell;

/// Receives progress and warnings from a build run.
pub trait Diagnostics {
    /// A pipeline step is starting.
    fn step(&self, step: BuildStep);

    /// Informational message.
    fn info(&self, message: &str);

    /// Non-fatal problem, e.g. a cleanup failure.
    fn warn(&self, message: &str);
}

/// Event captured by [`RecordingDiagnostics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Step(BuildStep),
    Info(String),
    Warn(String),
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    events: RefCell<Vec<Event>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events in arrival order.
    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    /// Steps that were started, in order.
    pub fn steps(&self) -> Vec<BuildStep> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Step(step) => Some(*step),
                _ => None,
            })
            .collect()
    }

    /// Warning messages, in order.
    pub fn warnings(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Warn(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn step(&self, step: BuildStep) {
        self.events.borrow_mut().push(Event::Step(step));
    }

    fn info(&self, message: &str) {
        self.events.borrow_mut().push(Event::Info(message.to_string()));
    }

    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(Event::Warn(message.to_string()));
    }
}
