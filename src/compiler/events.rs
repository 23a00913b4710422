//! Event logging for compiler passes.
//!
//! Passes report what they changed - and, at higher verbosity, what they
//! proved - through an [`EventLog`]. Events can be inspected by tests and
//! tools or safely ignored.
//!
//! # Architecture
//!
//! - [`Event`] - a single recorded event
//! - [`EventLog`] - append-only collection with query and summary helpers
//! - [`EventBuilder`] - fluent API for creating events
//!
//! # Example
//!
//! ```rust
//! use branchprove::compiler::{EventKind, EventLog};
//!
//! let log = EventLog::new();
//! log.record(EventKind::BranchProved)
//!     .at(3)
//!     .message("Proved IsInBounds");
//!
//! assert_eq!(log.count_of(EventKind::BranchProved), 1);
//! ```

use std::{collections::HashMap, fmt};

/// Categories of events a pass can log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A conditional was proven to always take its positive edge.
    BranchProved,
    /// A conditional was proven to always take its negative edge.
    BranchDisproved,
    /// A conditional block was rewritten to an unconditional form.
    BranchSimplified,
    /// Informational message.
    Info,
    /// Warning (something unexpected but recoverable).
    Warning,
    /// Error (something failed).
    Error,
}

impl EventKind {
    /// Returns a human-readable description of this event kind.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::BranchProved => "branch proved",
            Self::BranchDisproved => "branch disproved",
            Self::BranchSimplified => "branch simplified",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Returns `true` if this event represents a code transformation.
    #[must_use]
    pub fn is_transformation(&self) -> bool {
        matches!(self, Self::BranchSimplified)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A single logged event.
#[derive(Debug, Clone)]
pub struct Event {
    /// The type of event.
    pub kind: EventKind,
    /// The block where the event occurred, if applicable.
    pub block: Option<usize>,
    /// Human-readable description.
    pub message: String,
}

impl Event {
    fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            block: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.block {
            Some(block) => write!(f, "[{}] b{block}: {}", self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Builder for creating events with a fluent API.
///
/// Created by [`EventLog::record`]. The event is added to the log when
/// the builder is dropped.
pub struct EventBuilder<'a> {
    log: &'a EventLog,
    kind: EventKind,
    block: Option<usize>,
    message: Option<String>,
}

impl<'a> EventBuilder<'a> {
    fn new(log: &'a EventLog, kind: EventKind) -> Self {
        Self {
            log,
            kind,
            block: None,
            message: None,
        }
    }

    /// Sets the block where the event occurred.
    #[must_use]
    pub fn at(mut self, block: usize) -> Self {
        self.block = Some(block);
        self
    }

    /// Sets a custom message describing the event.
    #[must_use]
    pub fn message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }
}

impl Drop for EventBuilder<'_> {
    fn drop(&mut self) {
        let message = self
            .message
            .take()
            .unwrap_or_else(|| self.kind.description().to_string());

        self.log.events.push(Event {
            kind: self.kind,
            block: self.block.take(),
            message,
        });
    }
}

/// Append-only collection of pass events.
///
/// Thread-safe: events can be appended concurrently through shared
/// references, so a context holding the log can be threaded through a
/// pipeline without locking.
#[derive(Debug, Default)]
pub struct EventLog {
    events: boxcar::Vec<Event>,
}

impl EventLog {
    /// Creates an empty event log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no events have been logged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.count() == 0
    }

    /// Returns the total number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.count()
    }

    /// Starts building a new event of the given kind.
    ///
    /// The event is added when the builder is dropped.
    pub fn record(&self, kind: EventKind) -> EventBuilder<'_> {
        EventBuilder::new(self, kind)
    }

    /// Records an informational message.
    pub fn info(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Info, message));
    }

    /// Records a warning message.
    pub fn warn(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Warning, message));
    }

    /// Records an error message.
    pub fn error(&self, message: impl Into<String>) {
        self.events.push(Event::new(EventKind::Error, message));
    }

    /// Returns an iterator over all events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().map(|(_, event)| event)
    }

    /// Counts events of a specific kind.
    #[must_use]
    pub fn count_of(&self, kind: EventKind) -> usize {
        self.iter().filter(|e| e.kind == kind).count()
    }

    /// Returns the messages of all events of a specific kind.
    #[must_use]
    pub fn messages_of(&self, kind: EventKind) -> Vec<String> {
        self.iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.message.clone())
            .collect()
    }

    /// Produces a per-kind summary of the log.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut counts: HashMap<EventKind, usize> = HashMap::new();
        for event in self.iter() {
            *counts.entry(event.kind).or_insert(0) += 1;
        }

        let mut lines: Vec<String> = counts
            .into_iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        lines.sort();
        lines.join("\n")
    }
}
