//! Observability subsystem
//!
//! Provides structured JSON logging and typed lifecycle events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on schema state
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use graph_schema::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::LabelCreated, &[("label", "person")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Default severity an event is logged at.
///
/// Mutations are TRACE, degraded input is WARN, everything else INFO.
pub fn default_severity(event: Event) -> Severity {
    if event.is_mutation() {
        Severity::Trace
    } else if event.is_degraded() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    match default_severity(event) {
        Severity::Trace => Logger::trace(event.as_str(), fields),
        Severity::Warn => Logger::warn(event.as_str(), fields),
        _ => Logger::info(event.as_str(), fields),
    }
}
