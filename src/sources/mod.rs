//! Report stream sources
//!
//! The transport that delivers reports is an outside collaborator. A source
//! only hands serialized payloads to the event loop, one at a time.

use std::time::Duration;

mod lines;

pub use lines::LineSource;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceEvent {
    /// One serialized report
    Payload(String),
    /// The stream ended, nothing more will arrive
    Closed,
}

/// Payload source
pub trait PayloadSource {
    /// Wait up to `wait` for the next event. `Ok(None)` when nothing arrived
    /// in time.
    fn poll(&mut self, wait: Duration) -> Result<Option<SourceEvent>, String>;
}
