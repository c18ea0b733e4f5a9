//! Error types for the event layer.

/// Errors that can occur when working with auth events.
///
/// Dispatching itself never fails; this only covers turning external input
/// (a storage-change notification, a message from another window) into an
/// [`EventType`](crate::EventType).
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    /// The name isn't one of the six recognised event kinds.
    #[error("unknown auth event type {0:?}")]
    UnknownEventType(String),
}
