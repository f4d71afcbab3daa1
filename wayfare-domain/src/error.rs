use thiserror::Error;

/// Business-rule failures surfaced by the domain and engine layers. The API
/// crate maps each variant onto an HTTP status; nothing here carries store
/// internals.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Recipient-scoped notification lookups deliberately blur "someone
    /// else's" and "nonexistent" so existence never leaks.
    #[error("Notification not found or unauthorized.")]
    NotificationNotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("not enough available slots: requested {requested}, available {available}")]
    InsufficientCapacity { requested: i32, available: i32 },

    /// A release would push `available_slots` past `max_slots`. This means a
    /// caller double-released and the invariant is already suspect, so it is
    /// surfaced loudly instead of clamped.
    #[error("slot release of {slots} would exceed max capacity {max_slots}")]
    CapacityOverflow { slots: i32, max_slots: i32 },

    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn notification_not_found() -> Self {
        DomainError::NotificationNotFound
    }

    /// Wraps an infrastructure failure without leaking its type upward.
    pub fn storage<E: std::fmt::Display>(err: E) -> Self {
        DomainError::Storage(err.to_string())
    }
}
