//! Error types

use thiserror::Error;

/// Caller-input validation failures raised by `register` and `show`.
///
/// All variants are synchronous and never retried internally; the call
/// site has to be fixed. Errors raised inside caller-supplied `on_show`
/// and `on_hide` callbacks are never caught here and propagate to the
/// caller's own error-handling context.
#[derive(Debug, Error)]
pub enum PopupError {
    /// The name already has a registration, which is retained unchanged.
    #[error("{0} already registered")]
    DuplicateName(String),

    /// `show` was called for a name with no registration.
    #[error("{0} not registered")]
    NotRegistered(String),

    /// Multi-lane managers require an explicit non-zero target lane.
    #[error("target lane is required in multi lane mode")]
    TargetLaneRequired,

    /// The target lane index is outside the configured lane count.
    #[error("target lane {0} not found")]
    TargetLaneNotFound(usize),
}
