use thiserror::Error;

/// Errors surfaced by the coordination core.
///
/// Every fallible operation in the crate returns one of these variants
/// rather than panicking. The taxonomy maps one-to-one onto the observable
/// failure modes of the system:
///
/// - [`CoordError::State`] - an invalid state ordinal or transition request;
///   no mutation has occurred and the caller can recover locally.
/// - [`CoordError::Comm`] - a channel send/receive timed out, the channel is
///   closed, or a channel was used before bootstrap bound it. The message in
///   flight is considered lost; callers log and proceed without retrying.
/// - [`CoordError::Sync`] - a bounded lock acquisition timed out. No
///   mutation has occurred; the failure is transient.
/// - [`CoordError::Supervision`] - task recreation failed during a restart.
///   The registry may be left partially restarted (see
///   [`TaskSupervisor::restart_all_tasks`](crate::coord::supervisor::TaskSupervisor::restart_all_tasks)).
/// - [`CoordError::Config`] - configuration validation rejected a value
///   before anything was wired up.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    #[error("invalid state input: {0}")]
    State(String),

    #[error("channel error: {0}")]
    Comm(String),

    #[error("lock wait timed out: {0}")]
    Sync(String),

    #[error("task supervision failed: {0}")]
    Supervision(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
