use thiserror::Error;

use hci_ring::RingError;

/// Errors surfaced by the link layer.
///
/// Timeouts and empty rings are deliberately absent: both are ordinary
/// outcomes reported through [`crate::Recv`], not failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// Operation attempted before `init()`.
    #[error("link has not been initialized")]
    NotInitialized,

    /// Operation attempted after `deinit()`; the instance is spent.
    #[error("link has been deinitialized")]
    Deinitialized,

    /// `init()` called on a link that is already running.
    #[error("link is already running")]
    AlreadyRunning,

    /// The controller is not ready to accept an outbound packet.
    #[error("controller not ready to send")]
    NotReady,

    /// The controller rejected an attach/send operation.
    #[error("controller error: {0}")]
    Controller(&'static str),

    /// Ring construction failed during `init()`.
    #[error("ring error: {0}")]
    Ring(#[from] RingError),
}
