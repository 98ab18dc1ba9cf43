//! Error types surfaced by the bridge.
//!
//! Callers of the retry loop see typed [`BridgeError`]s. Callers of the raw
//! multiplexer only ever see [`BridgeError::Bridge`]; OS failures reach them as
//! a [`SelectOutcome::Failed`](crate::SelectOutcome::Failed) value instead.

use std::error::Error;
use std::io;
use std::os::unix::io::RawFd;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Broad category of a [`BridgeError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller handed over a descriptor that cannot be waited on.
    Io,
    /// The readiness call itself failed with an OS error code.
    SystemCall,
    /// The managed scheduler failed, or no scheduler was reachable.
    Bridge,
}

/// Errors raised by the bridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// A negative descriptor was passed to the retry loop.
    #[error("closed stream")]
    InvalidDescriptor,

    /// The descriptor does not fit into an `fd_set`.
    #[error("descriptor {fd} exceeds the select(2) limit of {limit}")]
    DescriptorOutOfRange {
        /// Offending descriptor
        fd: RawFd,
        /// Exclusive upper bound accepted by `select(2)`
        limit: usize,
    },

    /// `select(2)` reported a failure inside the retry loop.
    #[error("select(2) failed: {}", os_error(.errno))]
    SystemCall {
        /// OS error code captured right after the call
        errno: i32,
    },

    /// The call into the managed scheduler failed.
    #[error("scheduler call failed: {0}")]
    Bridge(#[from] SchedulerError),

    /// The scheduler handed back a value of the wrong type.
    #[error("blocking call returned a value that is not a `{expected}`")]
    ResultType {
        /// Type the caller asked for
        expected: &'static str,
    },

    /// A context-bound helper ran outside [`Bridge::enter`](crate::Bridge::enter).
    #[error("no bridge entered on this thread")]
    NoContext,
}

impl BridgeError {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BridgeError::InvalidDescriptor | BridgeError::DescriptorOutOfRange { .. } => {
                ErrorKind::Io
            }
            BridgeError::SystemCall { .. } => ErrorKind::SystemCall,
            BridgeError::Bridge(_) | BridgeError::ResultType { .. } | BridgeError::NoContext => {
                ErrorKind::Bridge
            }
        }
    }

    /// Returns the OS error code for system call failures.
    pub fn errno(&self) -> Option<i32> {
        match self {
            BridgeError::SystemCall { errno } => Some(*errno),
            _ => None,
        }
    }
}

fn os_error(errno: &i32) -> io::Error {
    io::Error::from_raw_os_error(*errno)
}

impl From<BridgeError> for io::Error {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::SystemCall { errno } => io::Error::from_raw_os_error(errno),
            BridgeError::InvalidDescriptor | BridgeError::DescriptorOutOfRange { .. } => {
                io::Error::new(io::ErrorKind::InvalidInput, err)
            }
            other => io::Error::other(other),
        }
    }
}

/// Failure reported by a [`Scheduler`](crate::Scheduler) implementation.
///
/// Scheduler errors are never handled locally: they surface to the caller of
/// whichever bridge operation reached the scheduler.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct SchedulerError {
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl SchedulerError {
    /// Creates an error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error wrapping the underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// The message given by the scheduler.
    pub fn message(&self) -> &str {
        &self.message
    }
}
