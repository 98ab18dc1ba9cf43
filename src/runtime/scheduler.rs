//! Contracts the managed scheduler has to fulfil.
//!
//! The bridge never schedules anything itself. Every suspension, sleep and
//! thread lookup is delegated to the [`Scheduler`] it was built with, and every
//! per-thread operation goes through the scheduler-owned [`ManagedThread`].

use crate::error::SchedulerError;
use crate::region::{BlockingCallRequest, NativeValue};

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque managed value stored in thread-local slots.
pub type ManagedValue = Arc<dyn Any + Send + Sync>;

/// The cooperative scheduler that owns all logical threads.
///
/// Implementations decide how a logical thread gives up its slot while a
/// blocking call is in flight; the bridge only requires that other logical
/// threads can make progress during [`Scheduler::run_blocking`].
pub trait Scheduler: Send + Sync {
    /// Suspends the calling logical thread for `millis` milliseconds.
    ///
    /// The sleep must stay interruptible through the scheduler's own
    /// mechanisms. A zero duration is allowed and still counts as a sleep.
    fn sleep(&self, millis: u64) -> Result<(), SchedulerError>;

    /// Runs a blocking request without holding the caller's scheduler slot.
    ///
    /// When the caller is interrupted while the request is outstanding, the
    /// implementation signals [`BlockingCallRequest::unblocker`]. Returns the
    /// value produced by [`BlockingCallRequest::run`].
    fn run_blocking(&self, request: BlockingCallRequest) -> Result<NativeValue, SchedulerError>;

    /// Number of live logical threads in the registry.
    fn live_threads(&self) -> Result<usize, SchedulerError>;

    /// Gives up the current turn for one scheduling round.
    fn pass(&self) -> Result<(), SchedulerError>;

    /// The logical thread the caller is running on.
    fn current(&self) -> Result<LogicalThread, SchedulerError>;
}

/// A thread object owned by the scheduler.
pub trait ManagedThread: Send + Sync + fmt::Debug {
    /// Resumes the thread if it is suspended. Must be a no-op otherwise.
    fn wakeup(&self) -> Result<(), SchedulerError>;

    /// Reads a per-thread storage slot.
    fn local(&self, key: &Symbol) -> Result<Option<ManagedValue>, SchedulerError>;

    /// Writes a per-thread storage slot.
    fn set_local(&self, key: Symbol, value: ManagedValue) -> Result<(), SchedulerError>;
}

/// Shared reference to a scheduler-owned logical thread.
///
/// Holding a `LogicalThread` never keeps the thread alive in the scheduler's
/// registry; it only allows rescheduling and storage access.
#[derive(Clone)]
pub struct LogicalThread(Arc<dyn ManagedThread>);

impl LogicalThread {
    /// Wraps a scheduler-provided thread object.
    pub fn new(thread: Arc<dyn ManagedThread>) -> Self {
        Self(thread)
    }

    /// Resumes the thread. Waking a running thread has no effect.
    pub fn wakeup(&self) -> Result<(), SchedulerError> {
        self.0.wakeup()
    }

    /// Reads the slot stored under `key`.
    pub fn local_get(&self, key: impl Into<Symbol>) -> Result<Option<ManagedValue>, SchedulerError> {
        self.0.local(&key.into())
    }

    /// Stores `value` under `key`, returning the value back as the thread
    /// accessor does.
    pub fn local_set(
        &self,
        key: impl Into<Symbol>,
        value: ManagedValue,
    ) -> Result<ManagedValue, SchedulerError> {
        self.0.set_local(key.into(), value.clone())?;
        Ok(value)
    }

    /// Returns true when both handles point at the same thread object.
    pub fn ptr_eq(&self, other: &LogicalThread) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for LogicalThread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LogicalThread").field(&self.0).finish()
    }
}

/// Interned key for per-thread storage.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Arc<str>);

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self(Arc::from(name))
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&Symbol> for Symbol {
    fn from(symbol: &Symbol) -> Self {
        symbol.clone()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
