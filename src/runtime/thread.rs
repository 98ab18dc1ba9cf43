//! Thread control facade.
//!
//! Thin operations on logical threads. Each one delegates to the scheduler
//! or to the thread object; nothing here blocks beyond what the scheduler's
//! own yield does.
//!
//! The free functions operate on the bridge entered with [`Bridge::enter`]
//! and fail with [`BridgeError::NoContext`](crate::BridgeError::NoContext)
//! elsewhere.

use crate::error::Result;
use crate::region::Unblock;
use crate::runtime::context::current_bridge;
use crate::runtime::{Bridge, LogicalThread, ManagedValue, Symbol};
use crate::select::Direction;

use std::os::unix::io::RawFd;

impl Bridge {
    /// True iff fewer than two logical threads are registered.
    pub fn alone(&self) -> Result<bool> {
        Ok(self.scheduler().live_threads()? < 2)
    }

    /// Cooperatively gives up the current turn.
    pub fn yield_now(&self) -> Result<()> {
        self.scheduler().pass()?;
        Ok(())
    }

    /// The logical thread the caller runs on.
    pub fn current(&self) -> Result<LogicalThread> {
        Ok(self.scheduler().current()?)
    }
}

/// See [`Bridge::alone`].
pub fn alone() -> Result<bool> {
    current_bridge()?.alone()
}

/// See [`Bridge::yield_now`].
pub fn yield_now() -> Result<()> {
    current_bridge()?.yield_now()
}

/// See [`Bridge::current`].
pub fn current() -> Result<LogicalThread> {
    current_bridge()?.current()
}

/// Resumes `thread` if it is suspended; a no-op for running threads.
pub fn wakeup(thread: &LogicalThread) -> Result<()> {
    thread.wakeup()?;
    Ok(())
}

/// Reads the slot `key` of `thread`.
pub fn local_get(thread: &LogicalThread, key: impl Into<Symbol>) -> Result<Option<ManagedValue>> {
    Ok(thread.local_get(key)?)
}

/// Writes the slot `key` of `thread` and returns the stored value.
pub fn local_set(
    thread: &LogicalThread,
    key: impl Into<Symbol>,
    value: ManagedValue,
) -> Result<ManagedValue> {
    Ok(thread.local_set(key, value)?)
}

/// See [`Bridge::blocking_region`].
pub fn blocking_region<F, R>(call: F, unblock: Option<Unblock>) -> Result<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    current_bridge()?.blocking_region(call, unblock)
}

/// See [`Bridge::wait_until_ready`].
pub fn wait_until_ready(fd: RawFd, direction: Direction) -> Result<()> {
    current_bridge()?.wait_until_ready(fd, direction)
}
