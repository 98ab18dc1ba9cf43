//! Blocking region executor.
//!
//! Packages a blocking closure into a [`BlockingCallRequest`], hands it to the
//! scheduler so the caller's slot is released for the duration of the call,
//! and restores the closure's result type on the way back.

use crate::error::{BridgeError, Result};
use crate::region::call::{BlockingCall, BlockingCallRequest, Unblock};
use crate::runtime::{Bridge, Scheduler};

use log::trace;
use std::any::type_name;

/// Runs `call` inside a blocking region of `scheduler`.
///
/// If the calling logical thread is interrupted while `call` is outstanding,
/// `unblock` runs at most once. Nothing confirms that `call` observed it: the
/// closure has to notice on its own and return early.
///
/// Scheduler failures propagate unchanged as [`BridgeError::Bridge`].
pub fn execute<F, R>(scheduler: &dyn Scheduler, call: F, unblock: Option<Unblock>) -> Result<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let interruptible = unblock.is_some();
    let request = BlockingCallRequest::new(BlockingCall::new(call), unblock);

    trace!(
        "entering blocking region (result: {}, interruptible: {})",
        type_name::<R>(),
        interruptible
    );

    let value = scheduler.run_blocking(request)?;

    trace!("left blocking region");

    value
        .downcast::<R>()
        .map(|value| *value)
        .map_err(|_| BridgeError::ResultType {
            expected: type_name::<R>(),
        })
}

impl Bridge {
    /// Runs `call` without holding the current logical thread's slot.
    ///
    /// See [`execute`] for the interruption contract.
    ///
    /// # Example
    /// ```ignore
    /// let stop = Arc::new(AtomicBool::new(false));
    /// let flag = stop.clone();
    /// let read = bridge.blocking_region(
    ///     move || poll_device_until(&flag),
    ///     Some(Unblock::new(move || stop.store(true, Ordering::SeqCst))),
    /// )?;
    /// ```
    pub fn blocking_region<F, R>(&self, call: F, unblock: Option<Unblock>) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        execute(self.scheduler(), call, unblock)
    }
}
