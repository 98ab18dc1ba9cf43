//! Typed blocking callables and their unblock signal.
//!
//! A [`BlockingCallRequest`] bundles the blocking closure with an optional
//! [`Unblock`] callback. The request lives for exactly one executor
//! invocation and is consumed by [`BlockingCallRequest::run`].

use log::debug;
use parking_lot::Mutex;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Result of a blocking call before it is downcast back to its real type.
pub type NativeValue = Box<dyn Any + Send>;

/// A blocking function together with everything it captured.
pub struct BlockingCall {
    function: Box<dyn FnOnce() -> NativeValue + Send>,
}

impl BlockingCall {
    /// Wraps `function`, boxing whatever it returns.
    pub fn new<F, R>(function: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        Self {
            function: Box::new(move || Box::new(function()) as NativeValue),
        }
    }

    pub(crate) fn call(self) -> NativeValue {
        (self.function)()
    }
}

impl fmt::Debug for BlockingCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlockingCall")
    }
}

/// Callback asking an in-flight blocking call to return early.
pub struct Unblock {
    function: Box<dyn FnOnce() + Send>,
}

impl Unblock {
    /// Wraps the callback that interrupts the blocking call.
    pub fn new<F>(function: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            function: Box::new(function),
        }
    }

    fn fire(self) {
        (self.function)()
    }
}

impl fmt::Debug for Unblock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Unblock")
    }
}

/// Shared trigger for an [`Unblock`] callback.
///
/// Any number of clones may call [`UnblockHandle::unblock`]; the callback runs
/// for the first one only. Once the blocking call has returned the handle is
/// disarmed and further signals are dropped.
#[derive(Clone)]
pub struct UnblockHandle {
    slot: Arc<Mutex<Option<Unblock>>>,
}

impl UnblockHandle {
    fn new(unblock: Unblock) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(unblock))),
        }
    }

    /// Delivers the unblock signal. Returns true if this call ran the callback.
    pub fn unblock(&self) -> bool {
        // Take first so the callback never runs under the lock.
        let pending = self.slot.lock().take();

        match pending {
            Some(unblock) => {
                debug!("delivering unblock to in-flight blocking call");
                unblock.fire();
                true
            }
            None => false,
        }
    }

    /// True once the callback has run or the call has completed.
    pub fn is_spent(&self) -> bool {
        self.slot.lock().is_none()
    }

    fn disarm(&self) {
        self.slot.lock().take();
    }
}

impl fmt::Debug for UnblockHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnblockHandle")
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// One blocking invocation handed to the scheduler.
#[derive(Debug)]
pub struct BlockingCallRequest {
    call: BlockingCall,
    unblock: Option<UnblockHandle>,
}

impl BlockingCallRequest {
    pub(crate) fn new(call: BlockingCall, unblock: Option<Unblock>) -> Self {
        Self {
            call,
            unblock: unblock.map(UnblockHandle::new),
        }
    }

    /// Handle the scheduler signals when the caller gets interrupted.
    pub fn unblocker(&self) -> Option<UnblockHandle> {
        self.unblock.clone()
    }

    /// Runs the blocking call on the current OS thread.
    pub fn run(self) -> NativeValue {
        let value = self.call.call();

        if let Some(handle) = &self.unblock {
            handle.disarm();
        }

        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_unblock(counter: &Arc<AtomicUsize>) -> Unblock {
        let counter = counter.clone();
        Unblock::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn unblock_fires_at_most_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let request =
            BlockingCallRequest::new(BlockingCall::new(|| 1u8), Some(counting_unblock(&fired)));
        let handle = request.unblocker().unwrap();
        let other = handle.clone();

        assert!(handle.unblock());
        assert!(!other.unblock());
        assert!(!handle.unblock());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(handle.is_spent());
    }

    #[test]
    fn completed_call_disarms_unblock() {
        let fired = Arc::new(AtomicUsize::new(0));
        let request =
            BlockingCallRequest::new(BlockingCall::new(|| 7u32), Some(counting_unblock(&fired)));
        let handle = request.unblocker().unwrap();

        let value = request.run();

        assert_eq!(value.downcast_ref::<u32>(), Some(&7));
        assert!(!handle.unblock());
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn request_without_unblock_has_no_handle() {
        let request = BlockingCallRequest::new(BlockingCall::new(|| ()), None);
        assert!(request.unblocker().is_none());
    }
}
