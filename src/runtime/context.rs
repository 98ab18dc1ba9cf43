//! Thread-local bridge context.
//!
//! Native code reaching the bridge from deep inside a blocking library rarely
//! has a [`Bridge`] at hand. [`enter_context`] stores one in thread-local
//! storage for the duration of a closure so the free functions in
//! [`crate::runtime::thread`] can find it, the same way spawned tasks find
//! their queue without an explicit runtime reference.

use crate::error::{BridgeError, Result};
use crate::runtime::Bridge;

use std::cell::RefCell;

thread_local! {
    /// Bridge entered on this OS thread, if any.
    ///
    /// Set by [`enter_context`]; nested entries shadow the outer one.
    static CURRENT_BRIDGE: RefCell<Option<Bridge>> = const { RefCell::new(None) };
}

/// Restores the previous bridge even if the closure panics.
struct ContextGuard {
    previous: Option<Bridge>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_BRIDGE.with(|current| *current.borrow_mut() = previous);
    }
}

/// Runs `function` with `bridge` as the current bridge of this OS thread.
pub(crate) fn enter_context<F, R>(bridge: Bridge, function: F) -> R
where
    F: FnOnce() -> R,
{
    let previous = CURRENT_BRIDGE.with(|current| current.borrow_mut().replace(bridge));
    let _guard = ContextGuard { previous };

    function()
}

/// Returns a clone of the current bridge.
///
/// # Errors
/// [`BridgeError::NoContext`] outside of [`Bridge::enter`].
pub(crate) fn current_bridge() -> Result<Bridge> {
    CURRENT_BRIDGE.with(|current| current.borrow().clone().ok_or(BridgeError::NoContext))
}
