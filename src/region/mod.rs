//! Blocking region subsystem.
//!
//! - [`call`]: typed blocking callables, unblock callbacks and the request bundling them
//! - [`executor`]: runs a request through the scheduler and restores its result type

pub mod call;
pub mod executor;

pub use call::{BlockingCall, BlockingCallRequest, NativeValue, Unblock, UnblockHandle};
pub use executor::execute;
