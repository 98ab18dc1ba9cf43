//! Bridge between cooperatively scheduled logical threads and blocking native code.
//!
//! A logical thread managed by an external scheduler can run a blocking native
//! call without stalling the scheduler, ask an in-flight call to stop through an
//! unblock callback, and wait for descriptor readiness on top of that.
//!
//! # Architecture
//!
//! - **Bridge**: entry point tying the scheduler, readiness backend and retry settings together
//! - **Blocking region**: runs one blocking call off the caller's scheduler slot, unblockable at most once
//! - **Multiplexer**: `select(2)`-style wait over three descriptor sets, or a plain timed sleep
//! - **Retry loop**: waits until a single descriptor is readable or writable
//! - **Thread control**: aloneness check, yield, wakeup, current thread and thread-local slots
//! - **BridgeBuilder**: fluent construction and retry-loop tuning
//!
//! The scheduler itself is not part of this crate: implement [`Scheduler`] and
//! [`ManagedThread`] for the runtime that owns the logical threads.

mod builder;
mod error;
pub mod region;
pub mod runtime;
pub mod select;

pub use builder::BridgeBuilder;
pub use error::{BridgeError, ErrorKind, Result, SchedulerError};
pub use region::{BlockingCallRequest, NativeValue, Unblock, UnblockHandle, execute};
pub use runtime::thread;
pub use runtime::{Bridge, LogicalThread, ManagedThread, ManagedValue, Scheduler, Symbol};
pub use select::{Direction, FdSet, SelectOutcome, SelectRequest, Selector, SystemSelector};
