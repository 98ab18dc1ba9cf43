//! Runtime-facing subsystem modules.

pub(crate) mod context;
mod core;
pub mod scheduler;
pub mod thread;

pub use self::core::Bridge;
pub use scheduler::{LogicalThread, ManagedThread, ManagedValue, Scheduler, Symbol};
