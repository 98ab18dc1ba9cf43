//! Descriptor readiness on top of the blocking region.
//!
//! - [`fd_set`]: owned `fd_set` wrapper
//! - [`request`]: the packaged parameters of one readiness call
//! - [`selector`]: the OS readiness backend and its outcome type
//! - [`multiplexer`]: [`Bridge::select`](crate::Bridge::select) and the timeout-only sleep path
//! - [`ready`]: [`Bridge::wait_until_ready`](crate::Bridge::wait_until_ready), the single-descriptor retry loop

pub mod fd_set;
pub mod multiplexer;
pub mod ready;
pub mod request;
pub mod selector;

pub use fd_set::{FD_LIMIT, FdSet};
pub use ready::Direction;
pub use request::SelectRequest;
pub use selector::{SelectOutcome, Selector, SystemSelector};
