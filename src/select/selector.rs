//! Readiness backends.
//!
//! [`SystemSelector`] forwards a [`SelectRequest`] to `select(2)`. Other
//! implementations can stand in for it, e.g. to script outcomes in tests.

use crate::select::SelectRequest;
use crate::select::request::to_timeval;

use std::io;
use std::ptr;

/// What a readiness call reported, mirroring the raw `select(2)` result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The timeout elapsed with nothing ready.
    TimedOut,
    /// This many descriptors are ready.
    Ready(u32),
    /// The call failed with this OS error code.
    Failed(i32),
}

impl SelectOutcome {
    /// Builds an outcome from a raw return value and the errno read right after it.
    pub fn from_raw(ret: libc::c_int, errno: i32) -> Self {
        match ret {
            0 => SelectOutcome::TimedOut,
            n if n > 0 => SelectOutcome::Ready(n as u32),
            _ => SelectOutcome::Failed(errno),
        }
    }

    /// The value `select(2)` itself would have returned.
    pub fn raw(&self) -> libc::c_int {
        match self {
            SelectOutcome::TimedOut => 0,
            SelectOutcome::Ready(n) => libc::c_int::try_from(*n).unwrap_or(libc::c_int::MAX),
            SelectOutcome::Failed(_) => -1,
        }
    }

    pub fn errno(&self) -> Option<i32> {
        match self {
            SelectOutcome::Failed(errno) => Some(*errno),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, SelectOutcome::Ready(_))
    }
}

/// OS-level readiness multiplexing.
pub trait Selector: Send + Sync {
    /// Waits on the request's sets, updating them in place like `select(2)`.
    fn select(&self, request: &mut SelectRequest) -> SelectOutcome;
}

/// [`Selector`] backed by `libc::select`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSelector;

impl Selector for SystemSelector {
    fn select(&self, request: &mut SelectRequest) -> SelectOutcome {
        let nfds = request.nfds();
        let mut timeout = request.timeout().map(to_timeval);

        let read = request.read_mut().map_or(ptr::null_mut(), |set| set.as_raw_mut());
        let write = request.write_mut().map_or(ptr::null_mut(), |set| set.as_raw_mut());
        let except = request.except_mut().map_or(ptr::null_mut(), |set| set.as_raw_mut());
        let timeout = timeout
            .as_mut()
            .map_or(ptr::null_mut(), |tv| tv as *mut libc::timeval);

        let ret = unsafe { libc::select(nfds, read, write, except, timeout) };
        let errno = if ret < 0 {
            io::Error::last_os_error().raw_os_error().unwrap_or(0)
        } else {
            0
        };

        SelectOutcome::from_raw(ret, errno)
    }
}
