//! The packaged parameters of one `select(2)` call.

use crate::select::FdSet;

use log::trace;
use std::time::Duration;

/// Everything one multiplexer call needs, owned by that call.
///
/// The request is moved into the blocking region and dropped as soon as the
/// call returns, whether it succeeded or failed.
#[derive(Debug)]
pub struct SelectRequest {
    nfds: libc::c_int,
    pub(crate) read: Option<FdSet>,
    pub(crate) write: Option<FdSet>,
    pub(crate) except: Option<FdSet>,
    timeout: Option<Duration>,
}

impl SelectRequest {
    /// Packages the arguments of one readiness call.
    pub fn new(
        nfds: libc::c_int,
        read: Option<FdSet>,
        write: Option<FdSet>,
        except: Option<FdSet>,
        timeout: Option<Duration>,
    ) -> Self {
        trace!("packaging select request (nfds: {nfds}, timeout: {timeout:?})");

        Self {
            nfds,
            read,
            write,
            except,
            timeout,
        }
    }

    /// One more than the highest descriptor of interest.
    pub fn nfds(&self) -> libc::c_int {
        self.nfds
    }

    /// Descriptors checked for reading, if any.
    pub fn read(&self) -> Option<&FdSet> {
        self.read.as_ref()
    }

    /// Descriptors checked for writing, if any.
    pub fn write(&self) -> Option<&FdSet> {
        self.write.as_ref()
    }

    /// Descriptors checked for exceptional conditions, if any.
    pub fn except(&self) -> Option<&FdSet> {
        self.except.as_ref()
    }

    /// Read set, for the selector to update in place.
    pub fn read_mut(&mut self) -> Option<&mut FdSet> {
        self.read.as_mut()
    }

    /// Write set, for the selector to update in place.
    pub fn write_mut(&mut self) -> Option<&mut FdSet> {
        self.write.as_mut()
    }

    /// Exception set, for the selector to update in place.
    pub fn except_mut(&mut self) -> Option<&mut FdSet> {
        self.except.as_mut()
    }

    /// Upper bound on the wait; `None` blocks indefinitely.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl Drop for SelectRequest {
    fn drop(&mut self) {
        trace!("releasing select request (nfds: {})", self.nfds);
    }
}

/// Whole milliseconds in `timeout`; a missing timeout is a zero-length wait.
pub(crate) fn whole_millis(timeout: Option<Duration>) -> u64 {
    timeout.map_or(0, |timeout| {
        u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
    })
}

pub(crate) fn to_timeval(timeout: Duration) -> libc::timeval {
    libc::timeval {
        tv_sec: libc::time_t::try_from(timeout.as_secs()).unwrap_or(libc::time_t::MAX),
        tv_usec: timeout.subsec_micros() as libc::suseconds_t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_timeout_is_zero_millis() {
        assert_eq!(whole_millis(None), 0);
    }

    #[test]
    fn millis_truncate_sub_millisecond_parts() {
        assert_eq!(whole_millis(Some(Duration::from_micros(1_500_999))), 1_500);
        assert_eq!(whole_millis(Some(Duration::from_millis(1_500))), 1_500);
    }

    #[test]
    fn timeval_splits_seconds_and_micros() {
        let tv = to_timeval(Duration::from_micros(2_250_001));

        assert_eq!(tv.tv_sec, 2);
        assert_eq!(tv.tv_usec, 250_001);
    }

    #[test]
    fn absent_sets_stay_absent() {
        let mut request = SelectRequest::new(
            4,
            Some(FdSet::with(3)),
            None,
            None,
            Some(Duration::from_millis(20)),
        );

        assert_eq!(request.nfds(), 4);
        assert!(request.read().is_some_and(|set| set.contains(3)));
        assert!(request.write().is_none());
        assert!(request.except_mut().is_none());
        assert_eq!(request.timeout(), Some(Duration::from_millis(20)));
    }
}
