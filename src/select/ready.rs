//! Waiting for a single descriptor to become ready.
//!
//! The loop repeats the multiplexer for one descriptor until it is reported
//! ready. Unlike direct [`Bridge::select`] callers, the loop treats a failed
//! readiness call as fatal and raises it as [`BridgeError::SystemCall`].

use crate::error::{BridgeError, Result, SchedulerError};
use crate::runtime::{Bridge, Scheduler};
use crate::select::fd_set::{FD_LIMIT, in_range};
use crate::select::request::whole_millis;
use crate::select::{FdSet, SelectOutcome};

use log::{debug, trace};
use std::os::unix::io::RawFd;
use std::time::Duration;

/// Which readiness the retry loop waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Data can be read without blocking.
    Readable,
    /// Data can be written without blocking.
    Writable,
}

impl From<bool> for Direction {
    /// `true` waits for readable, `false` for writable.
    fn from(read: bool) -> Self {
        if read {
            Direction::Readable
        } else {
            Direction::Writable
        }
    }
}

impl Bridge {
    /// Blocks the caller until `fd` is ready in `direction`.
    ///
    /// Fails with [`BridgeError::InvalidDescriptor`] for negative descriptors
    /// before anything else happens.
    ///
    /// With fewer than two live logical threads this returns immediately, even
    /// for descriptors that do not fit into an `fd_set`. The shortcut assumes
    /// nothing else in the process can change the descriptor's readiness while
    /// the only logical thread waits; it is an optimisation assumption, not a
    /// guarantee of the environment, and can be switched off with
    /// [`BridgeBuilder::skip_when_alone`](crate::BridgeBuilder::skip_when_alone).
    ///
    /// Past the shortcut, descriptors at or above [`FD_LIMIT`] fail with
    /// [`BridgeError::DescriptorOutOfRange`] before any `select(2)` call.
    pub fn wait_until_ready(&self, fd: RawFd, direction: Direction) -> Result<()> {
        if fd < 0 {
            return Err(BridgeError::InvalidDescriptor);
        }

        let config = self.config();
        if config.skip_when_alone && self.alone()? {
            debug!("single logical thread, not waiting on fd {fd}");
            return Ok(());
        }

        if !in_range(fd) {
            return Err(BridgeError::DescriptorOutOfRange {
                fd,
                limit: FD_LIMIT,
            });
        }

        let mut backoff = Backoff::new(config.retry_backoff, config.max_retry_backoff);

        loop {
            let mut set = FdSet::with(fd);
            let outcome = match direction {
                Direction::Readable => {
                    self.select(fd + 1, Some(&mut set), None, None, config.poll_timeout)?
                }
                Direction::Writable => {
                    self.select(fd + 1, None, Some(&mut set), None, config.poll_timeout)?
                }
            };

            match outcome {
                SelectOutcome::Ready(_) if set.contains(fd) => return Ok(()),
                SelectOutcome::Failed(errno) => return Err(BridgeError::SystemCall { errno }),
                _ => {
                    trace!("fd {fd} not {direction:?} yet, retrying");
                    backoff.pause(self.scheduler())?;
                }
            }
        }
    }

    /// Waits until `fd` is readable.
    pub fn wait_readable(&self, fd: RawFd) -> Result<()> {
        self.wait_until_ready(fd, Direction::Readable)
    }

    /// Waits until `fd` is writable.
    pub fn wait_writable(&self, fd: RawFd) -> Result<()> {
        self.wait_until_ready(fd, Direction::Writable)
    }
}

/// Exponential pause between fruitless iterations.
struct Backoff {
    next: Duration,
    max: Duration,
}

impl Backoff {
    fn new(initial: Duration, max: Duration) -> Self {
        Self {
            next: initial.min(max),
            max,
        }
    }

    fn pause(&mut self, scheduler: &dyn Scheduler) -> std::result::Result<(), SchedulerError> {
        if self.next.is_zero() {
            return scheduler.pass();
        }

        scheduler.sleep(whole_millis(Some(self.next)))?;
        self.next = self.next.saturating_mul(2).min(self.max);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::region::{BlockingCallRequest, NativeValue};
    use crate::runtime::LogicalThread;

    use parking_lot::Mutex;

    #[derive(Default)]
    struct Recorder {
        sleeps: Mutex<Vec<u64>>,
        passes: Mutex<usize>,
    }

    impl Scheduler for Recorder {
        fn sleep(&self, millis: u64) -> std::result::Result<(), SchedulerError> {
            self.sleeps.lock().push(millis);
            Ok(())
        }

        fn run_blocking(
            &self,
            request: BlockingCallRequest,
        ) -> std::result::Result<NativeValue, SchedulerError> {
            Ok(request.run())
        }

        fn live_threads(&self) -> std::result::Result<usize, SchedulerError> {
            Ok(1)
        }

        fn pass(&self) -> std::result::Result<(), SchedulerError> {
            *self.passes.lock() += 1;
            Ok(())
        }

        fn current(&self) -> std::result::Result<LogicalThread, SchedulerError> {
            Err(SchedulerError::new("unused"))
        }
    }

    #[test]
    fn direction_from_flag() {
        assert_eq!(Direction::from(true), Direction::Readable);
        assert_eq!(Direction::from(false), Direction::Writable);
    }

    #[test]
    fn backoff_doubles_up_to_cap() {
        let recorder = Recorder::default();
        let mut backoff = Backoff::new(Duration::from_millis(10), Duration::from_millis(35));

        for _ in 0..4 {
            backoff.pause(&recorder).unwrap();
        }

        assert_eq!(*recorder.sleeps.lock(), vec![10, 20, 35, 35]);
    }

    #[test]
    fn zero_backoff_yields_instead_of_sleeping() {
        let recorder = Recorder::default();
        let mut backoff = Backoff::new(Duration::ZERO, Duration::from_millis(50));

        backoff.pause(&recorder).unwrap();
        backoff.pause(&recorder).unwrap();

        assert!(recorder.sleeps.lock().is_empty());
        assert_eq!(*recorder.passes.lock(), 2);
    }
}
