//! Select-style readiness wait.
//!
//! With no descriptor sets at all the wait is a plain timed sleep and goes
//! straight to the scheduler, bypassing the blocking region. Otherwise the
//! parameters are packaged into a [`SelectRequest`] and the readiness call runs
//! inside a blocking region without an unblock callback.

use crate::error::Result;
use crate::region::execute;
use crate::runtime::Bridge;
use crate::select::request::whole_millis;
use crate::select::{FdSet, SelectOutcome, SelectRequest};

use log::{debug, warn};
use std::io;
use std::time::Duration;

impl Bridge {
    /// Waits until a descriptor in the given sets is ready or `timeout` elapses.
    ///
    /// `nfds` is one more than the highest descriptor in any set. Sets are
    /// updated in place with the ready descriptors, as `select(2)` does.
    ///
    /// A failed readiness call is only logged: it comes back as
    /// [`SelectOutcome::Failed`] and callers have to inspect it themselves.
    /// The returned `Err` is reserved for scheduler failures.
    ///
    /// # Example
    /// ```ignore
    /// let mut read = FdSet::with(fd);
    /// match bridge.select(fd + 1, Some(&mut read), None, None, Some(Duration::from_secs(1)))? {
    ///     SelectOutcome::Ready(_) => assert!(read.contains(fd)),
    ///     SelectOutcome::TimedOut => {}
    ///     SelectOutcome::Failed(errno) => return Err(io::Error::from_raw_os_error(errno)),
    /// }
    /// ```
    pub fn select(
        &self,
        nfds: libc::c_int,
        read: Option<&mut FdSet>,
        write: Option<&mut FdSet>,
        except: Option<&mut FdSet>,
        timeout: Option<Duration>,
    ) -> Result<SelectOutcome> {
        if read.is_none() && write.is_none() && except.is_none() {
            let millis = whole_millis(timeout);
            debug!("select without descriptors, sleeping {millis}ms");

            self.scheduler().sleep(millis)?;
            return Ok(SelectOutcome::TimedOut);
        }

        let request = SelectRequest::new(
            nfds,
            read.as_deref().copied(),
            write.as_deref().copied(),
            except.as_deref().copied(),
            timeout,
        );
        let selector = self.selector().clone();

        let (outcome, mut request) = execute(
            self.scheduler(),
            move || {
                let mut request = request;
                let outcome = selector.select(&mut request);
                (outcome, request)
            },
            None,
        )?;

        copy_back(read, request.read.take());
        copy_back(write, request.write.take());
        copy_back(except, request.except.take());
        drop(request);

        if let SelectOutcome::Failed(errno) = outcome {
            warn!("select failed: {}", io::Error::from_raw_os_error(errno));
        }

        Ok(outcome)
    }

    /// Suspends the caller for `duration` through the timeout-only path.
    pub fn wait_for(&self, duration: Duration) -> Result<()> {
        self.select(0, None, None, None, Some(duration))?;
        Ok(())
    }
}

fn copy_back(target: Option<&mut FdSet>, updated: Option<FdSet>) {
    if let (Some(target), Some(updated)) = (target, updated) {
        *target = updated;
    }
}
