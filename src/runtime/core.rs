//! The bridge between logical threads and blocking native code.
//!
//! A [`Bridge`] ties together the managed scheduler, the OS readiness backend
//! and the retry-loop configuration. The component operations are spread over
//! the subsystems that implement them:
//!
//! - [`Bridge::blocking_region`] in [`crate::region`]
//! - [`Bridge::select`] and [`Bridge::wait_until_ready`] in [`crate::select`]
//! - [`Bridge::alone`], [`Bridge::yield_now`] and [`Bridge::current`] in [`crate::runtime::thread`]

use crate::builder::Config;
use crate::runtime::Scheduler;
use crate::runtime::context::enter_context;
use crate::select::Selector;

use std::fmt;
use std::sync::Arc;

/// Entry point for every bridge operation.
///
/// Cloning is cheap; clones share the scheduler and selector.
#[derive(Clone)]
pub struct Bridge {
    scheduler: Arc<dyn Scheduler>,
    selector: Arc<dyn Selector>,
    config: Config,
}

impl Bridge {
    pub(crate) fn from_parts(
        scheduler: Arc<dyn Scheduler>,
        selector: Arc<dyn Selector>,
        config: Config,
    ) -> Self {
        Self {
            scheduler,
            selector,
            config,
        }
    }

    /// The scheduler owning the logical threads.
    pub fn scheduler(&self) -> &dyn Scheduler {
        &*self.scheduler
    }

    pub(crate) fn selector(&self) -> &Arc<dyn Selector> {
        &self.selector
    }

    pub(crate) fn config(&self) -> &Config {
        &self.config
    }

    /// Makes this bridge current for the calling OS thread while `function` runs.
    ///
    /// The free functions in [`crate::runtime::thread`] resolve the bridge
    /// through this context. The previous context is restored afterwards.
    ///
    /// # Example
    /// ```ignore
    /// bridge.enter(|| {
    ///     if !thread::alone()? {
    ///         thread::yield_now()?;
    ///     }
    ///     Ok(())
    /// })
    /// ```
    pub fn enter<F, R>(&self, function: F) -> R
    where
        F: FnOnce() -> R,
    {
        enter_context(self.clone(), function)
    }
}

impl fmt::Debug for Bridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
