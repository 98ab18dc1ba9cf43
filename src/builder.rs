//! Fluent builder for Bridge construction.
//!
//! Provides a builder pattern interface for wiring a scheduler and readiness
//! backend together and tuning the retry loop.

use crate::runtime::{Bridge, Scheduler};
use crate::select::{Selector, SystemSelector};

use std::sync::Arc;
use std::time::Duration;

/// Retry-loop settings shared by every clone of a [`Bridge`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Config {
    /// Timeout of each readiness call in the retry loop; `None` blocks.
    pub(crate) poll_timeout: Option<Duration>,

    /// First pause after an iteration that found nothing ready.
    pub(crate) retry_backoff: Duration,

    /// Upper bound for the doubling pause.
    pub(crate) max_retry_backoff: Duration,

    /// Skip waiting entirely when only one logical thread exists.
    pub(crate) skip_when_alone: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_timeout: None,
            retry_backoff: Duration::from_millis(1),
            max_retry_backoff: Duration::from_millis(100),
            skip_when_alone: true,
        }
    }
}

/// Builder for constructing [`Bridge`] instances with fluent API.
///
/// # Example
/// ```ignore
/// let bridge = BridgeBuilder::new(scheduler)
///     .poll_timeout(Duration::from_millis(250))
///     .build();
/// ```
pub struct BridgeBuilder {
    scheduler: Arc<dyn Scheduler>,
    selector: Arc<dyn Selector>,
    config: Config,
}

impl BridgeBuilder {
    /// Creates a builder around the managed scheduler.
    ///
    /// Defaults to [`SystemSelector`], blocking readiness waits, a 1ms initial
    /// backoff capped at 100ms and the single-thread shortcut enabled.
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            selector: Arc::new(SystemSelector),
            config: Config::default(),
        }
    }

    /// Replaces the readiness backend.
    pub fn selector(mut self, selector: Arc<dyn Selector>) -> Self {
        self.selector = selector;
        self
    }

    /// Bounds every readiness call made by the retry loop.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.config.poll_timeout = Some(timeout);
        self
    }

    /// Sets the first pause after a fruitless retry-loop iteration.
    ///
    /// A zero backoff yields through the scheduler instead of sleeping.
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.config.retry_backoff = backoff;
        self
    }

    /// Caps the doubling retry-loop pause.
    pub fn max_retry_backoff(mut self, max: Duration) -> Self {
        self.config.max_retry_backoff = max;
        self
    }

    /// Enables or disables the single-logical-thread shortcut of the retry loop.
    pub fn skip_when_alone(mut self, enabled: bool) -> Self {
        self.config.skip_when_alone = enabled;
        self
    }

    /// Builds and returns the configured bridge.
    pub fn build(self) -> Bridge {
        Bridge::from_parts(self.scheduler, self.selector, self.config)
    }
}
