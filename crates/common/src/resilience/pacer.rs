//! Randomized request pacing
//!
//! Fixed-interval traffic is an easy fingerprint for server-side abuse
//! detection. A [`JitterPacer`] sleeps for a uniformly random duration drawn
//! from a half-open window before each outbound call.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Errors raised while configuring a pacer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PacerError {
    #[error("invalid pacing window: min {min:?} exceeds max {max:?}")]
    InvalidWindow { min: Duration, max: Duration },
}

/// Suspends the caller before a network dispatch.
#[async_trait]
pub trait RequestPacer: Send + Sync {
    /// Wait out the pacing delay for the next request.
    async fn delay(&self);
}

/// Uniform jitter over `[min, max)`.
///
/// Equal bounds degrade to a fixed delay; a zero window never sleeps.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
///
/// use voyager_common::resilience::JitterPacer;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pacer = JitterPacer::new(Duration::from_millis(2000), Duration::from_millis(6000))?;
/// let delay = pacer.next_delay();
/// assert!(delay >= Duration::from_millis(2000));
/// assert!(delay < Duration::from_millis(6000));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterPacer {
    min: Duration,
    max: Duration,
}

impl JitterPacer {
    /// Create a pacer over `[min, max)`.
    ///
    /// # Errors
    /// Returns [`PacerError::InvalidWindow`] if `min > max`.
    pub fn new(min: Duration, max: Duration) -> Result<Self, PacerError> {
        if min > max {
            return Err(PacerError::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    /// Window bounds expressed in milliseconds.
    ///
    /// # Errors
    /// Returns [`PacerError::InvalidWindow`] if `min_ms > max_ms`.
    pub fn from_millis(min_ms: u64, max_ms: u64) -> Result<Self, PacerError> {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    /// A pacer that never sleeps.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { min: Duration::ZERO, max: Duration::ZERO }
    }

    #[must_use]
    pub const fn min(&self) -> Duration {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> Duration {
        self.max
    }

    /// Draw the next delay.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.min >= self.max {
            return self.min;
        }
        let min_ms = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        if min_ms >= max_ms {
            return self.min;
        }
        Duration::from_millis(rand::thread_rng().gen_range(min_ms..max_ms))
    }
}

#[async_trait]
impl RequestPacer for JitterPacer {
    async fn delay(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }
        debug!(delay_ms = delay.as_millis() as u64, "pacing before request");
        tokio::time::sleep(delay).await;
    }
}
