//! Mock implementations of common traits
//!
//! Provides mock objects for testing purposes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::resilience::RequestPacer;

/// Pacer that never sleeps and counts how often it was asked to.
///
/// # Examples
///
/// ```
/// use voyager_common::resilience::RequestPacer;
/// use voyager_common::testing::RecordingPacer;
///
/// # async fn example() {
/// let pacer = RecordingPacer::new();
/// pacer.delay().await;
/// pacer.delay().await;
/// assert_eq!(pacer.calls(), 2);
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    calls: Arc<AtomicUsize>,
}

impl RecordingPacer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `delay()` calls observed so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestPacer for RecordingPacer {
    async fn delay(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}
