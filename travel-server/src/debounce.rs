//! Keystroke debouncing.
//!
//! Each keystroke in a location field produces a request. Sending every one
//! of them to the places service would waste quota and race, so requests for
//! one field are funnelled through a [`Debouncer`]: only the value that stays
//! unchanged for the full delay goes on to the lookup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default quiet period before a query is looked up.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Coalesces rapid successive values into the last one.
///
/// Every call to [`Debouncer::settle`] supersedes all earlier calls that
/// have not yet completed their delay.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the quiet period for `value`.
    ///
    /// Returns `Some(value)` if no newer value arrived during the delay,
    /// `None` if this value was superseded.
    pub async fn settle<T>(&self, value: T) -> Option<T> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        tokio::time::sleep(self.delay).await;

        if self.latest.load(Ordering::SeqCst) == ticket {
            Some(value)
        } else {
            None
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}
