//! Periodic admission gate for completion calls.

use crate::ThrottleConfig;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

/// Admission gate shared by every branch of one generation.
///
/// Each call to [`acquire`](CallThrottle::acquire) counts one admission. When the
/// count reaches the threshold, that caller sleeps for the pause while holding the
/// gate, then resets the count to zero. Concurrent callers queue behind the sleeping
/// one, so exactly one pause happens per `threshold` admissions no matter how many
/// branches are in flight.
///
/// A threshold of zero disables the gate.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use twister_rate_limit::CallThrottle;
///
/// # #[tokio::main]
/// # async fn main() {
/// let throttle = CallThrottle::new(3, Duration::from_millis(1));
/// for _ in 0..4 {
///     throttle.acquire().await;
/// }
/// assert_eq!(throttle.pauses(), 1);
/// assert_eq!(throttle.admitted().await, 1);
/// # }
/// ```
#[derive(Debug)]
pub struct CallThrottle {
    threshold: u32,
    pause: Duration,
    admitted: Mutex<u32>,
    pauses: AtomicU32,
}

impl CallThrottle {
    /// Create a gate that pauses for `pause` on every `threshold`-th call.
    pub fn new(threshold: u32, pause: Duration) -> Self {
        Self {
            threshold,
            pause,
            admitted: Mutex::new(0),
            pauses: AtomicU32::new(0),
        }
    }

    /// A gate that admits everything immediately.
    pub fn disabled() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Build from the `[throttle]` configuration section.
    pub fn from_config(config: &ThrottleConfig) -> Self {
        if config.enabled {
            Self::new(config.threshold, Duration::from_secs(config.pause_secs))
        } else {
            Self::disabled()
        }
    }

    /// Wait until this call is admitted.
    #[instrument(skip(self), fields(threshold = self.threshold))]
    pub async fn acquire(&self) {
        if self.threshold == 0 {
            return;
        }

        let mut admitted = self.admitted.lock().await;
        *admitted += 1;
        debug!(admitted = *admitted, "Completion call admitted");

        if *admitted >= self.threshold {
            warn!(
                pause_secs = self.pause.as_secs(),
                "Call threshold reached, pausing before the next completion"
            );
            tokio::time::sleep(self.pause).await;
            *admitted = 0;
            self.pauses.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Admissions counted since the last pause.
    pub async fn admitted(&self) -> u32 {
        *self.admitted.lock().await
    }

    /// Number of pauses induced so far.
    pub fn pauses(&self) -> u32 {
        self.pauses.load(Ordering::Relaxed)
    }

    /// Configured threshold; zero when disabled.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for CallThrottle {
    fn default() -> Self {
        Self::from_config(&ThrottleConfig::default())
    }
}
