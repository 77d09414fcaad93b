//! Request-rate and concurrency limiting using governor and a Tokio Semaphore.

use crate::CompletionConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::warn;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Limits requests per minute (GCRA) and concurrent in-flight requests.
///
/// Cloning shares the underlying quotas.
///
/// ```rust,ignore
/// let limiter = RateLimiter::new(Some(60), Some(4));
/// let guard = limiter.acquire().await;
/// let response = client.generate(&request).await?;
/// drop(guard); // Release concurrent slot
/// ```
#[derive(Clone)]
pub struct RateLimiter {
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    concurrent_semaphore: Arc<Semaphore>,
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("rpm_limited", &self.rpm_limiter.is_some())
            .field(
                "available_permits",
                &self.concurrent_semaphore.available_permits(),
            )
            .finish()
    }
}

impl RateLimiter {
    /// Create a limiter. `None` or zero leaves that dimension unlimited.
    pub fn new(rpm: Option<u32>, max_concurrent: Option<u32>) -> Self {
        let rpm_limiter = rpm.and_then(|rpm| {
            NonZeroU32::new(rpm).map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))))
        });

        let max_concurrent = max_concurrent
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .unwrap_or(Semaphore::MAX_PERMITS);

        Self {
            rpm_limiter,
            concurrent_semaphore: Arc::new(Semaphore::new(max_concurrent)),
        }
    }

    /// Build from the `[completion]` configuration section.
    ///
    /// Returns `None` when neither limit is configured.
    pub fn from_config(config: &CompletionConfig) -> Option<Self> {
        if config.rpm.is_none() && config.max_concurrent.is_none() {
            return None;
        }
        Some(Self::new(config.rpm, config.max_concurrent))
    }

    /// Wait until the request-rate quota and a concurrency slot allow a request.
    ///
    /// The returned guard releases the slot when dropped.
    pub async fn acquire(&self) -> RateLimiterGuard {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        // Concurrency slot last to avoid holding it while waiting on quota
        let permit = match self.concurrent_semaphore.clone().acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(e) => {
                warn!(error = %e, "Concurrency semaphore closed, proceeding without a slot");
                None
            }
        };

        RateLimiterGuard { _permit: permit }
    }

    /// Try to acquire without waiting. Returns `None` if any limit would block.
    pub fn try_acquire(&self) -> Option<RateLimiterGuard> {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.check().ok()?;
        }

        let permit = self.concurrent_semaphore.clone().try_acquire_owned().ok()?;
        Some(RateLimiterGuard {
            _permit: Some(permit),
        })
    }

    /// Concurrency slots currently free.
    pub fn available_permits(&self) -> usize {
        self.concurrent_semaphore.available_permits()
    }
}

/// RAII guard releasing the concurrency slot on drop.
#[derive(Debug)]
pub struct RateLimiterGuard {
    _permit: Option<OwnedSemaphorePermit>,
}
