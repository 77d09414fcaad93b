//! Admission control and configuration.
//!
//! Two complementary gates sit in front of the completion service:
//!
//! - [`CallThrottle`]: a periodic admission gate. Every `threshold`-th call waits a
//!   fixed pause before it is admitted; callers arriving meanwhile queue behind it.
//! - [`RateLimiter`]: requests-per-minute (GCRA via `governor`) plus a concurrency cap
//!   (Tokio semaphore), for providers with published quotas.
//!
//! [`TwisterConfig`] loads the settings for both, along with the completion,
//! generation and publishing sections, from layered TOML files.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;
mod throttle;

pub use config::{
    CompletionConfig, GenerationConfig, MAX_BRANCHING, PublishConfig, ThrottleConfig, TwisterConfig,
};
pub use limiter::{RateLimiter, RateLimiterGuard};
pub use throttle::CallThrottle;
