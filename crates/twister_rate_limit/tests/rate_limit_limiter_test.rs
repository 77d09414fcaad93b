use std::time::Duration;
use twister_rate_limit::{CompletionConfig, RateLimiter};

#[tokio::test]
async fn test_unlimited_limiter_admits_immediately() {
    let limiter = RateLimiter::new(None, None);
    let start = std::time::Instant::now();
    for _ in 0..20 {
        let _guard = limiter.acquire().await;
    }
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test]
async fn test_rpm_limiting() {
    // 60 RPM = one request per second after the burst
    let limiter = RateLimiter::new(Some(60), None);

    let first = limiter.try_acquire();
    assert!(first.is_some(), "first request should be admitted");

    let mut blocked = false;
    for _ in 0..100 {
        if limiter.try_acquire().is_none() {
            blocked = true;
            break;
        }
    }
    assert!(blocked, "rpm quota should eventually block");
}

#[tokio::test]
async fn test_concurrent_limit() {
    let limiter = RateLimiter::new(None, Some(2));

    let guard1 = limiter.acquire().await;
    let _guard2 = limiter.acquire().await;
    assert_eq!(limiter.available_permits(), 0);
    assert!(limiter.try_acquire().is_none());

    drop(guard1);
    assert_eq!(limiter.available_permits(), 1);
    assert!(limiter.try_acquire().is_some());
}

#[test]
fn test_from_config_without_limits_is_none() {
    let config = CompletionConfig::default();
    assert!(RateLimiter::from_config(&config).is_none());

    let limited = CompletionConfig {
        max_concurrent: Some(3),
        ..CompletionConfig::default()
    };
    let limiter = RateLimiter::from_config(&limited).expect("limiter expected");
    assert_eq!(limiter.available_permits(), 3);
}
