//! Outbound request pacing for external APIs.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Spaces outbound calls so that successive call starts are at least `delay`
/// apart, measured from call start rather than completion.
///
/// The timestamp is owned by the limiter instance and shared via whatever
/// owns it (typically a client struct behind an `Arc`), never a process-wide
/// global, so tests can construct isolated instances. The lock is held across
/// the sleep: concurrent callers serialize behind it instead of racing the
/// read-then-write of the timestamp.
pub struct RateLimiter {
    delay: Duration,
    last_request_at: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_request_at: Mutex::new(None),
        }
    }

    /// Suspends until at least `delay` has elapsed since the start of the
    /// previous permitted call, then records the new start time. The first
    /// call proceeds immediately. No timeout and no cancellation beyond
    /// dropping the future.
    pub async fn wait(&self) {
        let mut last_request_at = self.last_request_at.lock().await;

        if let Some(previous_start) = *last_request_at {
            let elapsed = previous_start.elapsed();
            if elapsed < self.delay {
                sleep(self.delay - elapsed).await;
            }
        }

        *last_request_at = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const DELAY: Duration = Duration::from_millis(5000);

    #[tokio::test(start_paused = true)]
    async fn first_call_proceeds_immediately() {
        let limiter = RateLimiter::new(DELAY);

        let start = Instant::now();
        limiter.wait().await;
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn sequential_call_starts_are_spaced_by_the_delay() {
        let limiter = RateLimiter::new(DELAY);

        limiter.wait().await;
        let first_start = Instant::now();

        limiter.wait().await;
        let second_start = Instant::now();

        limiter.wait().await;
        let third_start = Instant::now();

        assert!(second_start - first_start >= DELAY);
        assert!(third_start - second_start >= DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_time_counts_against_the_delay() {
        let limiter = RateLimiter::new(DELAY);

        limiter.wait().await;
        tokio::time::advance(Duration::from_millis(4000)).await;

        let before = Instant::now();
        limiter.wait().await;

        // Only the remaining 1000ms should be slept.
        assert_eq!(before.elapsed(), Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_serialize_behind_the_lock() {
        let limiter = Arc::new(RateLimiter::new(DELAY));

        let mut tasks = Vec::new();
        for _ in 0..3 {
            let limiter = Arc::clone(&limiter);
            tasks.push(tokio::spawn(async move {
                limiter.wait().await;
                Instant::now()
            }));
        }

        let mut starts = Vec::new();
        for task in tasks {
            starts.push(task.await.unwrap());
        }
        starts.sort();

        assert!(starts[1] - starts[0] >= DELAY);
        assert!(starts[2] - starts[1] >= DELAY);
    }
}
