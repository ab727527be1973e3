//! A pluggable notion of time so retry backoff and Ralph mode's duration
//! bound can be driven by a manually-advanceable clock in tests instead of
//! real wall time.

use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

/// A source of elapsed time and a way to wait for a duration to pass.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Milliseconds elapsed since this clock was created.
    fn elapsed_ms(&self) -> u64;

    /// Waits until at least `duration` has passed according to this clock.
    async fn sleep(&self, duration: Duration);
}

/// The real clock: backed by `tokio::time::sleep` and a monotonic start
/// instant.
pub struct RealClock {
    start: std::time::Instant,
}

impl RealClock {
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

impl Default for RealClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for RealClock {
    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A clock whose time only moves when [`FakeClock::advance`] is called,
/// used so retry-backoff and Ralph-mode duration tests run instantly.
pub struct FakeClock {
    elapsed_ms: Mutex<u64>,
    notify: Notify,
}

impl FakeClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            elapsed_ms: Mutex::new(0),
            notify: Notify::new(),
        })
    }

    /// Moves this clock forward, waking any `sleep` calls whose target has
    /// now passed.
    pub fn advance(&self, duration: Duration) {
        *self.elapsed_ms.lock().unwrap_or_else(|e| e.into_inner()) += duration.as_millis() as u64;
        self.notify.notify_waiters();
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn elapsed_ms(&self) -> u64 {
        *self.elapsed_ms.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn sleep(&self, duration: Duration) {
        let target_ms = self.elapsed_ms() + duration.as_millis() as u64;
        loop {
            if self.elapsed_ms() >= target_ms {
                return;
            }
            let notified = self.notify.notified();
            if self.elapsed_ms() >= target_ms {
                return;
            }
            notified.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sleep_returns_once_advanced_past_target() {
        let clock = FakeClock::new();
        let clock_for_sleep = clock.clone();
        let sleeper = tokio::spawn(async move {
            clock_for_sleep.sleep(Duration::from_millis(500)).await;
        });

        tokio::task::yield_now().await;
        clock.advance(Duration::from_millis(200));
        tokio::task::yield_now().await;
        assert!(!sleeper.is_finished());

        clock.advance(Duration::from_millis(300));
        tokio::time::timeout(Duration::from_secs(1), sleeper).await.expect("sleeper completed").expect("join");
    }

    #[tokio::test]
    async fn elapsed_ms_reflects_cumulative_advances() {
        let clock = FakeClock::new();
        assert_eq!(clock.elapsed_ms(), 0);
        clock.advance(Duration::from_millis(100));
        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.elapsed_ms(), 150);
    }

    #[tokio::test]
    async fn real_clock_sleep_actually_waits() {
        let clock = RealClock::new();
        let before = clock.elapsed_ms();
        clock.sleep(Duration::from_millis(10)).await;
        assert!(clock.elapsed_ms() >= before);
    }
}
