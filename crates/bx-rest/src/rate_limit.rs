//! Minimum-interval gate shared by all calls on one client.
//!
//! The gate remembers when the previous request finished. [`RateGate::acquire`]
//! waits until `interval` has passed since then and returns a permit that
//! holds the gate's lock; dropping the permit stamps the new end time. Callers
//! racing on the same client therefore run one after the other, each at least
//! `interval` after the previous one finished.
//!
//! Built on `tokio::time`, so tests with a paused clock observe exact spacing.

use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};
use tokio::time::Instant;

/// Serialising rate-limit gate.
#[derive(Debug)]
pub struct RateGate {
    interval: Duration,
    /// End time of the last request (`None` before the first one).
    last_end: Mutex<Option<Instant>>,
}

/// Exclusive right to issue one request. Stamps the end time on drop.
#[derive(Debug)]
pub struct GatePermit<'a> {
    guard: MutexGuard<'a, Option<Instant>>,
}

impl RateGate {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last_end: Mutex::new(None) }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait for the lock and for the interval to elapse.
    pub async fn acquire(&self) -> GatePermit<'_> {
        let guard = self.last_end.lock().await;
        if let Some(last) = *guard {
            let ready = last + self.interval;
            if Instant::now() < ready {
                tokio::time::sleep_until(ready).await;
            }
        }
        GatePermit { guard }
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        *self.guard = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_acquire_is_immediate() {
        let gate = RateGate::new(Duration::from_millis(200));
        let start = Instant::now();
        drop(gate.acquire().await);
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn second_acquire_waits_for_interval() {
        let gate = RateGate::new(Duration::from_millis(200));
        drop(gate.acquire().await);
        let first_end = Instant::now();
        drop(gate.acquire().await);
        assert!(Instant::now() - first_end >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn interval_counts_from_request_end() {
        let gate = RateGate::new(Duration::from_millis(200));
        {
            let _permit = gate.acquire().await;
            // A slow request: 1s in flight.
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        let end = Instant::now();
        drop(gate.acquire().await);
        assert_eq!(Instant::now() - end, Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_are_spaced() {
        let gate = Arc::new(RateGate::new(Duration::from_millis(200)));
        let mut handles = Vec::new();
        for _ in 0..3 {
            let gate = Arc::clone(&gate);
            handles.push(tokio::spawn(async move {
                let _permit = gate.acquire().await;
                Instant::now()
            }));
        }
        let mut starts = Vec::new();
        for h in handles {
            starts.push(h.await.unwrap());
        }
        starts.sort();
        for pair in starts.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(200), "{pair:?}");
        }
    }
}
