//! Global concurrency ceiling for dispatch tasks.
//!
//! Admission is a cooperative, starvation-free wait on a
//! [`tokio::sync::Semaphore`] rather than a poll loop — spec §9 explicitly
//! calls out the source's 50 ms poll loop as something not to replicate when
//! a better primitive is available.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Admission gate plus the `executingCount` the management API reports.
pub struct ConcurrencyLimiter {
    semaphore: Arc<Semaphore>,
    executing: Arc<AtomicUsize>,
}

impl ConcurrencyLimiter {
    pub fn new(max_concurrent_executions: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent_executions)),
            executing: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Waits for an execution slot, then increments `executingCount`. The
    /// returned guard restores the count and releases the slot on drop,
    /// regardless of how the caller's task ends (normal return, early
    /// return, or panic).
    pub async fn acquire(&self) -> ExecutionPermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("limiter semaphore is never closed");
        self.executing.fetch_add(1, Ordering::SeqCst);
        ExecutionPermit {
            _permit: permit,
            executing: self.executing.clone(),
        }
    }

    /// Number of dispatch tasks currently inside their execution critical
    /// section (between admission and release). Does not include tasks
    /// still waiting at the semaphore.
    pub fn executing_count(&self) -> usize {
        self.executing.load(Ordering::SeqCst)
    }
}

/// RAII guard held by a dispatch task for the duration of its critical
/// section. Dropping it — on any path — decrements `executingCount` and
/// releases the semaphore slot.
pub struct ExecutionPermit {
    _permit: OwnedSemaphorePermit,
    executing: Arc<AtomicUsize>,
}

impl Drop for ExecutionPermit {
    fn drop(&mut self) {
        self.executing.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_executing_count_tracks_acquire_and_release() {
        let limiter = ConcurrencyLimiter::new(2);
        assert_eq!(limiter.executing_count(), 0);

        let permit_a = limiter.acquire().await;
        assert_eq!(limiter.executing_count(), 1);

        let permit_b = limiter.acquire().await;
        assert_eq!(limiter.executing_count(), 2);

        drop(permit_a);
        assert_eq!(limiter.executing_count(), 1);

        drop(permit_b);
        assert_eq!(limiter.executing_count(), 0);
    }

    #[tokio::test]
    async fn test_third_acquire_waits_for_slot() {
        let limiter = Arc::new(ConcurrencyLimiter::new(1));
        let _first = limiter.acquire().await;

        let limiter_clone = limiter.clone();
        let waiter = tokio::spawn(async move {
            let _permit = limiter_clone.acquire().await;
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(_first);
        waiter.await.unwrap();
    }
}
