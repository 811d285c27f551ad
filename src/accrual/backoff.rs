//! Back-off coordinator (C3): a process-wide gate that pauses every worker
//! until a server-directed retry window elapses. Replaces the cyclic
//! `*sync.Cond` the source used to point at its own mutex (§9) with a plain
//! `Notify` + atomic flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::{Mutex, Notify};

pub struct BackoffGate {
    paused: AtomicBool,
    notify: Notify,
    postpone_lock: Mutex<()>,
}

impl BackoffGate {
    pub fn new() -> Self {
        Self {
            paused: AtomicBool::new(false),
            notify: Notify::new(),
            postpone_lock: Mutex::new(()),
        }
    }

    /// Block while the gate is paused; no-op otherwise.
    pub async fn wait(&self) {
        loop {
            if !self.paused.load(Ordering::Acquire) {
                return;
            }

            // Register for the next notification before rechecking `paused`,
            // so a `postpone` that clears the flag and calls
            // `notify_waiters()` between the check and the await can't slip
            // past us (tokio's documented enable-then-recheck pattern).
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if !self.paused.load(Ordering::Acquire) {
                return;
            }
            notified.await;
        }
    }

    /// Pause the gate, sleep for `d`, then wake every waiter. Serialized
    /// against itself so overlapping rate-limit responses don't compound the
    /// pause (§4.3).
    pub async fn postpone(self: &Arc<Self>, d: Duration) {
        let _guard = self.postpone_lock.lock().await;
        self.paused.store(true, Ordering::Release);
        tokio::time::sleep(d).await;
        self.paused.store(false, Ordering::Release);
        self.notify.notify_waiters();
    }
}

impl Default for BackoffGate {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn wait_returns_immediately_when_not_paused() {
        let gate = BackoffGate::new();
        let start = Instant::now();
        gate.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test(start_paused = true)]
    async fn postpone_blocks_waiters_for_the_full_duration() {
        let gate = Arc::new(BackoffGate::new());
        let waiter_gate = Arc::clone(&gate);

        let postpone = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.postpone(Duration::from_secs(2)).await }
        });

        tokio::time::advance(Duration::from_millis(10)).await;
        let waiter = tokio::spawn(async move { waiter_gate.wait().await });

        tokio::time::advance(Duration::from_secs(2)).await;
        postpone.await.unwrap();
        waiter.await.unwrap();
    }

    /// Regression test for a missed-wakeup race: many waiters spawned while
    /// paused, racing the postpone's clear-then-notify against their own
    /// register-then-recheck. None may park past the one `postpone` call.
    #[tokio::test(start_paused = true)]
    async fn all_waiters_wake_on_a_single_postpone() {
        let gate = Arc::new(BackoffGate::new());

        let postpone = tokio::spawn({
            let gate = Arc::clone(&gate);
            async move { gate.postpone(Duration::from_millis(50)).await }
        });
        tokio::time::advance(Duration::from_millis(1)).await;

        let waiters: Vec<_> = (0..16)
            .map(|_| {
                let gate = Arc::clone(&gate);
                tokio::spawn(async move { gate.wait().await })
            })
            .collect();

        tokio::time::advance(Duration::from_millis(50)).await;
        postpone.await.unwrap();
        for waiter in waiters {
            waiter.await.unwrap();
        }
    }
}
