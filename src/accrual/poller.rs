//! Poller (C5): on a fixed interval, feeds unfinished orders to the
//! dispatcher. Does not dedupe with in-flight work (§4.5) — tolerated
//! because the sink's terminal update is idempotent.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use super::error_channel::ErrorSender;
use crate::db::{Database, Order, orders::OrderRepository};

pub struct Poller {
    db: Database,
    interval: Duration,
    output: mpsc::Sender<Order>,
    error_tx: ErrorSender,
}

impl Poller {
    pub fn new(
        db: Database,
        interval: Duration,
        output: mpsc::Sender<Order>,
        error_tx: ErrorSender,
    ) -> Self {
        Self {
            db,
            interval,
            output,
            error_tx,
        }
    }

    /// Runs until `shutdown` reports true. Exits on its next tick after the
    /// signal, per the lifecycle controller's shutdown sequence (§4.8 step 2).
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.poll_once().await.is_none() {
                        break;
                    }
                }
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }

    /// Returns `None` if the dispatcher's input channel has closed, signaling
    /// the poller should stop.
    async fn poll_once(&self) -> Option<()> {
        match OrderRepository::unfinished(self.db.pool()).await {
            Ok(orders) => {
                for order in orders {
                    if self.output.send(order).await.is_err() {
                        return None;
                    }
                }
            }
            Err(e) => {
                self.error_tx.send(format!("poller: datastore error: {e}"));
            }
        }
        Some(())
    }
}
