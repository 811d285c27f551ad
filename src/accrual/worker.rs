//! Worker pool + round-robin dispatcher (C4).

use std::sync::Arc;

use tokio::sync::mpsc;

use super::backoff::BackoffGate;
use super::client::{AccrualClient, AccrualStatus, FetchResult};
use super::error_channel::ErrorSender;
use crate::db::{Order, OrderStatus};

/// An order finalized by a worker, bound for the result sink.
pub struct SinkItem {
    pub order_id: String,
    pub user_login: String,
    pub status: OrderStatus,
    pub amount: i64,
}

/// Reads from the shared input and writes to per-worker channels in strict
/// round-robin order, so back-pressure is symmetric across workers (§4.4,
/// §5). The sole writer to each worker channel: dropping `channels` at the
/// end of `run` closes every worker channel, cascading shutdown.
pub struct Dispatcher {
    channels: Vec<mpsc::Sender<Order>>,
}

impl Dispatcher {
    pub fn new(channels: Vec<mpsc::Sender<Order>>) -> Self {
        Self { channels }
    }

    pub async fn run(self, mut input: mpsc::Receiver<Order>) {
        let mut next = 0usize;
        let count = self.channels.len();
        while let Some(order) = input.recv().await {
            if self.channels[next].send(order).await.is_err() {
                tracing::warn!("dispatcher: worker {next} channel closed early");
            }
            next = (next + 1) % count;
        }
    }
}

pub struct Worker {
    id: usize,
    client: Arc<dyn AccrualClient>,
    gate: Arc<BackoffGate>,
    save_tx: mpsc::Sender<SinkItem>,
    error_tx: ErrorSender,
}

impl Worker {
    pub fn new(
        id: usize,
        client: Arc<dyn AccrualClient>,
        gate: Arc<BackoffGate>,
        save_tx: mpsc::Sender<SinkItem>,
        error_tx: ErrorSender,
    ) -> Self {
        Self {
            id,
            client,
            gate,
            save_tx,
            error_tx,
        }
    }

    pub async fn run(self, mut rx: mpsc::Receiver<Order>) {
        while let Some(order) = rx.recv().await {
            self.gate.wait().await;
            self.handle(order).await;
        }
    }

    async fn handle(&self, order: Order) {
        match self.client.fetch(&order.id).await {
            FetchResult::Ready(record) => match record.status {
                AccrualStatus::Processed => {
                    let amount = record.accrual.unwrap_or(0);
                    self.finalize(order, OrderStatus::Processed, amount).await;
                }
                AccrualStatus::Invalid => {
                    self.finalize(order, OrderStatus::Invalid, 0).await;
                }
                AccrualStatus::Registered | AccrualStatus::Processing => {
                    // Not terminal; the poller resubmits it next tick.
                }
            },
            FetchResult::RateLimited(retry_after) => {
                let gate = Arc::clone(&self.gate);
                tokio::spawn(async move { gate.postpone(retry_after).await });
                self.error_tx.send(format!(
                    "worker {}: order {} rate limited, retry after {:?}",
                    self.id, order.id, retry_after
                ));
            }
            FetchResult::NotRegistered => {
                self.error_tx.send(format!(
                    "worker {}: order {} not registered with accrual service",
                    self.id, order.id
                ));
            }
            FetchResult::UpstreamError => {
                self.error_tx.send(format!(
                    "worker {}: accrual service internal error for order {}",
                    self.id, order.id
                ));
            }
            FetchResult::Unknown { code, body } => {
                self.error_tx.send(format!(
                    "worker {}: unexpected accrual status {} for order {}: {}",
                    self.id, code, order.id, body
                ));
            }
            FetchResult::TransportError(cause) => {
                self.error_tx.send(format!(
                    "worker {}: transport error fetching order {}: {}",
                    self.id, order.id, cause
                ));
            }
        }
    }

    async fn finalize(&self, order: Order, status: OrderStatus, amount: i64) {
        let item = SinkItem {
            order_id: order.id.clone(),
            user_login: order.user_login.clone(),
            status,
            amount,
        };
        if self.save_tx.send(item).await.is_err() {
            self.error_tx.send(format!(
                "worker {}: result sink channel closed, dropping finalized order {}",
                self.id, order.id
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn dispatcher_round_robins_across_worker_channels() {
        let (tx_a, mut rx_a) = mpsc::channel(4);
        let (tx_b, mut rx_b) = mpsc::channel(4);
        let (input_tx, input_rx) = mpsc::channel(4);

        let dispatcher = Dispatcher::new(vec![tx_a, tx_b]);
        let handle = tokio::spawn(dispatcher.run(input_rx));

        for i in 0..4 {
            input_tx
                .send(Order {
                    id: i.to_string(),
                    user_login: "u1".to_string(),
                    status: OrderStatus::New,
                    uploaded_at: Utc::now(),
                })
                .await
                .unwrap();
        }
        drop(input_tx);
        handle.await.unwrap();

        assert_eq!(rx_a.recv().await.unwrap().id, "0");
        assert_eq!(rx_b.recv().await.unwrap().id, "1");
        assert_eq!(rx_a.recv().await.unwrap().id, "2");
        assert_eq!(rx_b.recv().await.unwrap().id, "3");
        assert!(rx_a.recv().await.is_none());
        assert!(rx_b.recv().await.is_none());
    }
}
