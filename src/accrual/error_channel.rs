//! Error channel (C9): bounded, non-blocking drain of diagnostics to the
//! logger (§4.9, §9 open question 4 — drop rather than block a worker).

use tokio::sync::mpsc;

pub const ERROR_CHANNEL_CAPACITY: usize = 10;

#[derive(Clone)]
pub struct ErrorSender(mpsc::Sender<String>);

impl ErrorSender {
    pub fn new(inner: mpsc::Sender<String>) -> Self {
        Self(inner)
    }

    /// Non-blocking diagnostic send; a full or closed channel drops the
    /// message rather than stalling the caller.
    pub fn send(&self, message: String) {
        if self.0.try_send(message).is_err() {
            tracing::warn!("accrual pipeline error channel full or closed, dropping diagnostic");
        }
    }
}

pub fn error_channel() -> (ErrorSender, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(ERROR_CHANNEL_CAPACITY);
    (ErrorSender::new(tx), rx)
}

pub async fn drain_to_log(mut rx: mpsc::Receiver<String>) {
    while let Some(message) = rx.recv().await {
        tracing::warn!(target: "accrual_pipeline", "{message}");
    }
}
