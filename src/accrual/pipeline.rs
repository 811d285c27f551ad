//! Lifecycle controller (C8): constructs every channel and task at
//! construction, owns the shutdown signal, and tears them down in
//! dependency order (§4.8).

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::backoff::BackoffGate;
use super::client::AccrualClient;
use super::error_channel::{drain_to_log, error_channel};
use super::poller::Poller;
use super::sink::ResultSink;
use super::worker::{Dispatcher, Worker};
use crate::db::{Database, Order};

pub struct PipelineConfig {
    pub workers: usize,
    pub poll_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workers: 10,
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Owns every task the pipeline spawned. Dropping it without calling
/// `shutdown` leaves the tasks running detached; callers are expected to
/// shut down cooperatively.
pub struct PipelineHandle {
    shutdown_tx: watch::Sender<bool>,
    poller_task: JoinHandle<()>,
    dispatcher_task: JoinHandle<()>,
    worker_tasks: Vec<JoinHandle<()>>,
    sink_task: JoinHandle<()>,
    error_task: JoinHandle<()>,
}

pub fn start(db: Database, client: Arc<dyn AccrualClient>, config: PipelineConfig) -> PipelineHandle {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (error_tx, error_rx) = error_channel();
    let error_task = tokio::spawn(drain_to_log(error_rx));

    // Buffer one item per worker: a full save_tx should exert back-pressure
    // on workers rather than grow unbounded.
    let (save_tx, save_rx) = mpsc::channel(config.workers.max(1));
    let sink = ResultSink::new(db.clone(), error_tx.clone());
    let sink_task = tokio::spawn(sink.run(save_rx));

    let gate = Arc::new(BackoffGate::new());
    let mut worker_senders = Vec::with_capacity(config.workers);
    let mut worker_tasks = Vec::with_capacity(config.workers);
    for id in 0..config.workers {
        let (tx, rx) = mpsc::channel::<Order>(1);
        worker_senders.push(tx);
        let worker = Worker::new(
            id,
            Arc::clone(&client),
            Arc::clone(&gate),
            save_tx.clone(),
            error_tx.clone(),
        );
        worker_tasks.push(tokio::spawn(worker.run(rx)));
    }
    drop(save_tx);

    let (input_tx, input_rx) = mpsc::channel::<Order>(1);
    let dispatcher = Dispatcher::new(worker_senders);
    let dispatcher_task = tokio::spawn(dispatcher.run(input_rx));

    let poller = Poller::new(db, config.poll_interval, input_tx, error_tx);
    let poller_task = tokio::spawn(poller.run(shutdown_rx));

    PipelineHandle {
        shutdown_tx,
        poller_task,
        dispatcher_task,
        worker_tasks,
        sink_task,
        error_task,
    }
}

impl PipelineHandle {
    /// §4.8's 5-step shutdown: signal done, let the poller exit and close
    /// its output (cascading through the dispatcher and workers), then let
    /// the sink and error drain exit once their inputs close in turn.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.poller_task.await;
        let _ = self.dispatcher_task.await;
        for worker_task in self.worker_tasks {
            let _ = worker_task.await;
        }
        let _ = self.sink_task.await;
        let _ = self.error_task.await;
    }
}
