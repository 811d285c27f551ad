//! The accrual pipeline (C2-C9): poller, dispatcher, worker pool, back-off
//! coordinator, and result sink, wired together by the lifecycle controller.

pub mod backoff;
pub mod client;
pub mod error;
pub mod error_channel;
pub mod pipeline;
pub mod poller;
pub mod sink;
pub mod worker;

pub use client::{AccrualClient, FetchResult, HttpAccrualClient};
pub use pipeline::{PipelineConfig, PipelineHandle};
