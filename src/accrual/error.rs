use thiserror::Error;

use crate::db::DbError;

/// Diagnostics raised by the sink while applying one finalized order. Never
/// surfaced to HTTP clients (§7 `PipelineDiagnostic`) — logged by the caller.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("order already has an accrual transaction")]
    DuplicateAccrual,
    #[error("database error: {0}")]
    Database(#[from] DbError),
}
