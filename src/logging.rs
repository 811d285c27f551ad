//! Structured logging setup, following the teacher's `tracing-subscriber`
//! registry pattern without the file-rotation concern this binary doesn't
//! need (it logs to stdout only).

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}
