//! Loyalty points backend.
//!
//! # Modules
//!
//! - [`luhn`] - order-id checksum validation (C1)
//! - [`accrual`] - the accrual pipeline: client, back-off gate, worker pool,
//!   poller, result sink, lifecycle controller (C2-C9)
//! - [`balance`] - balance service: get/submit/withdraw (C7)
//! - [`db`] - datastore connection and repositories (§3, §6.5)
//! - [`user_auth`] - registration, login, session-token middleware
//! - [`http`] - the axum HTTP surface (C10)
//! - [`config`] - process configuration (§6.4)
//! - [`logging`] - `tracing-subscriber` setup

pub mod accrual;
pub mod balance;
pub mod config;
pub mod db;
pub mod http;
pub mod logging;
pub mod luhn;
pub mod user_auth;
