//! Process configuration (§6.4): CLI flags, then environment overrides,
//! mirroring the accrual system's own `config.go` precedence.

use clap::Parser;

const DEFAULT_RUN_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_WORKERS: usize = 10;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 1;
const DEFAULT_DB_POOL_SIZE: u32 = 10;
const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Parser)]
#[command(name = "loyalty-server", about = "Loyalty points backend")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(short = 'a', long = "address", env = "RUN_ADDRESS", default_value = DEFAULT_RUN_ADDRESS)]
    pub run_address: String,

    /// PostgreSQL connection string.
    #[arg(short = 'd', long = "database-uri", env = "DATABASE_URI")]
    pub database_uri: String,

    /// Base URL of the external accrual service.
    #[arg(short = 'r', long = "accrual-address", env = "ACCRUAL_SYSTEM_ADDRESS")]
    pub accrual_system_address: String,

    /// Number of accrual worker slots (§4.4).
    #[arg(long = "workers", env = "ACCRUAL_WORKERS", default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Poller interval in seconds (§4.5).
    #[arg(long = "poll-interval-secs", env = "ACCRUAL_POLL_INTERVAL_SECS", default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval_secs: u64,

    /// `sqlx` pool size.
    #[arg(long = "db-pool-size", env = "DB_POOL_SIZE", default_value_t = DEFAULT_DB_POOL_SIZE)]
    pub db_pool_size: u32,

    /// HMAC secret used to sign session JWTs.
    #[arg(long = "jwt-secret", env = "JWT_SECRET", default_value = DEFAULT_JWT_SECRET)]
    pub jwt_secret: String,
}

impl Config {
    pub fn load() -> Self {
        Config::parse()
    }
}
