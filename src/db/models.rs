//! Row types for the four persisted tables (§3, §6.5).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order lifecycle status. An order is *unfinished* while it is `New` or
/// `Processing`; `Invalid` and `Processed` are terminal (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "PROCESSING")]
    Processing,
    #[serde(rename = "INVALID")]
    Invalid,
    #[serde(rename = "PROCESSED")]
    Processed,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Invalid | OrderStatus::Processed)
    }

    pub fn as_db_str(self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Invalid => "INVALID",
            OrderStatus::Processed => "PROCESSED",
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEW" => Ok(OrderStatus::New),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "INVALID" => Ok(OrderStatus::Invalid),
            "PROCESSED" => Ok(OrderStatus::Processed),
            other => Err(format!("unrecognized order status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionType {
    Accrual,
    Withdrawal,
}

impl TransactionType {
    pub fn as_db_str(self) -> &'static str {
        match self {
            TransactionType::Accrual => "ACCRUAL",
            TransactionType::Withdrawal => "WITHDRAWAL",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACCRUAL" => Ok(TransactionType::Accrual),
            "WITHDRAWAL" => Ok(TransactionType::Withdrawal),
            other => Err(format!("unrecognized transaction type: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Account {
    pub user_login: String,
    pub balance: i64,
    pub withdrawn: i64,
}

#[derive(Debug, Clone)]
pub struct Order {
    pub id: String,
    pub user_login: String,
    pub status: OrderStatus,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub order_number: String,
    pub user_login: String,
    pub r#type: TransactionType,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}
