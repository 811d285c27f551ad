//! Accrual client (C2): a single HTTP GET against the external accrual
//! service, classified into a `FetchResult`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccrualStatus {
    Registered,
    Processing,
    Invalid,
    Processed,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccrualRecord {
    #[allow(dead_code)]
    pub order: String,
    pub status: AccrualStatus,
    #[serde(default)]
    pub accrual: Option<i64>,
}

/// Response classification (§4.2). `RateLimited` carries the parsed
/// `Retry-After` duration; an unparseable header demotes to `TransportError`
/// rather than guessing a back-off window.
#[derive(Debug)]
pub enum FetchResult {
    Ready(AccrualRecord),
    NotRegistered,
    RateLimited(Duration),
    UpstreamError,
    Unknown { code: u16, body: String },
    TransportError(String),
}

#[async_trait]
pub trait AccrualClient: Send + Sync {
    async fn fetch(&self, order_id: &str) -> FetchResult;
}

pub struct HttpAccrualClient {
    http: Client,
    base_url: String,
}

impl HttpAccrualClient {
    pub fn new(base_url: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("reqwest client builds with static config");
        Self { http, base_url }
    }
}

#[async_trait]
impl AccrualClient for HttpAccrualClient {
    async fn fetch(&self, order_id: &str) -> FetchResult {
        let url = format!("{}/api/orders/{}", self.base_url, order_id);
        let response = match self.http.get(&url).send().await {
            Ok(response) => response,
            Err(e) => return FetchResult::TransportError(e.to_string()),
        };

        match response.status() {
            StatusCode::OK => match response.json::<AccrualRecord>().await {
                Ok(record) => FetchResult::Ready(record),
                Err(e) => FetchResult::TransportError(e.to_string()),
            },
            StatusCode::NO_CONTENT => FetchResult::NotRegistered,
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok());
                match retry_after {
                    Some(secs) => FetchResult::RateLimited(Duration::from_secs(secs)),
                    None => FetchResult::TransportError(
                        "429 response missing a parseable Retry-After header".to_string(),
                    ),
                }
            }
            StatusCode::INTERNAL_SERVER_ERROR => FetchResult::UpstreamError,
            other => {
                let code = other.as_u16();
                let body = response.text().await.unwrap_or_default();
                FetchResult::Unknown { code, body }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accrual_status_deserializes_from_upstream_vocabulary() {
        let record: AccrualRecord =
            serde_json::from_str(r#"{"order":"123","status":"PROCESSED","accrual":500}"#).unwrap();
        assert_eq!(record.status, AccrualStatus::Processed);
        assert_eq!(record.accrual, Some(500));
    }

    #[test]
    fn accrual_field_is_optional() {
        let record: AccrualRecord =
            serde_json::from_str(r#"{"order":"123","status":"REGISTERED"}"#).unwrap();
        assert_eq!(record.accrual, None);
    }
}
