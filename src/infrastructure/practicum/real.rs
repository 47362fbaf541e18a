use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;

use super::HomeworkApi;

/// reqwest 기반 과제 상태 API 클라이언트
pub struct RealHomeworkApi {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl RealHomeworkApi {
    /// `timeout_secs`가 0이면 모든 요청이 즉시 타임아웃되므로 최소 1초로 둔다
    pub fn new(endpoint: &str, token: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .user_agent("homework-bot")
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl HomeworkApi for RealHomeworkApi {
    async fn homework_statuses(&self, from_date: i64) -> Result<serde_json::Value> {
        tracing::debug!(
            "[practicum:statuses] >>> GET {} from_date={from_date}",
            self.endpoint
        );
        let start = Instant::now();

        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .context("homework API unreachable")?;

        let elapsed = start.elapsed();
        let status = response.status();

        if status != StatusCode::OK {
            tracing::warn!(
                "[practicum:statuses] <<< FAILED (status={}, {}ms)",
                status.as_u16(),
                elapsed.as_millis()
            );
            anyhow::bail!(
                "homework API {} returned unexpected status {}",
                self.endpoint,
                status.as_u16()
            );
        }

        let bytes = response
            .bytes()
            .await
            .context("failed to read homework API response")?;
        tracing::debug!(
            "[practicum:statuses] <<< OK ({}ms, {} bytes)",
            elapsed.as_millis(),
            bytes.len()
        );

        serde_json::from_slice(&bytes).context("failed to decode homework API response")
    }
}
