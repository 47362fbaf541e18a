use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::Messenger;

const SEND_TIMEOUT_SECS: u64 = 10;

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API 구현체
pub struct TelegramMessenger {
    client: reqwest::Client,
    api_base: String,
    token: String,
}

impl TelegramMessenger {
    pub fn new(api_base: &str, token: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEND_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base, self.token)
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        // URL에 토큰이 들어가므로 로그에는 남기지 않는다
        tracing::debug!("[telegram:sendMessage] >>> {}", request_summary(chat_id, text));
        let start = Instant::now();

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("telegram API unreachable: {}", e.without_url()))?;

        let status = response.status();
        let reply: Option<ApiReply> = response.json().await.ok();
        let elapsed = start.elapsed();

        match reply {
            Some(ApiReply { ok: true, .. }) if status.is_success() => {
                tracing::debug!("[telegram:sendMessage] <<< OK ({}ms)", elapsed.as_millis());
                Ok(())
            }
            other => {
                let description = other
                    .and_then(|r| r.description)
                    .unwrap_or_else(|| "no description".to_string());
                tracing::warn!(
                    "[telegram:sendMessage] <<< FAILED (status={}, {}ms): {description}",
                    status.as_u16(),
                    elapsed.as_millis()
                );
                anyhow::bail!(
                    "telegram sendMessage failed (status {}): {description}",
                    status.as_u16()
                )
            }
        }
    }
}

/// 요청 로그 한 줄. 본문 대신 글자 수만 남긴다.
fn request_summary(chat_id: &str, text: &str) -> String {
    format!("chat={chat_id} ({} chars)", text.chars().count())
}
