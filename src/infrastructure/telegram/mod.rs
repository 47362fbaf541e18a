pub mod mock;
pub mod real;

use anyhow::Result;
use async_trait::async_trait;

pub use mock::MockMessenger;
pub use real::TelegramMessenger;

/// 채팅 봇 메시지 전송 추상화
#[async_trait]
pub trait Messenger: Send + Sync {
    /// `sendMessage` — 실패 시 Err (API description 포함)
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}
