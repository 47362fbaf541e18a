use crate::infrastructure::telegram::Messenger;

/// 채팅 알림 전송 — Messenger trait 주입받아 동작
pub struct Notifier<'a> {
    messenger: &'a dyn Messenger,
    chat_id: &'a str,
}

impl<'a> Notifier<'a> {
    pub fn new(messenger: &'a dyn Messenger, chat_id: &'a str) -> Self {
        Self { messenger, chat_id }
    }

    /// 메시지 전송 (best effort). 성공 여부만 반환한다.
    pub async fn send(&self, text: &str) -> bool {
        match self.messenger.send_message(self.chat_id, text).await {
            Ok(()) => {
                tracing::debug!("message sent to chat {}", self.chat_id);
                true
            }
            Err(e) => {
                tracing::error!("failed to send message: {e:#}");
                false
            }
        }
    }
}
