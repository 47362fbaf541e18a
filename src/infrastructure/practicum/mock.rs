use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use super::HomeworkApi;

/// 테스트용 HomeworkApi 구현체 — 큐에 넣어 둔 응답을 순서대로 반환
#[derive(Default)]
pub struct MockHomeworkApi {
    responses: Mutex<VecDeque<Result<serde_json::Value, String>>>,
    /// 요청된 from_date 기록
    pub requested: Mutex<Vec<i64>>,
}

impl MockHomeworkApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 정상 응답 추가
    pub fn push_ok(&self, body: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    /// 실패 응답 추가
    pub fn push_err(&self, message: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
    }
}

#[async_trait]
impl HomeworkApi for MockHomeworkApi {
    async fn homework_statuses(&self, from_date: i64) -> Result<serde_json::Value> {
        self.requested.lock().unwrap().push(from_date);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(msg)) => Err(anyhow::anyhow!(msg)),
            None => Err(anyhow::anyhow!("no mock response queued")),
        }
    }
}
