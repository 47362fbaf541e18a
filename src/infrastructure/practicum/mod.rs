pub mod mock;
pub mod real;

use anyhow::Result;
use async_trait::async_trait;

pub use mock::MockHomeworkApi;
pub use real::RealHomeworkApi;

/// 과제 상태 API 추상화
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    /// `GET {endpoint}?from_date={from_date}` — 디코딩된 JSON 본문 반환.
    /// 전송 실패, 200 이외 응답, JSON 디코딩 실패는 모두 Err.
    async fn homework_statuses(&self, from_date: i64) -> Result<serde_json::Value>;
}
