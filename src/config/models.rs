use serde::{Deserialize, Serialize};

/// .homework-bot.yaml의 전체 스키마
/// 글로벌(~/) + 디렉토리별 오버라이드를 딥머지하여 최종 설정 생성
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BotConfig {
    pub poll: PollConfig,
    pub telegram: TelegramConfig,
    pub daemon: DaemonConfig,
}

impl BotConfig {
    /// 0초 주기/타임아웃은 1초로 올린다 (tokio interval과 reqwest timeout 모두 0을 허용하지 않음)
    pub fn sanitized(mut self) -> Self {
        for (name, secs) in [
            ("poll.retry_period_secs", &mut self.poll.retry_period_secs),
            ("poll.request_timeout_secs", &mut self.poll.request_timeout_secs),
        ] {
            if *secs == 0 {
                tracing::warn!("{name} must be at least 1 second, using 1");
                *secs = 1;
            }
        }
        self
    }
}

/// 과제 상태 API 폴링 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    pub endpoint: String,
    pub retry_period_secs: u64,
    pub request_timeout_secs: u64,
    /// 최초 조회 시 `from_date` (unix seconds)
    pub from_date: i64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://practicum.yandex.ru/api/user_api/homework_statuses/".into(),
            retry_period_secs: 600,
            request_timeout_secs: 10,
            from_date: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub api_base: String,
    /// 루프 에러를 채팅에도 보낼지 (같은 메시지는 한 번만)
    pub notify_errors: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".into(),
            notify_errors: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    pub log_dir: String,
    pub log_retention_days: u32,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".into(),
            log_retention_days: 30,
        }
    }
}
