use std::path::Path;

use serde::{Deserialize, Serialize};

use super::PollState;

// ─── Status file models ───

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotStatus {
    pub updated_at: String,
    pub uptime_secs: u64,
    pub from_date: i64,
    pub last_message: Option<String>,
    pub last_error: Option<String>,
    pub counters: StatusCounters,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StatusCounters {
    pub polls: u64,
    pub notified: u64,
    pub unchanged: u64,
    pub empty: u64,
    pub failures: u64,
}

// ─── Build / Write / Read ───

/// 인메모리 폴링 상태를 BotStatus로 변환
pub fn build_status(
    state: &PollState,
    counters: &StatusCounters,
    start_time: std::time::Instant,
) -> BotStatus {
    BotStatus {
        updated_at: chrono::Local::now().to_rfc3339(),
        uptime_secs: start_time.elapsed().as_secs(),
        from_date: state.from_date,
        last_message: state.last_message.clone(),
        last_error: state.last_error.clone(),
        counters: counters.clone(),
    }
}

/// Atomic write: tmp → rename
pub fn write_status(path: &Path, status: &BotStatus) {
    let json = match serde_json::to_string_pretty(status) {
        Ok(j) => j,
        Err(e) => {
            tracing::warn!("failed to serialize status: {e}");
            return;
        }
    };

    let tmp = path.with_extension("tmp");
    if let Err(e) = std::fs::write(&tmp, &json) {
        tracing::warn!("failed to write status tmp file: {e}");
        return;
    }
    if let Err(e) = std::fs::rename(&tmp, path) {
        tracing::warn!("failed to rename status file: {e}");
    }
}

/// status file 읽기 (없거나 파싱 실패 시 None)
pub fn read_status(path: &Path) -> Option<BotStatus> {
    let data = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&data).ok()
}

/// 종료 시 status file 삭제
pub fn remove_status(path: &Path) {
    let _ = std::fs::remove_file(path);
}
