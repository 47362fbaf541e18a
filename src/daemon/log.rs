use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use tracing::{info, warn};

/// 롤링 로그 파일 접두사 (`bot.YYYY-MM-DD.log`)
pub const LOG_PREFIX: &str = "bot";

/// 보존 기간이 지난 롤링 로그를 지운다. 삭제 건수를 반환.
/// `retention_days == 0`이면 아무것도 지우지 않는다.
pub fn cleanup_old_logs(log_dir: &Path, retention_days: u32) -> u32 {
    let today = chrono::Local::now().date_naive();
    let mut deleted = 0;
    for path in expired_logs(log_dir, retention_days, today) {
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("deleted old log: {}", path.display());
                deleted += 1;
            }
            Err(e) => warn!("failed to delete old log {}: {e}", path.display()),
        }
    }
    deleted
}

/// `today - retention_days`보다 오래된 날짜의 로그 파일
fn expired_logs(log_dir: &Path, retention_days: u32, today: NaiveDate) -> Vec<PathBuf> {
    if retention_days == 0 {
        return Vec::new();
    }
    let Some(cutoff) = today.checked_sub_days(Days::new(u64::from(retention_days))) else {
        return Vec::new();
    };
    let Ok(entries) = std::fs::read_dir(log_dir) else {
        return Vec::new();
    };

    let mut expired: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| log_date(p).is_some_and(|d| d < cutoff))
        .collect();
    expired.sort();
    expired
}

/// `bot.2026-02-20.log` → 2026-02-20
fn log_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let date = name
        .strip_prefix(LOG_PREFIX)?
        .strip_prefix('.')?
        .strip_suffix(".log")?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
