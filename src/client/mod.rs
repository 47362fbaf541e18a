use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use crate::config::models::BotConfig;
use crate::config::{loader, Env};
use crate::daemon::{self, pid, status, Daemon, PollOutcome};
use crate::infrastructure::practicum::HomeworkApi;
use crate::infrastructure::telegram::Messenger;

/// 상태 요약 (pid + status file 기반)
pub fn status(home: &Path) -> String {
    let Some(record) = pid::read_record(home).filter(|_| pid::is_running(home)) else {
        return "homework bot: stopped".to_string();
    };

    let mut out = format!("homework bot: running (pid: {})\n", record.pid);
    if let Some(at) = record.started_at {
        out.push_str(&format!("  started:   {}\n", at.to_rfc3339()));
    }
    match status::read_status(&home.join(daemon::STATUS_FILENAME)) {
        Some(st) => {
            out.push_str(&format!("  updated:   {}\n", st.updated_at));
            out.push_str(&format!("  uptime:    {}s\n", st.uptime_secs));
            out.push_str(&format!("  from_date: {}\n", st.from_date));
            out.push_str(&format!(
                "  polls: {} (notified: {}, unchanged: {}, empty: {}, failures: {})\n",
                st.counters.polls,
                st.counters.notified,
                st.counters.unchanged,
                st.counters.empty,
                st.counters.failures
            ));
            if let Some(msg) = st.last_message {
                out.push_str(&format!("  last message: {msg}\n"));
            }
            if let Some(err) = st.last_error {
                out.push_str(&format!("  last error:   {err}\n"));
            }
        }
        None => out.push_str("  no status reported yet\n"),
    }
    out
}

/// 머지된 설정을 YAML로 출력 (글로벌 설정 파일 경로를 주석으로 포함)
pub fn config_show(env: &dyn Env, cfg: &BotConfig) -> Result<String> {
    let global = loader::global_config_path(env);
    Ok(format!(
        "# global config: {}\n{}",
        global.display(),
        serde_yaml::to_string(cfg)?
    ))
}

/// 새 상태로 한 번만 poll (자격 증명 확인용)
pub async fn check(
    cfg: &BotConfig,
    api: Arc<dyn HomeworkApi>,
    messenger: Arc<dyn Messenger>,
    chat_id: &str,
) -> Result<PollOutcome> {
    let mut daemon = Daemon::new(api, messenger, chat_id, cfg);
    daemon.poll_once().await
}
