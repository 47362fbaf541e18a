pub mod log;
pub mod pid;
pub mod status;

use std::collections::HashSet;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

use crate::components::notifier::Notifier;
use crate::components::{validator, verdict};
use crate::config::models::BotConfig;
use crate::config::resolve_log_dir;
use crate::infrastructure::practicum::HomeworkApi;
use crate::infrastructure::telegram::Messenger;

use self::status::StatusCounters;

pub const STATUS_FILENAME: &str = "bot.status.json";

// ─── Poll state ───

/// 반복 사이에 유지되는 폴링 상태
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollState {
    /// 다음 요청의 `from_date`
    pub from_date: i64,
    /// 마지막으로 전송에 성공한 알림
    pub last_message: Option<String>,
    /// 마지막 반복 에러 (성공하면 비워진다)
    pub last_error: Option<String>,
}

impl PollState {
    pub fn starting_at(from_date: i64) -> Self {
        Self {
            from_date,
            ..Default::default()
        }
    }
}

/// 한 번의 poll → validate → notify 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// 빈 homeworks 리스트
    NoUpdates,
    /// 마지막 알림과 같은 상태
    Unchanged { message: String },
    /// 새 상태를 전송함
    Notified { message: String },
    /// 새 상태지만 전송 실패 → 다음 반복에서 재시도
    SendFailed { message: String },
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoUpdates => write!(f, "no new statuses"),
            Self::Unchanged { message } => write!(f, "unchanged: {message}"),
            Self::Notified { message } => write!(f, "notified: {message}"),
            Self::SendFailed { message } => write!(f, "send failed: {message}"),
        }
    }
}

// ─── Daemon ───

/// 폴링 루프를 관리하는 구조체.
///
/// `HomeworkApi`와 `Messenger`를 trait으로 주입받아 테스트에서 mock으로 교체한다.
pub struct Daemon {
    api: Arc<dyn HomeworkApi>,
    messenger: Arc<dyn Messenger>,
    chat_id: String,
    state: PollState,
    counters: StatusCounters,
    retry_period: Duration,
    notify_errors: bool,
    /// 마지막 성공 이후 채팅으로 이미 보낸 에러
    reported_errors: HashSet<String>,
    status_path: Option<PathBuf>,
}

impl Daemon {
    pub fn new(
        api: Arc<dyn HomeworkApi>,
        messenger: Arc<dyn Messenger>,
        chat_id: &str,
        cfg: &BotConfig,
    ) -> Self {
        Self {
            api,
            messenger,
            chat_id: chat_id.to_string(),
            state: PollState::starting_at(cfg.poll.from_date),
            counters: StatusCounters::default(),
            retry_period: Duration::from_secs(cfg.poll.retry_period_secs.max(1)),
            notify_errors: cfg.telegram.notify_errors,
            reported_errors: HashSet::new(),
            status_path: None,
        }
    }

    /// 매 반복 후 status file을 기록할 경로
    pub fn with_status_path(mut self, path: PathBuf) -> Self {
        self.status_path = Some(path);
        self
    }

    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period;
        self
    }

    pub fn state(&self) -> &PollState {
        &self.state
    }

    pub fn counters(&self) -> &StatusCounters {
        &self.counters
    }

    /// poll → validate → notify 한 번 실행
    pub async fn poll_once(&mut self) -> Result<PollOutcome> {
        let body = self.api.homework_statuses(self.state.from_date).await?;
        let report = validator::check_response(body)?;

        let outcome = match report.latest() {
            None => {
                debug!("no new statuses since {}", self.state.from_date);
                PollOutcome::NoUpdates
            }
            Some(homework) => {
                let message = verdict::parse_status(homework)?;
                if self.state.last_message.as_deref() == Some(message.as_str()) {
                    debug!("status unchanged for \"{}\"", homework.homework_name);
                    PollOutcome::Unchanged { message }
                } else {
                    let notifier = Notifier::new(&*self.messenger, &self.chat_id);
                    if notifier.send(&message).await {
                        info!("status changed: {message}");
                        self.state.last_message = Some(message.clone());
                        PollOutcome::Notified { message }
                    } else {
                        PollOutcome::SendFailed { message }
                    }
                }
            }
        };

        // 전송 실패 시 같은 구간을 다시 조회해야 하므로 커서를 유지한다
        if !matches!(outcome, PollOutcome::SendFailed { .. }) {
            self.state.from_date = report
                .current_date
                .unwrap_or_else(|| chrono::Utc::now().timestamp());
        }

        Ok(outcome)
    }

    /// 에러를 삼키는 한 번의 반복. 루프는 절대 중단되지 않는다.
    pub async fn iterate(&mut self) {
        self.counters.polls += 1;

        match self.poll_once().await {
            Ok(PollOutcome::SendFailed { message }) => {
                // 알림이 전달되지 않은 반복은 성공으로 보지 않는다
                self.counters.failures += 1;
                self.state.last_error = Some(format!("notification not delivered: {message}"));
            }
            Ok(PollOutcome::NoUpdates) => self.succeeded(|c| c.empty += 1),
            Ok(PollOutcome::Unchanged { .. }) => self.succeeded(|c| c.unchanged += 1),
            Ok(PollOutcome::Notified { .. }) => self.succeeded(|c| c.notified += 1),
            Err(e) => {
                let msg = format!("{e:#}");
                error!("poll iteration failed: {msg}");
                self.counters.failures += 1;
                self.report_error(msg).await;
            }
        }
    }

    fn succeeded(&mut self, bump: impl FnOnce(&mut StatusCounters)) {
        bump(&mut self.counters);
        self.state.last_error = None;
        self.reported_errors.clear();
    }

    /// 성공 전까지 같은 에러는 한 번만 채팅으로 보낸다.
    /// 전송에 실패한 에러는 다음 반복에서 다시 시도한다.
    async fn report_error(&mut self, msg: String) {
        if self.notify_errors && !self.reported_errors.contains(&msg) {
            let notifier = Notifier::new(&*self.messenger, &self.chat_id);
            if notifier.send(&verdict::format_error_message(&msg)).await {
                self.reported_errors.insert(msg.clone());
            }
        }
        self.state.last_error = Some(msg);
    }

    /// SIGINT까지 폴링 루프 실행
    pub async fn run(&mut self) {
        self.run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("failed to listen for SIGINT: {e}");
                std::future::pending::<()>().await;
            }
            info!("received SIGINT, shutting down...");
        })
        .await;
    }

    /// `shutdown`이 완료될 때까지 폴링 루프 실행. 첫 poll은 즉시 실행된다.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let start_time = std::time::Instant::now();
        let mut tick = tokio::time::interval(self.retry_period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    self.iterate().await;
                    if let Some(path) = &self.status_path {
                        let st = status::build_status(&self.state, &self.counters, start_time);
                        status::write_status(path, &st);
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        if let Some(path) = &self.status_path {
            status::remove_status(path);
        }
    }
}

// ─── Entry points ───

/// 폴링 루프를 포그라운드로 시작
pub async fn start(
    home: &Path,
    cfg: &BotConfig,
    api: Arc<dyn HomeworkApi>,
    messenger: Arc<dyn Messenger>,
    chat_id: &str,
) -> Result<()> {
    if pid::is_running(home) {
        bail!(
            "bot is already running (pid: {})",
            pid::read_pid(home).unwrap_or(0)
        );
    }

    info!("starting homework bot...");
    pid::write_pid(home)?;

    let log_dir = resolve_log_dir(&cfg.daemon.log_dir, home);
    let n = log::cleanup_old_logs(&log_dir, cfg.daemon.log_retention_days);
    if n > 0 {
        info!("startup log cleanup: deleted {n} old log files");
    }

    println!("homework bot started (pid: {})", std::process::id());
    info!(
        "poll loop starting (retry_period={}s, from_date={})",
        cfg.poll.retry_period_secs, cfg.poll.from_date
    );

    let mut daemon =
        Daemon::new(api, messenger, chat_id, cfg).with_status_path(home.join(STATUS_FILENAME));
    daemon.run().await;

    pid::remove_pid(home);
    Ok(())
}

/// 실행 중인 봇에 SIGTERM을 보낸다.
///
/// 신호 전달에 실패하면 (EPERM 등) pid/status 파일을 남겨 둔 채 Err.
/// 프로세스가 이미 없으면 남은 파일만 정리한다.
pub fn stop(home: &Path) -> Result<()> {
    let record = pid::read_record(home).ok_or_else(|| anyhow::anyhow!("bot is not running"))?;

    let summary = match pid::terminate(record.pid)? {
        pid::Termination::Signalled => format!("homework bot stopped (pid: {})", record.pid),
        pid::Termination::NotRunning => format!(
            "homework bot was not running; removed stale pid file (pid: {})",
            record.pid
        ),
    };

    pid::remove_pid(home);
    status::remove_status(&home.join(STATUS_FILENAME));
    println!("{summary}");
    Ok(())
}
