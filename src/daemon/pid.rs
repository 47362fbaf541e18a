use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use chrono::{DateTime, Local};

const PID_FILENAME: &str = "bot.pid";

/// `bot.pid` 내용: 1행 pid, 2행 시작 시각 (RFC 3339)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PidRecord {
    pub pid: u32,
    pub started_at: Option<DateTime<Local>>,
}

impl PidRecord {
    fn current() -> Self {
        Self {
            pid: std::process::id(),
            started_at: Some(Local::now()),
        }
    }

    fn render(&self) -> String {
        match &self.started_at {
            Some(at) => format!("{}\n{}\n", self.pid, at.to_rfc3339()),
            None => format!("{}\n", self.pid),
        }
    }

    /// 시작 시각 행이 없거나 깨져 있어도 pid만 읽히면 유효
    fn parse(content: &str) -> Option<Self> {
        let mut lines = content.lines();
        let pid = lines.next()?.trim().parse().ok()?;
        let started_at = lines
            .next()
            .and_then(|l| DateTime::parse_from_rfc3339(l.trim()).ok())
            .map(|at| at.with_timezone(&Local));
        Some(Self { pid, started_at })
    }
}

/// `stop`이 보낸 SIGTERM의 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Signalled,
    /// 프로세스가 이미 없음 (stale pid 파일)
    NotRunning,
}

fn pid_path(home: &Path) -> PathBuf {
    home.join(PID_FILENAME)
}

/// 현재 프로세스의 pid와 시작 시각을 기록한다
pub fn write_pid(home: &Path) -> Result<()> {
    std::fs::create_dir_all(home)?;
    std::fs::write(pid_path(home), PidRecord::current().render())?;
    Ok(())
}

pub fn read_record(home: &Path) -> Option<PidRecord> {
    PidRecord::parse(&std::fs::read_to_string(pid_path(home)).ok()?)
}

pub fn read_pid(home: &Path) -> Option<u32> {
    read_record(home).map(|r| r.pid)
}

/// pid 파일이 살아있는 프로세스를 가리키는지
pub fn is_running(home: &Path) -> bool {
    read_pid(home).is_some_and(process_exists)
}

#[cfg(unix)]
fn process_exists(pid: u32) -> bool {
    let Ok(pid) = i32::try_from(pid) else {
        return false;
    };
    if unsafe { libc::kill(pid, 0) } == 0 {
        return true;
    }
    // EPERM: 프로세스는 있지만 다른 사용자 소유
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn process_exists(pid: u32) -> bool {
    Path::new(&format!("/proc/{pid}")).exists()
}

/// SIGTERM 전송. ESRCH는 `NotRunning`, 그 외 실패는 Err.
#[cfg(unix)]
pub fn terminate(pid: u32) -> Result<Termination> {
    let Ok(raw) = i32::try_from(pid) else {
        return Ok(Termination::NotRunning);
    };
    if raw <= 0 {
        bail!("refusing to signal pid {pid}");
    }
    if unsafe { libc::kill(raw, libc::SIGTERM) } == 0 {
        return Ok(Termination::Signalled);
    }
    let err = std::io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ESRCH) {
        return Ok(Termination::NotRunning);
    }
    bail!("failed to signal bot (pid: {pid}): {err}")
}

#[cfg(not(unix))]
pub fn terminate(pid: u32) -> Result<Termination> {
    bail!("stopping the bot (pid: {pid}) is only supported on unix")
}

pub fn remove_pid(home: &Path) {
    let _ = std::fs::remove_file(pid_path(home));
}
