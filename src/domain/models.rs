use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use serde::{Deserialize, Serialize};

// ─── Homework ───

/// API가 돌려주는 과제 한 건 (필요한 필드만)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Homework {
    pub homework_name: String,
    pub status: String,
}

/// 검증을 통과한 API 응답
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusReport {
    /// 최신 항목이 먼저 온다
    pub homeworks: Vec<Homework>,
    pub current_date: Option<i64>,
}

impl StatusReport {
    pub fn latest(&self) -> Option<&Homework> {
        self.homeworks.first()
    }
}

// ─── HomeworkStatus ───

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    /// 상태별 고정 판정 문구
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "The work has been checked: the reviewer liked everything. Hooray!",
            Self::Reviewing => "The work has been taken for review.",
            Self::Rejected => "The work has been checked: the reviewer has comments.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approved => write!(f, "approved"),
            Self::Reviewing => write!(f, "reviewing"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for HomeworkStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => bail!("unknown homework status '{other}'"),
        }
    }
}
