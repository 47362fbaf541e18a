use anyhow::Result;

use crate::domain::models::{Homework, HomeworkStatus};

/// 과제 상태 변경 알림 문구
pub fn parse_status(homework: &Homework) -> Result<String> {
    let status: HomeworkStatus = homework.status.parse()?;
    Ok(format!(
        "Review status changed for \"{}\". {}",
        homework.homework_name,
        status.verdict()
    ))
}

/// 루프 에러 알림 문구
pub fn format_error_message(error: &str) -> String {
    format!("Bot failure: {error}")
}
