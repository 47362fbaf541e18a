use std::sync::Arc;

use homework_bot::client;
use homework_bot::config::models::BotConfig;
use homework_bot::daemon::status::{self, BotStatus, StatusCounters};
use homework_bot::daemon::{pid, PollOutcome, STATUS_FILENAME};
use homework_bot::infrastructure::practicum::MockHomeworkApi;
use homework_bot::infrastructure::telegram::MockMessenger;
use serde_json::json;
use tempfile::TempDir;

// ═══════════════════════════════════════════════
// 1. status 요약
// ═══════════════════════════════════════════════

#[test]
fn status_stopped_without_pid() {
    let tmp = TempDir::new().unwrap();
    assert_eq!(client::status(tmp.path()), "homework bot: stopped");
}

#[test]
fn status_running_without_status_file() {
    let tmp = TempDir::new().unwrap();
    pid::write_pid(tmp.path()).unwrap();

    let out = client::status(tmp.path());
    assert!(out.contains(&format!("running (pid: {})", std::process::id())));
    assert!(out.contains("no status reported yet"));
    assert!(out.contains("  started:   "));
}

#[test]
fn status_reads_legacy_single_line_pid_file() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("bot.pid"), std::process::id().to_string()).unwrap();

    let out = client::status(tmp.path());
    assert!(out.contains(&format!("running (pid: {})", std::process::id())));
    assert!(!out.contains("started:"));
}

#[test]
fn status_running_shows_counters_and_last_message() {
    let tmp = TempDir::new().unwrap();
    pid::write_pid(tmp.path()).unwrap();
    status::write_status(
        &tmp.path().join(STATUS_FILENAME),
        &BotStatus {
            updated_at: "2026-01-01T00:00:00+00:00".into(),
            uptime_secs: 1200,
            from_date: 1700000000,
            last_message: Some("Review status changed for \"hw\".".into()),
            last_error: Some("homework API unreachable".into()),
            counters: StatusCounters {
                polls: 3,
                notified: 1,
                unchanged: 1,
                empty: 0,
                failures: 1,
            },
        },
    );

    let out = client::status(tmp.path());
    assert!(out.contains("polls: 3 (notified: 1, unchanged: 1, empty: 0, failures: 1)"));
    assert!(out.contains("last message: Review status changed for \"hw\"."));
    assert!(out.contains("last error:   homework API unreachable"));
}

// ═══════════════════════════════════════════════
// 2. check (one-shot)
// ═══════════════════════════════════════════════

#[tokio::test]
async fn check_notifies_latest_status() {
    let api = Arc::new(MockHomeworkApi::new());
    let messenger = Arc::new(MockMessenger::new());
    api.push_ok(json!({
        "homeworks": [{"homework_name": "hw", "status": "rejected"}],
        "current_date": 10
    }));

    let outcome = client::check(&BotConfig::default(), api, messenger.clone(), "42")
        .await
        .unwrap();

    assert!(matches!(outcome, PollOutcome::Notified { .. }));
    assert_eq!(messenger.sent_texts().len(), 1);
}

#[tokio::test]
async fn check_propagates_api_errors() {
    let api = Arc::new(MockHomeworkApi::new());
    let messenger = Arc::new(MockMessenger::new());
    api.push_err("homework API unreachable");

    let err = client::check(&BotConfig::default(), api, messenger, "42")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unreachable"));
}
