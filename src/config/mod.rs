pub mod loader;
pub mod models;

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

/// 환경 변수 접근을 추상화하는 트레이트 (테스트 격리를 위해 사용)
pub trait Env: Send + Sync {
    fn var(&self, key: &str) -> Result<String, std::env::VarError>;
}

/// 실제 환경 변수를 사용하는 구현체
pub struct RealEnv;

impl Env for RealEnv {
    fn var(&self, key: &str) -> Result<String, std::env::VarError> {
        std::env::var(key)
    }
}

/// 작업 디렉토리의 `.env`를 프로세스 환경에 로드한다.
/// 이미 설정된 변수는 덮어쓰지 않는다. 로드한 파일 경로를 반환.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}

// ─── Secrets ───

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

/// 봇 실행에 필요한 세 가지 비밀 값
#[derive(Clone)]
pub struct Secrets {
    pub practicum_token: String,
    pub telegram_token: String,
    pub chat_id: String,
}

impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// 필수 환경 변수를 모두 읽는다. 하나라도 비어 있으면 누락된 이름을 모두 나열한 에러.
/// `TELEGRAM_TOKEN`/`TELEGRAM_CHAT_ID`는 레거시 이름 `TOKEN`/`CHAT_ID`도 받는다.
pub fn check_tokens(env: &dyn Env) -> Result<Secrets> {
    let practicum_token = read_secret(env, PRACTICUM_TOKEN, None);
    let telegram_token = read_secret(env, TELEGRAM_TOKEN, Some("TOKEN"));
    let chat_id = read_secret(env, TELEGRAM_CHAT_ID, Some("CHAT_ID"));

    match (practicum_token, telegram_token, chat_id) {
        (Some(practicum_token), Some(telegram_token), Some(chat_id)) => Ok(Secrets {
            practicum_token,
            telegram_token,
            chat_id,
        }),
        (p, t, c) => {
            let missing: Vec<&str> = [
                (PRACTICUM_TOKEN, p.is_none()),
                (TELEGRAM_TOKEN, t.is_none()),
                (TELEGRAM_CHAT_ID, c.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, absent)| absent.then_some(key))
            .collect();
            bail!(
                "missing required environment variables: {}",
                missing.join(", ")
            )
        }
    }
}

fn read_secret(env: &dyn Env, key: &str, alias: Option<&str>) -> Option<String> {
    let non_blank = |k: &str| {
        env.var(k)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };
    non_blank(key).or_else(|| alias.and_then(non_blank))
}

// ─── Paths ───

/// ~/.homework-bot 경로 반환
pub fn bot_home(env: &dyn Env) -> Result<PathBuf> {
    if let Ok(home) = env.var("HOMEWORK_BOT_HOME") {
        return Ok(PathBuf::from(home));
    }
    let home = env
        .var("HOME")
        .map_err(|_| anyhow::anyhow!("neither HOMEWORK_BOT_HOME nor HOME is set"))?;
    Ok(Path::new(&home).join(".homework-bot"))
}

/// 로그 디렉토리 경로 해석: 절대 경로면 그대로, 상대 경로면 home 기준
pub fn resolve_log_dir(log_dir: &str, home: &Path) -> PathBuf {
    let path = Path::new(log_dir);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        home.join(log_dir)
    }
}
