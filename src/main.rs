use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};

use homework_bot::config::{self, loader, Env, RealEnv};
use homework_bot::infrastructure::practicum::{HomeworkApi, RealHomeworkApi};
use homework_bot::infrastructure::telegram::{Messenger, TelegramMessenger};
use homework_bot::{client, daemon};

#[derive(Parser)]
#[command(
    name = "homework-bot",
    version,
    about = "과제 리뷰 상태 변경 → Telegram 알림 봇"
)]
struct Cli {
    /// 글로벌 설정을 덮어쓸 .homework-bot.yaml이 있는 디렉토리
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 폴링 루프 시작 (포그라운드)
    Start,
    /// 실행 중인 봇 중지
    Stop,
    /// 상태 요약 출력
    Status,
    /// 한 번만 poll 하고 결과 출력
    Check,
    /// 설정 관리
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// 현재 설정 표시 (글로벌 + 디렉토리 설정 머지 결과)
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dotenv_path = config::load_dotenv();
    let env = RealEnv;
    let home = config::bot_home(&env)?;
    std::fs::create_dir_all(&home)?;

    let cfg = loader::load_merged(&env, cli.config_dir.as_deref());

    // _guard must live until main() returns to flush non-blocking writer
    let _guard = if matches!(cli.command, Commands::Start) {
        let log_dir = config::resolve_log_dir(&cfg.daemon.log_dir, &home);
        std::fs::create_dir_all(&log_dir)?;

        let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix(daemon::log::LOG_PREFIX)
            .filename_suffix("log")
            .build(&log_dir)
            .expect("failed to create log appender");

        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        use tracing_subscriber::layer::SubscriberExt;
        use tracing_subscriber::util::SubscriberInitExt;

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("homework_bot=info".parse()?),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();

        Some(guard)
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::from_default_env()
                    .add_directive("homework_bot=info".parse()?),
            )
            .init();
        None
    };

    if let Some(path) = dotenv_path {
        tracing::debug!("loaded environment from {}", path.display());
    }

    match cli.command {
        Commands::Start => {
            let (api, messenger, chat_id) = connect(&env, &cfg)?;
            daemon::start(&home, &cfg, api, messenger, &chat_id).await?;
        }
        Commands::Stop => daemon::stop(&home)?,
        Commands::Status => println!("{}", client::status(&home)),
        Commands::Check => {
            let (api, messenger, chat_id) = connect(&env, &cfg)?;
            let outcome = client::check(&cfg, api, messenger, &chat_id).await?;
            println!("{outcome}");
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => print!("{}", client::config_show(&env, &cfg)?),
        },
    }

    Ok(())
}

/// 필수 토큰 확인 후 프로덕션 클라이언트 생성
fn connect(
    env: &dyn Env,
    cfg: &config::models::BotConfig,
) -> Result<(Arc<dyn HomeworkApi>, Arc<dyn Messenger>, String)> {
    let secrets = config::check_tokens(env).inspect_err(|e| tracing::error!("{e}"))?;

    let api: Arc<dyn HomeworkApi> = Arc::new(RealHomeworkApi::new(
        &cfg.poll.endpoint,
        &secrets.practicum_token,
        cfg.poll.request_timeout_secs,
    )?);
    let messenger: Arc<dyn Messenger> = Arc::new(TelegramMessenger::new(
        &cfg.telegram.api_base,
        &secrets.telegram_token,
    )?);
    Ok((api, messenger, secrets.chat_id))
}
