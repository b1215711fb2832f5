use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use datus::api::{ApiClient, ClearSessionOnReject};
use datus::cli::{CliArgs, Command, ProfileAction};
use datus::commands::{self, AppState};
use datus::config::AppConfig;
use datus::routes::RouteGuard;
use datus::session::SessionStore;
use datus::storage::Database;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    let config = AppConfig::load(&args.resolve_config_path());

    // 로깅 초기화 (콘솔 + 파일)
    let log_dir = dirs::config_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("com.datus.app")
        .join("logs");
    let _ = std::fs::create_dir_all(&log_dir);

    let file_appender = tracing_appender::rolling::daily(&log_dir, "datus.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let level = args
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "info".to_string());

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_target(true)
                .with_writer(non_blocking),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .init();

    let db = match Database::init().await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            eprintln!("Failed to initialize local storage: {}", e);
            std::process::exit(1);
        }
    };

    let session = SessionStore::new(db.clone());
    let api_url = args.resolve_api_url(config.api_base_url.as_deref());
    let timeout = Duration::from_secs(config.request_timeout_secs.unwrap_or(30));
    tracing::debug!("Using API at {}", api_url);

    let api = ApiClient::new(api_url, session.clone(), timeout);
    // The one auth-rejection policy: a 401/403 clears the session, after
    // which the route guard redirects to login.
    api.register_observer(Arc::new(ClearSessionOnReject::new(session.clone())))
        .await;

    let guard = RouteGuard::new(session);
    let state = AppState { db, api, guard };

    let result = match args.command {
        Command::Login {
            username,
            password,
            remember_me,
        } => commands::login(&state, username, password, remember_me).await,
        Command::Register {
            email,
            username,
            password,
        } => commands::register(&state, email, username, password).await,
        Command::Logout => commands::logout(&state).await,
        Command::Upload { file } => commands::upload(&state, &file).await,
        Command::Summary { id } => commands::summary(&state, id).await,
        Command::Stats => commands::stats(&state).await,
        Command::Data => commands::data(&state).await,
        Command::Profile { action } => match action {
            ProfileAction::Show => commands::profile_show(&state).await,
            ProfileAction::Update {
                first_name,
                last_name,
                company_name,
                gender,
                mobile_number,
                picture,
            } => {
                commands::profile_update(
                    &state,
                    first_name,
                    last_name,
                    company_name,
                    gender,
                    mobile_number,
                    picture.as_deref(),
                )
                .await
            }
        },
        Command::History { limit } => commands::history(&state, limit).await,
        Command::Status => commands::status(&state).await,
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {:#}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
