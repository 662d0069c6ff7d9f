// src/main.rs

use comment_service::auth::JwtTokenStore;
use comment_service::config::Config;
use comment_service::routes;
use comment_service::state::AppState;
use comment_service::store::PgCommentStore;
use comment_service::utils::hash::hash_secret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CONNECT_ATTEMPTS: u32 = 5;

#[tokio::main]
async fn main() -> ExitCode {
    // `comment-service hash-secret <secret>` prints a KNOWN_APPS hash and exits.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [command, secret] = args.as_slice()
        && command == "hash-secret"
    {
        return match hash_secret(secret) {
            Ok(hash) => {
                println!("{}", hash);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to hash secret: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // Load configuration from environment (and .env if present)
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let file_appender = tracing_appender::rolling::daily("logs", "comment-service.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Comment service stopped: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect_with_retry(&config).await?;
    tracing::info!("Database connected...");

    // Run Migrations Automatically
    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    if config.known_apps.is_empty() {
        tracing::warn!("KNOWN_APPS is empty: no caller can obtain a token for mutating routes");
    }

    let store = PgCommentStore::new(pool, Duration::from_secs(config.store_timeout_secs));
    let tokens = JwtTokenStore::from_config(&config);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    let state = AppState::new(store, tokens, config);
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Comment service listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down gracefully");
    Ok(())
}

/// Initialize Database Pool with Retry
async fn connect_with_retry(config: &Config) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 0;
    loop {
        match PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => return Ok(pool),
            Err(e) => {
                attempt += 1;
                if attempt >= CONNECT_ATTEMPTS {
                    return Err(e);
                }
                tracing::warn!(
                    "Database not ready, retrying in 2s... (Attempt {}/{})",
                    attempt,
                    CONNECT_ATTEMPTS
                );
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
