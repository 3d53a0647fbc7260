use eyre::Result;
use tracing_subscriber::EnvFilter;

use slidechat_server::config;
use slidechat_server::routes;
use slidechat_server::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let env = |key: &str| std::env::var(key).ok();

    let path = config::config_path()?;
    let mut config = config::load_or_init_config(&path)?;
    config.apply_env(env);

    let state = AppState::from_config(&config, env).await?;
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        data_dir = %config.data_dir.display(),
        downloads_dir = %config.downloads_dir.display(),
        "slidechat listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("slidechat stopped");
    Ok(())
}

/// `RUST_LOG` filter (default `info`); JSON lines when
/// `SLIDECHAT_LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("SLIDECHAT_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
