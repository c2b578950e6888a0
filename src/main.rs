use clap::Parser;
use std::net::{Ipv6Addr, SocketAddr};
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use no_as_a_service::config::{Args, LogFormat};
use no_as_a_service::rate_limit::{RateLimiter, sweeper};
use no_as_a_service::reasons::{FsReasonSource, ReasonStore};
use no_as_a_service::{AppState, build_router};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Text => registry.with(fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional, real environment variables win
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(args.log_format);

    let reasons = ReasonStore::new(FsReasonSource::new(&args.data_dir));
    if reasons.languages().is_empty() {
        warn!(data_dir = %args.data_dir.display(), "No reason files found");
    }
    if !reasons.is_supported(&args.default_language) {
        warn!(
            default_language = %args.default_language,
            "Default language has no reason file, requests without ?lang= will be rejected"
        );
    }

    let limiter = Arc::new(RateLimiter::new(args.rate_limit_max, args.rate_window()));

    if let Some(every) = args.sweep_interval() {
        tokio::spawn(sweeper(Arc::clone(&limiter), every));
    }

    info!(
        port = args.port,
        languages = %reasons.languages().join(","),
        default_language = %args.default_language,
        rate_limit = args.rate_limit_max.get(),
        rate_window_secs = args.rate_limit_window_seconds,
        trusted_proxies = ?args.trusted_proxies,
        "Starting no-as-a-service"
    );

    let state = Arc::new(AppState {
        reasons,
        limiter,
        default_language: args.default_language.clone(),
        trusted_proxies: args.trusted_proxies.clone(),
    });

    let app = build_router(state);

    // [::] accepts IPv4 too, so ::1 in the trusted proxy list stays meaningful
    let addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, args.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
