//! petal-daemon entry point.
//!
//! Thin: sets up tracing, loads and gates the field set, wires middleware,
//! and starts the HTTP server. Handlers live in `routes.rs`.

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use petal_daemon::{routes, state};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let loaded = load_field_set()?;
    let report = petal_config::validate_field_set(&loaded.fields);
    for issue in report.warnings() {
        warn!(field_id = %issue.field_id, code = issue.code, "{}", issue.message);
    }
    petal_config::require_publishable(&report).context("refusing to serve field set")?;
    info!(
        config_hash = %loaded.config_hash,
        fields = loaded.fields.len(),
        "field set loaded"
    );

    let shared = Arc::new(state::AppState::new(loaded.into()));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_localhost_only());

    let addr = bind_addr_from_env().unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8787)));
    info!("petal-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .await
        .context("server crashed")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// `PETAL_FIELDS` is a comma-separated list of YAML layers applied over the
/// embedded defaults. `petal preview` layers its `--fields` the same way.
fn load_field_set() -> anyhow::Result<petal_config::LoadedFieldSet> {
    let raw = std::env::var("PETAL_FIELDS").unwrap_or_default();
    let paths: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    petal_config::load_with_defaults(&paths).with_context(|| format!("PETAL_FIELDS={raw}"))
}

fn bind_addr_from_env() -> Option<SocketAddr> {
    std::env::var("PETAL_DAEMON_ADDR").ok()?.parse().ok()
}

/// CORS: allow only localhost origins.
fn cors_localhost_only() -> CorsLayer {
    let allowed_origins = [
        "http://localhost",
        "http://127.0.0.1",
        "http://localhost:3000",
        "http://127.0.0.1:3000",
        "http://localhost:5173",
        "http://127.0.0.1:5173",
    ];

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(tower_http::cors::Any)
}
