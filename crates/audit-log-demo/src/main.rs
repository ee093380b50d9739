use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use audit_log_axum::audit_log;
use audit_log_core::interceptor::RequestInterceptor;
use audit_log_core::registry::Registry;
use audit_log_core::settings::{AuditLogSettings, SETTINGS_ENV};
use axum::Router;
use axum::middleware as axum_mw;
use axum::routing::get;
use tower_http::catch_panic::CatchPanicLayer;
use tracing_subscriber::EnvFilter;

mod routes;
mod users;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging; audit records land on the `audit_log` target.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let settings = match env::var(SETTINGS_ENV) {
        Ok(json) => AuditLogSettings::from_json(&json)?,
        Err(_) => AuditLogSettings::default(),
    };
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);

    let mut registry = Registry::with_builtins();
    registry.register_user_resolver("users.from_headers", users::from_headers);

    let interceptor = Arc::new(RequestInterceptor::new(settings, &registry)?);

    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/items", get(routes::list_items))
        .route("/items/{id}", get(routes::get_item))
        .route("/admin", get(routes::admin))
        .route("/panic", get(routes::explode))
        // Panics become 500s inside the audit layer, so the response is recorded.
        .layer(CatchPanicLayer::new())
        .layer(axum_mw::from_fn_with_state(interceptor, audit_log));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
