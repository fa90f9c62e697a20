//! API Gateway Library
//!
//! HTTP surface of the marketplace: resolves the actor for each request and
//! hands it to the embedded listing services.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Connect storage, build services, and serve HTTP until shutdown.
pub async fn run_server(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (db, services) = listing_service_lib::connect_services(&config.service).await?;

    let admin = config.service.admin.policy();
    info!(
        super_admins = config.service.admin.super_admin_emails.len(),
        vendor_fallback = admin.vendor_fallback(),
        "admin policy loaded"
    );

    let state = AppState::new(services, admin, config.jwt.clone(), Arc::new(db));

    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
