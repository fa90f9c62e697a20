//! Route configuration.

use axum::{middleware, Router};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{health_routes, listing_routes, message_routes, proposal_routes};
use crate::middleware::session_middleware;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let marketplace = listing_routes()
        .merge(proposal_routes())
        .merge(message_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            session_middleware,
        ));

    Router::new()
        // Health check (no session)
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Anonymous callers get through; handlers decide what they may do
        .nest("/listings", marketplace)
        .with_state(state)
}
