//! Application state for dependency injection.

use std::sync::Arc;

use async_trait::async_trait;

use common::JwtConfig;
use domain::AdminPolicy;
use listing_service_lib::infra::Database;
use listing_service_lib::service::Services;

/// Something the health endpoint can ask "are you up?"
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Name reported in the health response
    fn name(&self) -> &'static str;

    async fn check(&self) -> Result<(), String>;
}

#[async_trait]
impl HealthProbe for Database {
    fn name(&self) -> &'static str {
        "database"
    }

    async fn check(&self) -> Result<(), String> {
        self.ping().await.map_err(|e| e.to_string())
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub admin: Arc<AdminPolicy>,
    pub jwt: JwtConfig,
    pub probe: Arc<dyn HealthProbe>,
}

impl AppState {
    /// Create new app state.
    pub fn new(
        services: Services,
        admin: AdminPolicy,
        jwt: JwtConfig,
        probe: Arc<dyn HealthProbe>,
    ) -> Self {
        Self {
            services,
            admin: Arc::new(admin),
            jwt,
            probe,
        }
    }
}
