//! Gateway configuration.

use std::env;

use common::JwtConfig;
use listing_service_lib::config::ListingServiceConfig;

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Session token verification
    pub jwt: JwtConfig,
    /// Storage and super-admin settings for the embedded listing service
    pub service: ListingServiceConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env(),
            service: ListingServiceConfig::from_env(),
        }
    }
}
