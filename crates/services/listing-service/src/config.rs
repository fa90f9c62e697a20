//! Listing service configuration.

use common::{AdminConfig, DatabaseConfig};

/// Listing service configuration.
#[derive(Debug, Clone, Default)]
pub struct ListingServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Who counts as a super-admin
    pub admin: AdminConfig,
}

impl ListingServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            database: DatabaseConfig::from_env(),
            admin: AdminConfig::from_env(),
        }
    }
}
