//! Listing Service Library
//!
//! Storage for listings, proposals and messages, and the services that run
//! the domain authorization engine against it. Embedded by the gateway.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::ListingServiceConfig;
use crate::infra::Database;
use crate::service::{NotificationDispatcher, Services, TracingNotifier};

/// Connect to the database (applying migrations) and build all services.
pub async fn connect_services(
    config: &ListingServiceConfig,
) -> Result<(Database, Services), Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;
    let notifier: Arc<dyn NotificationDispatcher> = Arc::new(TracingNotifier);
    let services = Services::from_connection(db.get_connection(), notifier);
    Ok((db, services))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = ListingServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
