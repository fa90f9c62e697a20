//! Service Container - centralized service access.
//!
//! Wires the SeaORM stores into the service managers once at startup.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    ConversationManager, ConversationService, ListingManager, ListingService,
    NotificationDispatcher, ProposalManager, ProposalService,
};
use crate::repository::{ListingRepository, ListingStore, MessageRepository, MessageStore};

/// All application services, shareable across request handlers.
#[derive(Clone)]
pub struct Services {
    pub listings: Arc<dyn ListingService>,
    pub proposals: Arc<dyn ProposalService>,
    pub conversations: Arc<dyn ConversationService>,
}

impl Services {
    /// Create a service container from already-built services
    pub fn new(
        listings: Arc<dyn ListingService>,
        proposals: Arc<dyn ProposalService>,
        conversations: Arc<dyn ConversationService>,
    ) -> Self {
        Self {
            listings,
            proposals,
            conversations,
        }
    }

    /// Create service container from a database connection
    pub fn from_connection(
        db: DatabaseConnection,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        let listing_repo: Arc<dyn ListingRepository> = Arc::new(ListingStore::new(db.clone()));
        let message_repo: Arc<dyn MessageRepository> = Arc::new(MessageStore::new(db));

        Self::new(
            Arc::new(ListingManager::new(listing_repo.clone())),
            Arc::new(ProposalManager::new(listing_repo.clone(), notifier.clone())),
            Arc::new(ConversationManager::new(listing_repo, message_repo, notifier)),
        )
    }
}
