//! Conversation service - reading and posting thread messages.

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::policy::can_message;
use domain::{classify, ActorContext, Listing, MarketplaceEvent, Message, MessageDirection, Thread};

use crate::repository::{ListingRepository, MessageRepository};
use crate::service::NotificationDispatcher;

/// A message paired with how it renders for the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ThreadMessage {
    #[serde(flatten)]
    pub message: Message,
    pub direction: MessageDirection,
}

/// Conversation service trait for dependency injection.
#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Messages in the (listing, vendor) thread, oldest first
    async fn list_messages(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        vendor_id: Uuid,
    ) -> AppResult<Vec<ThreadMessage>>;

    /// Post into the (listing, vendor) thread
    async fn send_message(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        vendor_id: Uuid,
        content: String,
    ) -> AppResult<ThreadMessage>;
}

/// Concrete implementation of ConversationService.
pub struct ConversationManager {
    listings: Arc<dyn ListingRepository>,
    messages: Arc<dyn MessageRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl ConversationManager {
    /// Create new conversation service instance
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        messages: Arc<dyn MessageRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self {
            listings,
            messages,
            notifier,
        }
    }

    /// Load the listing and bind the thread, rejecting outsiders before
    /// revealing whether the thread exists.
    async fn open_thread(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        vendor_id: Uuid,
    ) -> AppResult<(Listing, Thread)> {
        let listing = self
            .listings
            .find_by_id(listing_id)
            .await?
            .ok_or_not_found("Listing")?;

        if !can_message(actor, &listing, vendor_id) {
            warn!(listing_id = %listing_id, vendor_id = %vendor_id, "thread access denied");
            return Err(AppError::PermissionDenied);
        }

        let thread = Thread::bind(&listing, vendor_id)?;
        Ok((listing, thread))
    }
}

#[async_trait]
impl ConversationService for ConversationManager {
    async fn list_messages(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        vendor_id: Uuid,
    ) -> AppResult<Vec<ThreadMessage>> {
        let (listing, thread) = self.open_thread(actor, listing_id, vendor_id).await?;
        thread.authorize(actor, &listing)?;

        let messages = self.messages.list_thread(thread.id).await?;
        Ok(messages
            .into_iter()
            .map(|message| ThreadMessage {
                direction: classify(actor, &message),
                message,
            })
            .collect())
    }

    async fn send_message(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        vendor_id: Uuid,
        content: String,
    ) -> AppResult<ThreadMessage> {
        let (listing, thread) = self.open_thread(actor, listing_id, vendor_id).await?;
        let message = thread.compose(actor, &listing, &content, Utc::now())?;

        let message = self.messages.append(message).await?;

        info!(thread = %thread.id, message_id = %message.id, "message sent");
        self.notifier
            .dispatch(MarketplaceEvent::message_sent(&thread, &message));

        Ok(ThreadMessage {
            direction: classify(actor, &message),
            message,
        })
    }
}
