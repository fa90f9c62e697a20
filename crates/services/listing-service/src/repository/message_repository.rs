//! Message repository: thread-scoped message storage.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use super::entities::message::{self, Entity as MessageEntity};
use common::AppResult;
use domain::{Message, ThreadId};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Message repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// All messages in a thread, oldest first
    async fn list_thread(&self, thread: ThreadId) -> AppResult<Vec<Message>>;

    /// Append a message to its thread
    async fn append(&self, message: Message) -> AppResult<Message>;
}

/// Concrete implementation of MessageRepository
pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for MessageStore {
    async fn list_thread(&self, thread: ThreadId) -> AppResult<Vec<Message>> {
        let models = MessageEntity::find()
            .filter(message::Column::ListingId.eq(thread.listing_id))
            .filter(message::Column::VendorId.eq(thread.vendor_id))
            .order_by_asc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;

        models.into_iter().map(Message::try_from).collect()
    }

    async fn append(&self, message: Message) -> AppResult<Message> {
        let active_model = message::ActiveModel {
            id: Set(message.id),
            listing_id: Set(message.thread.listing_id),
            vendor_id: Set(message.thread.vendor_id),
            sender_id: Set(message.sender_id),
            sender_role: Set(message.sender_role.as_str().to_string()),
            content: Set(message.content),
            created_at: Set(message.created_at),
        };

        let model = active_model.insert(&self.db).await?;
        Message::try_from(model)
    }
}
