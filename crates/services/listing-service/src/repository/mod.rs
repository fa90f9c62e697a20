//! Repository layer for data access.

pub mod entities;
mod listing_repository;
mod message_repository;

pub use listing_repository::{ListingRepository, ListingStore};
pub use message_repository::{MessageRepository, MessageStore};

#[cfg(any(test, feature = "test-utils"))]
pub use listing_repository::MockListingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use message_repository::MockMessageRepository;
