//! Service layer - runs the authorization engine against storage.

mod container;
mod conversation_service;
mod listing_service;
mod notifications;
mod proposal_service;

pub use container::Services;
pub use conversation_service::{ConversationManager, ConversationService, ThreadMessage};
pub use listing_service::{ListingManager, ListingService, ListingView};
pub use notifications::{NotificationDispatcher, TracingNotifier};
pub use proposal_service::{ProposalManager, ProposalService};

#[cfg(any(test, feature = "test-utils"))]
pub use notifications::MockNotificationDispatcher;
