//! Domain layer - marketplace entities and the authorization engine.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//!
//! - [`actor`]: resolves who is acting, and as which role
//! - [`policy`]: visibility and permission predicates over a listing snapshot
//! - [`lifecycle`]: proposal submission and status transitions
//! - [`conversation`]: thread keys, participant checks, message direction

pub mod actor;
pub mod constants;
pub mod conversation;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod listing;
pub mod policy;
pub mod proposal;

pub use actor::{ActingRole, ActorContext, AdminPolicy, Role};
pub use constants::*;
pub use conversation::{classify, thread_id, Message, MessageDirection, Thread, ThreadId};
pub use error::{DomainError, DomainResult};
pub use events::MarketplaceEvent;
pub use lifecycle::StatusChange;
pub use listing::{Listing, ListingStatus, NewListing};
pub use policy::ListingPermissions;
pub use proposal::{Proposal, ProposalDraft, ProposalStatus};
