//! Conversation binding.
//!
//! A thread is the conversation between a listing's owner and one vendor who
//! holds a proposal on it, keyed by `(listing_id, vendor_id)`. Only those two
//! identities may read or post, whatever role anyone else is acting as.
//!
//! # Message direction is role-based
//!
//! [`classify`] marks a message as sent when its `sender_role` equals the
//! viewer's *effective role*, not when the viewer wrote it. A super-admin
//! acting as a vendor therefore sees every vendor-side message in a thread as
//! outgoing, including ones composed by someone else in an earlier session.
//! This is the one place where acting-as changes how past data is displayed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::actor::{ActingRole, ActorContext};
use crate::constants::{MAX_MESSAGE_LENGTH, THREAD_ID_SEPARATOR};
use crate::error::{DomainError, DomainResult};
use crate::listing::Listing;
use crate::policy::can_message;

/// Stable composite key for a (listing, vendor) thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadId {
    pub listing_id: Uuid,
    pub vendor_id: Uuid,
}

impl ThreadId {
    pub fn new(listing_id: Uuid, vendor_id: Uuid) -> Self {
        Self {
            listing_id,
            vendor_id,
        }
    }

    /// String form used to correlate messages without a join table
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for ThreadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.listing_id, THREAD_ID_SEPARATOR, self.vendor_id)
    }
}

impl std::str::FromStr for ThreadId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (listing, vendor) = s
            .split_once(THREAD_ID_SEPARATOR)
            .ok_or_else(|| DomainError::validation("Malformed thread id"))?;
        let listing_id =
            Uuid::parse_str(listing).map_err(|_| DomainError::validation("Malformed thread id"))?;
        let vendor_id =
            Uuid::parse_str(vendor).map_err(|_| DomainError::validation("Malformed thread id"))?;
        Ok(Self::new(listing_id, vendor_id))
    }
}

/// Derive the thread key for a (listing, vendor) pair
pub fn thread_id(listing_id: Uuid, vendor_id: Uuid) -> String {
    ThreadId::new(listing_id, vendor_id).key()
}

/// Message domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub thread: ThreadId,
    pub sender_id: Uuid,
    /// Effective role of the sender when the message was written
    pub sender_role: ActingRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// How a message renders for the current viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Sent,
    Received,
}

/// Sent iff the message's sender role is the viewer's effective role.
pub fn classify(actor: &ActorContext, message: &Message) -> MessageDirection {
    if actor.effective_role.as_acting() == Some(message.sender_role) {
        MessageDirection::Sent
    } else {
        MessageDirection::Received
    }
}

/// A thread bound to its two participants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thread {
    pub id: ThreadId,
    pub owner_id: Uuid,
    pub vendor_id: Uuid,
}

impl Thread {
    /// Bind a thread to a listing snapshot.
    ///
    /// The vendor must hold a proposal on the listing. Closing the listing
    /// does not close its threads.
    pub fn bind(listing: &Listing, vendor_id: Uuid) -> DomainResult<Self> {
        if listing.proposal_from(vendor_id).is_none() {
            return Err(DomainError::not_found("Thread"));
        }
        Ok(Self {
            id: ThreadId::new(listing.id, vendor_id),
            owner_id: listing.owner_id,
            vendor_id,
        })
    }

    pub fn is_participant(&self, actor: &ActorContext) -> bool {
        actor.is(self.owner_id) || actor.is(self.vendor_id)
    }

    /// Reject anyone but the owner and the named vendor
    pub fn authorize(&self, actor: &ActorContext, listing: &Listing) -> DomainResult<()> {
        if self.is_participant(actor) && can_message(actor, listing, self.vendor_id) {
            Ok(())
        } else {
            Err(DomainError::PermissionDenied)
        }
    }

    /// Build a message from a participant.
    ///
    /// The sender role is stamped from the actor's effective role, which must
    /// be customer or vendor.
    pub fn compose(
        &self,
        actor: &ActorContext,
        listing: &Listing,
        content: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Message> {
        self.authorize(actor, listing)?;
        let sender_id = actor.identity.ok_or(DomainError::PermissionDenied)?;
        let sender_role = actor
            .effective_role
            .as_acting()
            .ok_or(DomainError::PermissionDenied)?;

        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::validation("Message cannot be empty"));
        }
        if content.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(DomainError::validation(format!(
                "Message must be at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        Ok(Message {
            id: Uuid::new_v4(),
            thread: self.id,
            sender_id,
            sender_role,
            content: content.to_string(),
            created_at: now,
        })
    }

    /// The participant on the other side of the thread from `sender_id`
    pub fn counterpart_of(&self, sender_id: Uuid) -> Uuid {
        if sender_id == self.owner_id {
            self.vendor_id
        } else {
            self.owner_id
        }
    }
}
