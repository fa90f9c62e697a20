//! Marketplace events handed to the notification dispatcher.
//!
//! The engine only describes what happened and who should hear about it;
//! delivery belongs to the dispatcher.

use serde::Serialize;
use uuid::Uuid;

use crate::conversation::{Message, Thread, ThreadId};
use crate::lifecycle::StatusChange;
use crate::listing::Listing;
use crate::proposal::{Proposal, ProposalStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MarketplaceEvent {
    /// A vendor bid on a listing; the owner is told
    ProposalSubmitted {
        listing_id: Uuid,
        vendor_id: Uuid,
        recipient_id: Uuid,
    },
    /// The owner decided on a proposal; the vendor is told
    ProposalStatusChanged {
        listing_id: Uuid,
        recipient_id: Uuid,
        status: ProposalStatus,
    },
    /// New message in a thread; the other participant is told
    MessageSent {
        thread: ThreadId,
        message_id: Uuid,
        recipient_id: Uuid,
    },
}

impl MarketplaceEvent {
    pub fn proposal_submitted(listing: &Listing, proposal: &Proposal) -> Self {
        MarketplaceEvent::ProposalSubmitted {
            listing_id: listing.id,
            vendor_id: proposal.vendor_id,
            recipient_id: listing.owner_id,
        }
    }

    pub fn proposal_status_changed(change: &StatusChange) -> Self {
        MarketplaceEvent::ProposalStatusChanged {
            listing_id: change.listing_id,
            recipient_id: change.vendor_id,
            status: change.to,
        }
    }

    pub fn message_sent(thread: &Thread, message: &Message) -> Self {
        MarketplaceEvent::MessageSent {
            thread: thread.id,
            message_id: message.id,
            recipient_id: thread.counterpart_of(message.sender_id),
        }
    }

    /// Identity the notification is addressed to
    pub fn recipient(&self) -> Uuid {
        match self {
            MarketplaceEvent::ProposalSubmitted { recipient_id, .. }
            | MarketplaceEvent::ProposalStatusChanged { recipient_id, .. }
            | MarketplaceEvent::MessageSent { recipient_id, .. } => *recipient_id,
        }
    }

    /// Short event name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            MarketplaceEvent::ProposalSubmitted { .. } => "proposal_submitted",
            MarketplaceEvent::ProposalStatusChanged { .. } => "proposal_status_changed",
            MarketplaceEvent::MessageSent { .. } => "message_sent",
        }
    }
}
