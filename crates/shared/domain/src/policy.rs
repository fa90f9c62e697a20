//! Visibility policy.
//!
//! Every "may this actor do X to this listing" question is answered here and
//! nowhere else. All checks are pure predicates over an already-fetched
//! snapshot; callers that mutate must turn a `false` into
//! [`DomainError::PermissionDenied`](crate::DomainError::PermissionDenied)
//! before touching storage.
//!
//! When an actor is both the literal owner and, through an override, acting
//! as a vendor, the override wins: ownership never brings back a permission
//! the effective role has switched off.

use serde::Serialize;
use uuid::Uuid;

use crate::actor::{ActorContext, Role};
use crate::listing::{Listing, ListingStatus};
use crate::proposal::Proposal;

/// Owner acting as a customer
pub fn can_edit_or_delete(actor: &ActorContext, listing: &Listing) -> bool {
    actor.is(listing.owner_id) && actor.effective_role == Role::Customer
}

/// Drafts are private to their owner (and super-admins); everything else is public.
pub fn can_view_listing(actor: &ActorContext, listing: &Listing) -> bool {
    listing.status != ListingStatus::Draft
        || actor.is_super_admin
        || can_edit_or_delete(actor, listing)
}

/// Authenticated customers may post listings
pub fn can_create_listing(actor: &ActorContext) -> bool {
    actor.is_authenticated() && actor.effective_role == Role::Customer
}

/// Check every submission precondition that depends on who is asking.
///
/// Does not look for an existing proposal; see [`has_proposed`].
pub fn can_submit_proposal(actor: &ActorContext, listing: &Listing) -> bool {
    actor.is_authenticated()
        && !actor.is(listing.owner_id)
        && listing.status.accepts_proposals()
        && actor.can_act_as_vendor()
}

/// Owner in the customer role sees every proposal
pub fn can_view_all_proposals(actor: &ActorContext, listing: &Listing) -> bool {
    actor.effective_role == Role::Customer && actor.is(listing.owner_id)
}

/// Only the listing owner and the named vendor take part in a thread
pub fn can_message(actor: &ActorContext, listing: &Listing, vendor_id: Uuid) -> bool {
    actor.is(listing.owner_id) || actor.is(vendor_id)
}

/// Whether the actor already holds a proposal on this listing
pub fn has_proposed(actor: &ActorContext, listing: &Listing) -> bool {
    actor
        .identity
        .is_some_and(|id| listing.proposal_from(id).is_some())
}

/// Proposals this actor may see: all of them for the owner, else only their own.
pub fn visible_proposals<'a>(actor: &ActorContext, listing: &'a Listing) -> Vec<&'a Proposal> {
    if can_view_all_proposals(actor, listing) {
        return listing.proposals.iter().collect();
    }
    match actor.identity {
        Some(id) => listing.proposals.iter().filter(|p| p.vendor_id == id).collect(),
        None => Vec::new(),
    }
}

/// Every listing-level permission evaluated once, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ListingPermissions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_submit_proposal: bool,
    pub can_view_all_proposals: bool,
    pub has_proposed: bool,
}

impl ListingPermissions {
    pub fn evaluate(actor: &ActorContext, listing: &Listing) -> Self {
        let can_edit = can_edit_or_delete(actor, listing);
        let has_proposed = has_proposed(actor, listing);
        Self {
            can_view: can_view_listing(actor, listing),
            can_edit,
            can_delete: can_edit,
            can_submit_proposal: can_submit_proposal(actor, listing) && !has_proposed,
            can_view_all_proposals: can_view_all_proposals(actor, listing),
            has_proposed,
        }
    }
}
