//! Proposal lifecycle state machine.
//!
//! `NONE -> pending -> {accepted, rejected}`. Nothing leaves `accepted` or
//! `rejected`, and a vendor never gets a second proposal on the same listing.
//!
//! Both operations act on an in-memory listing snapshot. Storage must repeat
//! the uniqueness check atomically (see the listing store), because two
//! concurrent submissions can both pass the snapshot check.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::actor::ActorContext;
use crate::error::{DomainError, DomainResult};
use crate::listing::Listing;
use crate::policy::{can_edit_or_delete, can_submit_proposal};
use crate::proposal::{Proposal, ProposalDraft, ProposalStatus};

/// Record of a status change, for persistence and notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub listing_id: Uuid,
    pub vendor_id: Uuid,
    pub from: ProposalStatus,
    pub to: ProposalStatus,
}

/// Submit a proposal on behalf of `actor`.
///
/// Preconditions are checked in order and the first failure wins:
/// permission, draft validation, then uniqueness. On success the proposal is
/// appended to the snapshot and the counter incremented.
pub fn submit(
    actor: &ActorContext,
    listing: &mut Listing,
    draft: ProposalDraft,
    now: DateTime<Utc>,
) -> DomainResult<Proposal> {
    if !can_submit_proposal(actor, listing) {
        return Err(DomainError::PermissionDenied);
    }
    let vendor_id = actor.identity.ok_or(DomainError::PermissionDenied)?;

    let draft = draft.normalize()?;

    if listing.proposal_from(vendor_id).is_some() {
        return Err(DomainError::DuplicateProposal);
    }

    let proposal = Proposal {
        listing_id: listing.id,
        vendor_id,
        vendor_name: draft.vendor_name,
        proposal_text: draft.text,
        proposed_price: draft.proposed_price,
        proposed_timeline: draft.proposed_timeline,
        status: ProposalStatus::Pending,
        submitted_at: now,
    };

    listing.proposals.push(proposal.clone());
    listing.proposals_count += 1;
    listing.updated_at = now;

    Ok(proposal)
}

/// Move a vendor's proposal to a new status. Owner (customer role) only.
pub fn transition(
    actor: &ActorContext,
    listing: &mut Listing,
    vendor_id: Uuid,
    next: ProposalStatus,
) -> DomainResult<StatusChange> {
    if !can_edit_or_delete(actor, listing) {
        return Err(DomainError::PermissionDenied);
    }

    let listing_id = listing.id;
    let proposal = listing
        .proposal_from_mut(vendor_id)
        .ok_or_else(|| DomainError::not_found("Proposal"))?;

    let from = proposal.status;
    if !from.can_transition_to(next) {
        return Err(DomainError::invalid_transition(format!(
            "proposal cannot move from {} to {}",
            from, next
        )));
    }
    proposal.status = next;

    Ok(StatusChange {
        listing_id,
        vendor_id,
        from,
        to: next,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{ActingRole, AdminPolicy, Role};
    use crate::listing::ListingStatus;

    const ADMIN_EMAIL: &str = "root@marketplace.test";

    fn policy() -> AdminPolicy {
        AdminPolicy::new([ADMIN_EMAIL], true)
    }

    fn customer(id: Uuid) -> ActorContext {
        policy().resolve(Some(id), "c@buyer.test", Role::Customer, None)
    }

    fn vendor(id: Uuid) -> ActorContext {
        policy().resolve(Some(id), "v@seller.test", Role::Vendor, None)
    }

    fn active_listing(owner: Uuid) -> Listing {
        Listing::new(
            Uuid::new_v4(),
            owner,
            "Roof repair".to_string(),
            "Leaking in two places".to_string(),
            ListingStatus::Active,
        )
    }

    fn draft(text_len: usize) -> ProposalDraft {
        ProposalDraft {
            vendor_name: "Top Roofing".to_string(),
            text: "r".repeat(text_len),
            proposed_price: Some("4200".to_string()),
            proposed_timeline: None,
        }
    }

    #[test]
    fn test_vendor_submits_on_customer_listing() {
        let owner = Uuid::new_v4();
        let v = Uuid::new_v4();
        let mut l = active_listing(owner);

        let proposal = submit(&vendor(v), &mut l, draft(80), Utc::now()).unwrap();

        assert_eq!(proposal.status, ProposalStatus::Pending);
        assert_eq!(proposal.vendor_id, v);
        assert_eq!(l.proposals_count, 1);
        assert_eq!(l.proposals.len(), 1);
        assert!(matches!(
            submit(&customer(owner), &mut l, draft(80), Utc::now()),
            Err(DomainError::PermissionDenied)
        ));
    }

    #[test]
    fn test_second_submit_is_duplicate_and_changes_nothing() {
        let v = Uuid::new_v4();
        let mut l = active_listing(Uuid::new_v4());
        submit(&vendor(v), &mut l, draft(80), Utc::now()).unwrap();

        let second = submit(&vendor(v), &mut l, draft(90), Utc::now());

        assert_eq!(second, Err(DomainError::DuplicateProposal));
        assert_eq!(l.proposals.len(), 1);
        assert_eq!(l.proposals_count, 1);
    }

    #[test]
    fn test_precondition_order_permission_then_validation_then_duplicate() {
        let v = Uuid::new_v4();
        let mut l = active_listing(Uuid::new_v4());
        submit(&vendor(v), &mut l, draft(80), Utc::now()).unwrap();

        // short text on a duplicate reports validation first
        assert!(matches!(
            submit(&vendor(v), &mut l, draft(10), Utc::now()),
            Err(DomainError::Validation(_))
        ));

        l.status = ListingStatus::Completed;
        assert_eq!(
            submit(&vendor(v), &mut l, draft(10), Utc::now()),
            Err(DomainError::PermissionDenied)
        );
    }

    #[test]
    fn test_completed_listing_blocks_new_vendor() {
        let mut l = active_listing(Uuid::new_v4());
        l.status = ListingStatus::Completed;
        assert_eq!(
            submit(&vendor(Uuid::new_v4()), &mut l, draft(80), Utc::now()),
            Err(DomainError::PermissionDenied)
        );
        assert_eq!(l.proposals_count, 0);
    }

    #[test]
    fn test_admin_fallback_submits() {
        let mut l = active_listing(Uuid::new_v4());
        let admin = policy().resolve(Some(Uuid::new_v4()), ADMIN_EMAIL, Role::Unset, None);
        assert!(submit(&admin, &mut l, draft(50), Utc::now()).is_ok());
    }

    #[test]
    fn test_owner_accepts_pending_proposal() {
        let owner = Uuid::new_v4();
        let v = Uuid::new_v4();
        let mut l = active_listing(owner);
        submit(&vendor(v), &mut l, draft(80), Utc::now()).unwrap();

        let change = transition(&customer(owner), &mut l, v, ProposalStatus::Accepted).unwrap();

        assert_eq!(change.from, ProposalStatus::Pending);
        assert_eq!(change.to, ProposalStatus::Accepted);
        assert_eq!(l.proposal_from(v).map(|p| p.status), Some(ProposalStatus::Accepted));
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        let owner = Uuid::new_v4();
        let v = Uuid::new_v4();
        let mut l = active_listing(owner);
        submit(&vendor(v), &mut l, draft(80), Utc::now()).unwrap();
        transition(&customer(owner), &mut l, v, ProposalStatus::Rejected).unwrap();

        for next in [ProposalStatus::Accepted, ProposalStatus::Pending, ProposalStatus::Rejected] {
            assert!(matches!(
                transition(&customer(owner), &mut l, v, next),
                Err(DomainError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn test_only_owner_in_customer_role_transitions() {
        let owner = Uuid::new_v4();
        let v = Uuid::new_v4();
        let mut l = active_listing(owner);
        submit(&vendor(v), &mut l, draft(80), Utc::now()).unwrap();

        assert_eq!(
            transition(&vendor(v), &mut l, v, ProposalStatus::Accepted),
            Err(DomainError::PermissionDenied)
        );
        let owner_as_vendor = policy().resolve(
            Some(owner),
            ADMIN_EMAIL,
            Role::Customer,
            Some(ActingRole::Vendor),
        );
        assert_eq!(
            transition(&owner_as_vendor, &mut l, v, ProposalStatus::Accepted),
            Err(DomainError::PermissionDenied)
        );
    }

    #[test]
    fn test_transition_missing_proposal() {
        let owner = Uuid::new_v4();
        let mut l = active_listing(owner);
        assert!(matches!(
            transition(&customer(owner), &mut l, Uuid::new_v4(), ProposalStatus::Accepted),
            Err(DomainError::NotFound(_))
        ));
    }
}
