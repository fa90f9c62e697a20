//! Proposal service - submission and owner decisions.
//!
//! The state machine runs against a fresh snapshot first; storage then
//! enforces uniqueness again, so a race between two submissions from the same
//! vendor still ends in exactly one proposal and one `DuplicateProposal`.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::lifecycle;
use domain::policy::{can_view_listing, visible_proposals};
use domain::{ActorContext, MarketplaceEvent, Proposal, ProposalDraft, ProposalStatus};

use crate::repository::ListingRepository;
use crate::service::NotificationDispatcher;

/// Proposal service trait for dependency injection.
#[async_trait]
pub trait ProposalService: Send + Sync {
    /// Submit the actor's proposal on a listing
    async fn submit_proposal(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        draft: ProposalDraft,
    ) -> AppResult<Proposal>;

    /// Accept or reject a vendor's pending proposal (listing owner only)
    async fn change_proposal_status(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        vendor_id: Uuid,
        status: ProposalStatus,
    ) -> AppResult<Proposal>;

    /// Proposals the actor may see on a listing
    async fn list_proposals(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
    ) -> AppResult<Vec<Proposal>>;
}

/// Concrete implementation of ProposalService.
pub struct ProposalManager {
    repo: Arc<dyn ListingRepository>,
    notifier: Arc<dyn NotificationDispatcher>,
}

impl ProposalManager {
    /// Create new proposal service instance
    pub fn new(
        repo: Arc<dyn ListingRepository>,
        notifier: Arc<dyn NotificationDispatcher>,
    ) -> Self {
        Self { repo, notifier }
    }
}

#[async_trait]
impl ProposalService for ProposalManager {
    async fn submit_proposal(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        draft: ProposalDraft,
    ) -> AppResult<Proposal> {
        let mut listing = self
            .repo
            .find_by_id(listing_id)
            .await?
            .ok_or_not_found("Listing")?;

        // Hidden listings take no bids
        if !can_view_listing(actor, &listing) {
            warn!(listing_id = %listing_id, "proposal submitted against a hidden listing");
            return Err(AppError::PermissionDenied);
        }

        let proposal = lifecycle::submit(actor, &mut listing, draft, Utc::now()).map_err(|e| {
            warn!(listing_id = %listing_id, error = %e, "proposal submission rejected");
            AppError::from(e)
        })?;

        self.repo.insert_proposal(proposal.clone()).await.map_err(|e| {
            if matches!(e, AppError::DuplicateProposal) {
                warn!(
                    listing_id = %listing_id,
                    vendor_id = %proposal.vendor_id,
                    "concurrent duplicate proposal"
                );
            }
            e
        })?;

        info!(listing_id = %listing_id, vendor_id = %proposal.vendor_id, "proposal submitted");
        self.notifier
            .dispatch(MarketplaceEvent::proposal_submitted(&listing, &proposal));

        Ok(proposal)
    }

    async fn change_proposal_status(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
        vendor_id: Uuid,
        status: ProposalStatus,
    ) -> AppResult<Proposal> {
        let mut listing = self
            .repo
            .find_by_id(listing_id)
            .await?
            .ok_or_not_found("Listing")?;

        let change =
            lifecycle::transition(actor, &mut listing, vendor_id, status).map_err(|e| {
                warn!(
                    listing_id = %listing_id,
                    vendor_id = %vendor_id,
                    error = %e,
                    "proposal transition rejected"
                );
                AppError::from(e)
            })?;

        let proposal = self
            .repo
            .update_proposal_status(listing_id, vendor_id, change.from, change.to)
            .await?;

        info!(
            listing_id = %listing_id,
            vendor_id = %vendor_id,
            from = %change.from,
            to = %change.to,
            "proposal status changed"
        );
        self.notifier
            .dispatch(MarketplaceEvent::proposal_status_changed(&change));

        Ok(proposal)
    }

    async fn list_proposals(
        &self,
        actor: &ActorContext,
        listing_id: Uuid,
    ) -> AppResult<Vec<Proposal>> {
        let listing = self
            .repo
            .find_by_id(listing_id)
            .await?
            .ok_or_not_found("Listing")?;

        if !can_view_listing(actor, &listing) {
            return Err(AppError::PermissionDenied);
        }

        Ok(visible_proposals(actor, &listing).into_iter().cloned().collect())
    }
}
