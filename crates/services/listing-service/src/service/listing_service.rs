//! Listing service - creation, status changes, and permission-aware reads.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::policy::{can_create_listing, can_edit_or_delete, can_view_listing, visible_proposals};
use domain::{ActorContext, Listing, ListingPermissions, ListingStatus, NewListing};

use crate::repository::ListingRepository;

/// A listing as one actor is allowed to see it.
#[derive(Debug, Clone)]
pub struct ListingView {
    /// Proposals already narrowed to what the actor may see
    pub listing: Listing,
    pub permissions: ListingPermissions,
}

/// Listing service trait for dependency injection.
#[async_trait]
pub trait ListingService: Send + Sync {
    /// Create a listing owned by the acting customer
    async fn create_listing(&self, actor: &ActorContext, input: NewListing) -> AppResult<Listing>;

    /// Fetch a listing for display; counts a view unless the owner is looking
    async fn get_listing(&self, actor: &ActorContext, id: Uuid) -> AppResult<ListingView>;

    /// Owner-only status change
    async fn change_status(
        &self,
        actor: &ActorContext,
        id: Uuid,
        status: ListingStatus,
    ) -> AppResult<Listing>;
}

/// Concrete implementation of ListingService using repository.
pub struct ListingManager {
    repo: Arc<dyn ListingRepository>,
}

impl ListingManager {
    /// Create new listing service instance with repository
    pub fn new(repo: Arc<dyn ListingRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ListingService for ListingManager {
    async fn create_listing(&self, actor: &ActorContext, input: NewListing) -> AppResult<Listing> {
        if !can_create_listing(actor) {
            warn!(role = %actor.effective_role, "listing creation denied");
            return Err(AppError::PermissionDenied);
        }
        let owner_id = actor.identity.ok_or(AppError::Unauthorized)?;
        input.validate()?;

        let listing = Listing::new(
            Uuid::new_v4(),
            owner_id,
            input.title.trim().to_string(),
            input.description.trim().to_string(),
            input.initial_status(),
        );
        let listing = self.repo.create(listing).await?;

        info!(listing_id = %listing.id, owner_id = %owner_id, "listing created");
        Ok(listing)
    }

    async fn get_listing(&self, actor: &ActorContext, id: Uuid) -> AppResult<ListingView> {
        let mut listing = self.repo.find_by_id(id).await?.ok_or_not_found("Listing")?;

        if !can_view_listing(actor, &listing) {
            return Err(AppError::PermissionDenied);
        }

        if !actor.is(listing.owner_id) {
            self.repo.increment_views(id).await?;
            listing.views_count += 1;
        }

        let permissions = ListingPermissions::evaluate(actor, &listing);
        debug!(listing_id = %id, ?permissions, "listing permissions evaluated");

        let visible = visible_proposals(actor, &listing)
            .into_iter()
            .cloned()
            .collect();
        listing.proposals = visible;

        Ok(ListingView {
            listing,
            permissions,
        })
    }

    async fn change_status(
        &self,
        actor: &ActorContext,
        id: Uuid,
        status: ListingStatus,
    ) -> AppResult<Listing> {
        let mut listing = self.repo.find_by_id(id).await?.ok_or_not_found("Listing")?;

        if !can_edit_or_delete(actor, &listing) {
            warn!(listing_id = %id, "listing status change denied");
            return Err(AppError::PermissionDenied);
        }

        let from = listing.status;
        listing.change_status(status)?;
        let listing = self.repo.update_status(id, status).await?;

        info!(listing_id = %id, %from, to = %status, "listing status changed");
        Ok(listing)
    }
}
