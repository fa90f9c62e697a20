//! Listing repository: listings and the proposals embedded in them.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use super::entities::listing::{self, Entity as ListingEntity};
use super::entities::proposal::{self, Entity as ProposalEntity};
use common::{AppError, AppResult};
use domain::{Listing, ListingStatus, Proposal, ProposalStatus};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Listing repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Find listing by ID with its proposals in submission order
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>>;

    /// Persist a freshly built listing
    async fn create(&self, listing: Listing) -> AppResult<Listing>;

    /// Overwrite listing status
    async fn update_status(&self, id: Uuid, status: ListingStatus) -> AppResult<Listing>;

    /// Bump the view counter
    async fn increment_views(&self, id: Uuid) -> AppResult<()>;

    /// Insert a proposal if none exists for its (listing, vendor) pair and
    /// bump the listing's proposal counter, atomically.
    ///
    /// Fails with `DuplicateProposal` when the pair is already taken.
    async fn insert_proposal(&self, proposal: Proposal) -> AppResult<()>;

    /// Move a proposal from `from` to `to`, only if it is still in `from`
    async fn update_proposal_status(
        &self,
        listing_id: Uuid,
        vendor_id: Uuid,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> AppResult<Proposal>;
}

/// Concrete implementation of ListingRepository
pub struct ListingStore {
    db: DatabaseConnection,
}

impl ListingStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_proposal(
        &self,
        listing_id: Uuid,
        vendor_id: Uuid,
    ) -> AppResult<Option<proposal::Model>> {
        ProposalEntity::find()
            .filter(proposal::Column::ListingId.eq(listing_id))
            .filter(proposal::Column::VendorId.eq(vendor_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }
}

fn map_proposal_insert_error(err: DbErr) -> AppError {
    proposal_insert_error(err.sql_err(), err)
}

/// A unique violation on proposals means the (listing, vendor) pair is taken.
fn proposal_insert_error(sql_err: Option<SqlErr>, err: DbErr) -> AppError {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::DuplicateProposal,
        _ => AppError::from(err),
    }
}

#[async_trait]
impl ListingRepository for ListingStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Listing>> {
        let Some(model) = ListingEntity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let proposals = ProposalEntity::find()
            .filter(proposal::Column::ListingId.eq(id))
            .order_by_asc(proposal::Column::SubmittedAt)
            .all(&self.db)
            .await?;

        model.into_domain(proposals).map(Some)
    }

    async fn create(&self, listing: Listing) -> AppResult<Listing> {
        let active_model = listing::ActiveModel {
            id: Set(listing.id),
            owner_id: Set(listing.owner_id),
            title: Set(listing.title),
            description: Set(listing.description),
            status: Set(listing.status.as_str().to_string()),
            proposals_count: Set(0),
            views_count: Set(0),
            created_at: Set(listing.created_at),
            updated_at: Set(listing.updated_at),
        };

        let model = active_model.insert(&self.db).await?;
        model.into_domain(Vec::new())
    }

    async fn update_status(&self, id: Uuid, status: ListingStatus) -> AppResult<Listing> {
        let result = ListingEntity::update_many()
            .col_expr(listing::Column::Status, Expr::value(status.as_str()))
            .col_expr(listing::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(listing::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Listing"));
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Listing"))
    }

    async fn increment_views(&self, id: Uuid) -> AppResult<()> {
        ListingEntity::update_many()
            .col_expr(
                listing::Column::ViewsCount,
                Expr::col(listing::Column::ViewsCount).add(1),
            )
            .filter(listing::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    async fn insert_proposal(&self, proposal: Proposal) -> AppResult<()> {
        let txn = self.db.begin().await?;

        let active_model = proposal::ActiveModel {
            id: Set(Uuid::new_v4()),
            listing_id: Set(proposal.listing_id),
            vendor_id: Set(proposal.vendor_id),
            vendor_name: Set(proposal.vendor_name),
            proposal_text: Set(proposal.proposal_text),
            proposed_price: Set(proposal.proposed_price),
            proposed_timeline: Set(proposal.proposed_timeline),
            status: Set(proposal.status.as_str().to_string()),
            submitted_at: Set(proposal.submitted_at),
        };
        // Dropping `txn` on the error path rolls back
        active_model
            .insert(&txn)
            .await
            .map_err(map_proposal_insert_error)?;

        let result = ListingEntity::update_many()
            .col_expr(
                listing::Column::ProposalsCount,
                Expr::col(listing::Column::ProposalsCount).add(1),
            )
            .col_expr(listing::Column::UpdatedAt, Expr::value(proposal.submitted_at))
            .filter(listing::Column::Id.eq(proposal.listing_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::not_found("Listing"));
        }

        txn.commit().await?;
        Ok(())
    }

    async fn update_proposal_status(
        &self,
        listing_id: Uuid,
        vendor_id: Uuid,
        from: ProposalStatus,
        to: ProposalStatus,
    ) -> AppResult<Proposal> {
        let result = ProposalEntity::update_many()
            .col_expr(proposal::Column::Status, Expr::value(to.as_str()))
            .filter(proposal::Column::ListingId.eq(listing_id))
            .filter(proposal::Column::VendorId.eq(vendor_id))
            .filter(proposal::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;

        let current = self
            .find_proposal(listing_id, vendor_id)
            .await?
            .ok_or_else(|| AppError::not_found("Proposal"))?;

        if result.rows_affected == 0 {
            // Someone else moved it first
            return Err(AppError::invalid_transition(format!(
                "proposal is already {}",
                current.status
            )));
        }

        Proposal::try_from(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_duplicate_proposal() {
        let err = proposal_insert_error(
            Some(SqlErr::UniqueConstraintViolation(
                "idx_proposals_listing_vendor".to_string(),
            )),
            DbErr::Custom("duplicate key value".to_string()),
        );

        assert!(matches!(err, AppError::DuplicateProposal));
    }

    #[test]
    fn test_other_insert_failures_stay_database_errors() {
        let err = map_proposal_insert_error(DbErr::Custom("connection reset".to_string()));

        assert!(matches!(err, AppError::Database(DbErr::Custom(_))));
    }

    #[test]
    fn test_foreign_key_violation_is_not_duplicate() {
        let err = proposal_insert_error(
            Some(SqlErr::ForeignKeyConstraintViolation(
                "fk_proposals_listing".to_string(),
            )),
            DbErr::Custom("insert or update violates foreign key".to_string()),
        );

        assert!(matches!(err, AppError::Database(_)));
    }
}
