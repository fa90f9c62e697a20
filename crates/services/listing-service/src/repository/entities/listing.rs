//! Listing database entity for SeaORM.

use sea_orm::entity::prelude::*;

use common::{AppError, AppResult};
use domain::{Listing, ListingStatus};

use super::proposal;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub status: String,
    pub proposals_count: i32,
    pub views_count: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert to the domain entity, attaching proposals already in submission order
    pub fn into_domain(self, proposals: Vec<proposal::Model>) -> AppResult<Listing> {
        let status: ListingStatus = self.status.parse().map_err(|_| {
            AppError::internal(format!(
                "listing {} has unknown status '{}'",
                self.id, self.status
            ))
        })?;
        let proposals = proposals
            .into_iter()
            .map(domain::Proposal::try_from)
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Listing {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            description: self.description,
            status,
            proposals,
            proposals_count: u32::try_from(self.proposals_count).unwrap_or_default(),
            views_count: u32::try_from(self.views_count).unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
