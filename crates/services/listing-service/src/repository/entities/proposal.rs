//! Proposal database entity for SeaORM.
//!
//! `(listing_id, vendor_id)` is unique at the table level.

use sea_orm::entity::prelude::*;

use common::AppError;
use domain::{Proposal, ProposalStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "proposals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub listing_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    #[sea_orm(column_type = "Text")]
    pub proposal_text: String,
    pub proposed_price: Option<String>,
    pub proposed_timeline: Option<String>,
    pub status: String,
    pub submitted_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Proposal {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let status: ProposalStatus = model.status.parse().map_err(|_| {
            AppError::internal(format!(
                "proposal {} has unknown status '{}'",
                model.id, model.status
            ))
        })?;

        Ok(Proposal {
            listing_id: model.listing_id,
            vendor_id: model.vendor_id,
            vendor_name: model.vendor_name,
            proposal_text: model.proposal_text,
            proposed_price: model.proposed_price,
            proposed_timeline: model.proposed_timeline,
            status,
            submitted_at: model.submitted_at,
        })
    }
}
