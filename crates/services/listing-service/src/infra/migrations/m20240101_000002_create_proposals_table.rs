//! Migration: Create proposals table.
//!
//! The unique index on (listing_id, vendor_id) is what makes concurrent
//! submissions from the same vendor safe.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Proposals::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Proposals::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Proposals::ListingId).uuid().not_null())
                    .col(ColumnDef::new(Proposals::VendorId).uuid().not_null())
                    .col(ColumnDef::new(Proposals::VendorName).string().not_null())
                    .col(ColumnDef::new(Proposals::ProposalText).text().not_null())
                    .col(ColumnDef::new(Proposals::ProposedPrice).string_len(100).null())
                    .col(ColumnDef::new(Proposals::ProposedTimeline).string_len(100).null())
                    .col(ColumnDef::new(Proposals::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Proposals::SubmittedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_proposals_listing_id")
                            .from(Proposals::Table, Proposals::ListingId)
                            .to(Listings::Table, Listings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_proposals_listing_vendor")
                    .table(Proposals::Table)
                    .col(Proposals::ListingId)
                    .col(Proposals::VendorId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Proposals::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Proposals {
    Table,
    Id,
    ListingId,
    VendorId,
    VendorName,
    ProposalText,
    ProposedPrice,
    ProposedTimeline,
    Status,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Listings {
    Table,
    Id,
}
