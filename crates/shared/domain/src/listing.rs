//! Listing domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    LISTING_STATUS_ACTIVE, LISTING_STATUS_CANCELLED, LISTING_STATUS_COMPLETED, LISTING_STATUS_DRAFT,
    MAX_LISTING_TITLE_LENGTH,
};
use crate::error::{DomainError, DomainResult};
use crate::proposal::Proposal;

/// Listing lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Draft,
    Active,
    Cancelled,
    Completed,
}

impl ListingStatus {
    /// Cancelled and completed listings accept no new proposals
    pub fn accepts_proposals(&self) -> bool {
        !matches!(self, ListingStatus::Cancelled | ListingStatus::Completed)
    }

    /// Check if the owner may move a listing from this status to `next`
    pub fn can_transition_to(&self, next: ListingStatus) -> bool {
        use ListingStatus::*;
        matches!(
            (*self, next),
            (Draft, Active)
                | (Draft, Cancelled)
                | (Active, Cancelled)
                | (Active, Completed)
                | (Cancelled, Active)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Draft => LISTING_STATUS_DRAFT,
            ListingStatus::Active => LISTING_STATUS_ACTIVE,
            ListingStatus::Cancelled => LISTING_STATUS_CANCELLED,
            ListingStatus::Completed => LISTING_STATUS_COMPLETED,
        }
    }
}

impl std::str::FromStr for ListingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            LISTING_STATUS_DRAFT => Ok(ListingStatus::Draft),
            LISTING_STATUS_ACTIVE => Ok(ListingStatus::Active),
            LISTING_STATUS_CANCELLED => Ok(ListingStatus::Cancelled),
            LISTING_STATUS_COMPLETED => Ok(ListingStatus::Completed),
            other => Err(DomainError::validation(format!("Unknown listing status '{}'", other))),
        }
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing domain entity (a customer's project request)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: Uuid,
    /// Customer who created the listing; never changes
    pub owner_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: ListingStatus,
    /// Proposals in submission order
    pub proposals: Vec<Proposal>,
    pub proposals_count: u32,
    pub views_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    /// Create a new listing owned by `owner_id`
    pub fn new(
        id: Uuid,
        owner_id: Uuid,
        title: String,
        description: String,
        status: ListingStatus,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            title,
            description,
            status,
            proposals: Vec::new(),
            proposals_count: 0,
            views_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Find the proposal submitted by a vendor
    pub fn proposal_from(&self, vendor_id: Uuid) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.vendor_id == vendor_id)
    }

    pub fn proposal_from_mut(&mut self, vendor_id: Uuid) -> Option<&mut Proposal> {
        self.proposals.iter_mut().find(|p| p.vendor_id == vendor_id)
    }

    /// Move to a new status; legality is checked, permission is not
    pub fn change_status(&mut self, next: ListingStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(format!(
                "listing cannot move from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Listing creation data transfer object
#[derive(Debug, Clone, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub description: String,
    /// Publish immediately instead of saving a draft
    #[serde(default)]
    pub publish: bool,
}

impl NewListing {
    /// Check field shape before a listing is built from it
    pub fn validate(&self) -> DomainResult<()> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(DomainError::validation("Title is required"));
        }
        if title.chars().count() > MAX_LISTING_TITLE_LENGTH {
            return Err(DomainError::validation(format!(
                "Title must be at most {} characters",
                MAX_LISTING_TITLE_LENGTH
            )));
        }
        Ok(())
    }

    pub fn initial_status(&self) -> ListingStatus {
        if self.publish {
            ListingStatus::Active
        } else {
            ListingStatus::Draft
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_statuses_refuse_proposals() {
        assert!(ListingStatus::Draft.accepts_proposals());
        assert!(ListingStatus::Active.accepts_proposals());
        assert!(!ListingStatus::Cancelled.accepts_proposals());
        assert!(!ListingStatus::Completed.accepts_proposals());
    }

    #[test]
    fn test_completed_is_terminal() {
        for next in [ListingStatus::Draft, ListingStatus::Active, ListingStatus::Cancelled] {
            assert!(!ListingStatus::Completed.can_transition_to(next));
        }
    }

    #[test]
    fn test_change_status_rejects_illegal_move() {
        let mut listing = Listing::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "Warehouse racking".to_string(),
            String::new(),
            ListingStatus::Draft,
        );
        assert!(matches!(
            listing.change_status(ListingStatus::Completed),
            Err(DomainError::InvalidTransition(_))
        ));
        assert!(listing.change_status(ListingStatus::Active).is_ok());
        assert_eq!(listing.status, ListingStatus::Active);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        let parsed: ListingStatus = "cancelled".parse().unwrap();
        assert_eq!(parsed, ListingStatus::Cancelled);
        assert!("archived".parse::<ListingStatus>().is_err());
    }

    #[test]
    fn test_new_listing_requires_title() {
        let input = NewListing {
            title: "   ".to_string(),
            description: "d".to_string(),
            publish: true,
        };
        assert!(input.validate().is_err());
    }
}
