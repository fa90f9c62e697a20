//! Proposal domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    MAX_PROPOSAL_TERM_LENGTH, MAX_PROPOSAL_TEXT_LENGTH, MIN_PROPOSAL_TEXT_LENGTH,
    PROPOSAL_STATUS_ACCEPTED, PROPOSAL_STATUS_PENDING, PROPOSAL_STATUS_REJECTED,
};
use crate::error::{DomainError, DomainResult};

/// Proposal status.
///
/// `pending` is the only state with outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn can_transition_to(&self, next: ProposalStatus) -> bool {
        matches!(
            (*self, next),
            (ProposalStatus::Pending, ProposalStatus::Accepted)
                | (ProposalStatus::Pending, ProposalStatus::Rejected)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => PROPOSAL_STATUS_PENDING,
            ProposalStatus::Accepted => PROPOSAL_STATUS_ACCEPTED,
            ProposalStatus::Rejected => PROPOSAL_STATUS_REJECTED,
        }
    }
}

impl std::str::FromStr for ProposalStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PROPOSAL_STATUS_PENDING => Ok(ProposalStatus::Pending),
            PROPOSAL_STATUS_ACCEPTED => Ok(ProposalStatus::Accepted),
            PROPOSAL_STATUS_REJECTED => Ok(ProposalStatus::Rejected),
            other => Err(DomainError::validation(format!("Unknown proposal status '{}'", other))),
        }
    }
}

impl std::fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A vendor's bid against a listing. At most one per (listing, vendor).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub listing_id: Uuid,
    pub vendor_id: Uuid,
    pub vendor_name: String,
    pub proposal_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proposed_timeline: Option<String>,
    pub status: ProposalStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Proposal submission data transfer object
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalDraft {
    pub vendor_name: String,
    pub text: String,
    pub proposed_price: Option<String>,
    pub proposed_timeline: Option<String>,
}

impl ProposalDraft {
    /// Validate field shape and return the normalized draft.
    ///
    /// Text is trimmed before the length check; blank optional terms become `None`.
    pub fn normalize(self) -> DomainResult<ProposalDraft> {
        let text = self.text.trim();
        let text_len = text.chars().count();
        if text_len < MIN_PROPOSAL_TEXT_LENGTH {
            return Err(DomainError::validation(format!(
                "Proposal text must be at least {} characters",
                MIN_PROPOSAL_TEXT_LENGTH
            )));
        }
        if text_len > MAX_PROPOSAL_TEXT_LENGTH {
            return Err(DomainError::validation(format!(
                "Proposal text must be at most {} characters",
                MAX_PROPOSAL_TEXT_LENGTH
            )));
        }

        let vendor_name = self.vendor_name.trim();
        if vendor_name.is_empty() {
            return Err(DomainError::validation("Vendor name is required"));
        }

        Ok(ProposalDraft {
            vendor_name: vendor_name.to_string(),
            text: text.to_string(),
            proposed_price: normalize_term("Proposed price", self.proposed_price)?,
            proposed_timeline: normalize_term("Proposed timeline", self.proposed_timeline)?,
        })
    }
}

fn normalize_term(field: &str, value: Option<String>) -> DomainResult<Option<String>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > MAX_PROPOSAL_TERM_LENGTH {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, MAX_PROPOSAL_TERM_LENGTH
        )));
    }
    Ok(Some(value.to_string()))
}
