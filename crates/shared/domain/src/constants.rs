//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Buyer-side role; owns listings
pub const ROLE_CUSTOMER: &str = "customer";

/// Seller-side role; submits proposals
pub const ROLE_VENDOR: &str = "vendor";

/// Role flag set at account provisioning for administrators
pub const ROLE_SUPERADMIN: &str = "superadmin";

/// Placeholder for accounts that never picked a side
pub const ROLE_UNSET: &str = "unset";

/// Super-admins with no override may exercise vendor flows.
///
/// Pending product sign-off; `AdminPolicy` reads this as its default so the
/// fallback can be switched off through configuration.
pub const SUPER_ADMIN_DEFAULTS_TO_VENDOR: bool = true;

// =============================================================================
// Listing status values
// =============================================================================

pub const LISTING_STATUS_DRAFT: &str = "draft";
pub const LISTING_STATUS_ACTIVE: &str = "active";
pub const LISTING_STATUS_CANCELLED: &str = "cancelled";
pub const LISTING_STATUS_COMPLETED: &str = "completed";

// =============================================================================
// Proposal status values
// =============================================================================

pub const PROPOSAL_STATUS_PENDING: &str = "pending";
pub const PROPOSAL_STATUS_ACCEPTED: &str = "accepted";
pub const PROPOSAL_STATUS_REJECTED: &str = "rejected";

// =============================================================================
// Validation
// =============================================================================

/// Minimum proposal text length (after trimming)
pub const MIN_PROPOSAL_TEXT_LENGTH: usize = 50;

/// Maximum proposal text length
pub const MAX_PROPOSAL_TEXT_LENGTH: usize = 10_000;

/// Maximum length of the free-form price and timeline fields
pub const MAX_PROPOSAL_TERM_LENGTH: usize = 100;

/// Maximum message length
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Maximum listing title length
pub const MAX_LISTING_TITLE_LENGTH: usize = 200;

// =============================================================================
// Messaging
// =============================================================================

/// Separator between the listing and vendor halves of a thread key
pub const THREAD_ID_SEPARATOR: char = ':';
