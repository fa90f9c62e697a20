//! Actor context resolution.
//!
//! An [`ActorContext`] is recomputed for every request from raw session facts
//! and is never persisted. The acting-as override is an explicit field here
//! rather than ambient session state, so every permission check receives it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    ROLE_CUSTOMER, ROLE_SUPERADMIN, ROLE_UNSET, ROLE_VENDOR, SUPER_ADMIN_DEFAULTS_TO_VENDOR,
};

/// Role persisted on the user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Vendor,
    SuperAdmin,
    Unset,
}

impl Role {
    /// Narrow to a role that can author messages and drive role-gated UI
    pub fn as_acting(&self) -> Option<ActingRole> {
        match self {
            Role::Customer => Some(ActingRole::Customer),
            Role::Vendor => Some(ActingRole::Vendor),
            Role::SuperAdmin | Role::Unset => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => ROLE_CUSTOMER,
            Role::Vendor => ROLE_VENDOR,
            Role::SuperAdmin => ROLE_SUPERADMIN,
            Role::Unset => ROLE_UNSET,
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_CUSTOMER => Role::Customer,
            ROLE_VENDOR => Role::Vendor,
            ROLE_SUPERADMIN => Role::SuperAdmin,
            _ => Role::Unset,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        Role::from(s.as_str())
    }
}

impl From<ActingRole> for Role {
    fn from(role: ActingRole) -> Self {
        match role {
            ActingRole::Customer => Role::Customer,
            ActingRole::Vendor => Role::Vendor,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One side of the marketplace.
///
/// Used for the acting-as override and for the sender role stamped on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ActingRole {
    Customer,
    Vendor,
}

impl ActingRole {
    /// Parse a strict acting role; unknown values are rejected rather than defaulted
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_CUSTOMER => Some(ActingRole::Customer),
            ROLE_VENDOR => Some(ActingRole::Vendor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActingRole::Customer => ROLE_CUSTOMER,
            ActingRole::Vendor => ROLE_VENDOR,
        }
    }
}

impl std::fmt::Display for ActingRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides who counts as a super-admin.
///
/// Built from configuration; replaces any hard-coded administrator address.
#[derive(Debug, Clone)]
pub struct AdminPolicy {
    super_admin_emails: HashSet<String>,
    vendor_fallback: bool,
}

impl Default for AdminPolicy {
    fn default() -> Self {
        Self {
            super_admin_emails: HashSet::new(),
            vendor_fallback: SUPER_ADMIN_DEFAULTS_TO_VENDOR,
        }
    }
}

impl AdminPolicy {
    /// Create a policy from a list of administrator emails
    pub fn new<I, S>(super_admin_emails: I, vendor_fallback: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            super_admin_emails: super_admin_emails
                .into_iter()
                .map(|e| normalize_email(e.as_ref()))
                .filter(|e| !e.is_empty())
                .collect(),
            vendor_fallback,
        }
    }

    /// Check if an email belongs to a configured administrator
    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = normalize_email(email);
        !email.is_empty() && self.super_admin_emails.contains(&email)
    }

    /// Whether super-admins without an override are vendor-capable
    pub fn vendor_fallback(&self) -> bool {
        self.vendor_fallback
    }

    /// Derive the authoritative actor context for one request.
    ///
    /// An override supplied for an actor who is not a super-admin is dropped.
    /// Never fails: an unset role is valid and simply denies role-gated actions.
    pub fn resolve(
        &self,
        identity: Option<Uuid>,
        email: &str,
        base_role: Role,
        override_role: Option<ActingRole>,
    ) -> ActorContext {
        let is_super_admin = self.is_admin_email(email) || base_role == Role::SuperAdmin;
        let override_role = if is_super_admin { override_role } else { None };
        let effective_role = override_role.map(Role::from).unwrap_or(base_role);

        ActorContext {
            identity,
            email: email.to_string(),
            base_role,
            override_role,
            is_super_admin,
            effective_role,
            vendor_fallback: self.vendor_fallback,
        }
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Per-request view of who is acting and as what.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorContext {
    /// Stable id from the identity provider; `None` when unauthenticated
    pub identity: Option<Uuid>,
    #[serde(skip_serializing)]
    pub email: String,
    pub base_role: Role,
    /// Only ever set for super-admins
    pub override_role: Option<ActingRole>,
    pub is_super_admin: bool,
    /// Override if present, else base role. Drives every permission check.
    pub effective_role: Role,
    #[serde(skip_serializing)]
    pub vendor_fallback: bool,
}

impl ActorContext {
    /// Actor for a request that carried no session
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            email: String::new(),
            base_role: Role::Unset,
            override_role: None,
            is_super_admin: false,
            effective_role: Role::Unset,
            vendor_fallback: false,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Check identity equality with some stored identity
    pub fn is(&self, identity: Uuid) -> bool {
        self.identity == Some(identity)
    }

    /// Vendor role, or a super-admin who has not explicitly chosen the customer view.
    pub fn can_act_as_vendor(&self) -> bool {
        if self.effective_role == Role::Vendor {
            return true;
        }
        self.is_super_admin
            && self.vendor_fallback
            && self.override_role != Some(ActingRole::Customer)
    }

    pub fn acts_as_customer(&self) -> bool {
        self.effective_role == Role::Customer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AdminPolicy {
        AdminPolicy::new(["root@marketplace.test"], true)
    }

    #[test]
    fn test_role_parsing_defaults_to_unset() {
        assert_eq!(Role::from("customer"), Role::Customer);
        assert_eq!(Role::from("Vendor"), Role::Vendor);
        assert_eq!(Role::from("superadmin"), Role::SuperAdmin);
        assert_eq!(Role::from("admin"), Role::Unset);
        assert_eq!(Role::from(""), Role::Unset);
    }

    #[test]
    fn test_acting_role_parse_is_strict() {
        assert_eq!(ActingRole::parse("vendor"), Some(ActingRole::Vendor));
        assert_eq!(ActingRole::parse(" CUSTOMER "), Some(ActingRole::Customer));
        assert_eq!(ActingRole::parse("superadmin"), None);
    }

    #[test]
    fn test_admin_email_match_is_case_insensitive() {
        let policy = policy();
        assert!(policy.is_admin_email("Root@Marketplace.test "));
        assert!(!policy.is_admin_email("someone@marketplace.test"));
        assert!(!policy.is_admin_email(""));
    }

    #[test]
    fn test_override_ignored_for_non_admin() {
        let id = Uuid::new_v4();
        for requested in [Some(ActingRole::Customer), Some(ActingRole::Vendor), None] {
            let actor = policy().resolve(Some(id), "v@shop.test", Role::Vendor, requested);
            assert!(!actor.is_super_admin);
            assert_eq!(actor.override_role, None);
            assert_eq!(actor.effective_role, Role::Vendor);
        }
    }

    #[test]
    fn test_override_applies_for_admin_email() {
        let actor = policy().resolve(
            Some(Uuid::new_v4()),
            "root@marketplace.test",
            Role::Unset,
            Some(ActingRole::Customer),
        );
        assert!(actor.is_super_admin);
        assert_eq!(actor.effective_role, Role::Customer);
    }

    #[test]
    fn test_superadmin_role_flag_grants_admin() {
        let actor = AdminPolicy::default().resolve(
            Some(Uuid::new_v4()),
            "ops@marketplace.test",
            Role::SuperAdmin,
            Some(ActingRole::Vendor),
        );
        assert!(actor.is_super_admin);
        assert_eq!(actor.effective_role, Role::Vendor);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let id = Uuid::new_v4();
        let a = policy().resolve(Some(id), "root@marketplace.test", Role::Customer, None);
        let b = policy().resolve(Some(id), "root@marketplace.test", Role::Customer, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_vendor_fallback_for_unconfigured_admin() {
        let actor =
            policy().resolve(Some(Uuid::new_v4()), "root@marketplace.test", Role::Unset, None);
        assert!(actor.can_act_as_vendor());

        let customer_view = policy().resolve(
            Some(Uuid::new_v4()),
            "root@marketplace.test",
            Role::Unset,
            Some(ActingRole::Customer),
        );
        assert!(!customer_view.can_act_as_vendor());
    }

    #[test]
    fn test_vendor_fallback_can_be_disabled() {
        let policy = AdminPolicy::new(["root@marketplace.test"], false);
        let actor =
            policy.resolve(Some(Uuid::new_v4()), "root@marketplace.test", Role::Unset, None);
        assert!(actor.is_super_admin);
        assert!(!actor.can_act_as_vendor());
    }

    #[test]
    fn test_anonymous_actor() {
        let actor = ActorContext::anonymous();
        assert!(!actor.is_authenticated());
        assert!(!actor.can_act_as_vendor());
        assert!(!actor.acts_as_customer());
    }
}
