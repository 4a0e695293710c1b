//! Document authorization engine.
//!
//! Pure decision logic over (caller, document, operation). Outcomes are a
//! three-way tagged result rather than errors, so the existence-concealment
//! property holds by construction: a private document that the caller does
//! not own is reported as [`AccessDecision::NotFound`], indistinguishable
//! from a record that does not exist. Unauthorized access to a non-private
//! record is the explicit, safe-to-disclose [`AccessDecision::NotAuthorized`].
//!
//! Removed records are terminal and invisible to every normal path; all
//! checks report them as not found regardless of caller identity.

use crate::identity::UserContext;
use crate::models::Document;

/// Outcome of an authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allowed,
    /// Absent, removed, or private and not owned by the caller.
    NotFound,
    /// Caller lacks rights to a non-private record.
    NotAuthorized,
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Visibility of a single record for view and search inclusion.
///
/// Allowed when the caller is an admin, when a non-private document's role
/// set intersects the caller's roles (first match wins, no further checks),
/// or when a private document is owned by the caller.
pub fn can_view(caller: &UserContext, document: &Document, for_roles: &[String]) -> AccessDecision {
    if document.is_removed {
        return AccessDecision::NotFound;
    }
    if caller.is_admin {
        return AccessDecision::Allowed;
    }
    if document.is_private {
        return if document.created_by == caller.user_id {
            AccessDecision::Allowed
        } else {
            AccessDecision::NotFound
        };
    }
    for role in for_roles {
        if document.roles.iter().any(|r| r == role) {
            return AccessDecision::Allowed;
        }
    }
    AccessDecision::NotAuthorized
}

/// Mutation of remarks, roles, and the enabled flag.
///
/// Only the owner or an admin may update; everyone else sees the record as
/// absent. Updates never disclose existence, so there is no explicit
/// refusal branch here.
pub fn can_update(caller: &UserContext, document: &Document) -> AccessDecision {
    if document.is_removed {
        return AccessDecision::NotFound;
    }
    if caller.is_admin || document.created_by == caller.user_id {
        AccessDecision::Allowed
    } else {
        AccessDecision::NotFound
    }
}

/// Soft-delete authorization.
///
/// Private documents may be deleted by their owner; everything else requires
/// admin. The denial signal is asymmetric on purpose: private and not owned
/// reads as not found, non-private and non-admin is an explicit refusal.
pub fn can_delete(caller: &UserContext, document: &Document) -> AccessDecision {
    if document.is_removed {
        return AccessDecision::NotFound;
    }
    if document.is_private && document.created_by == caller.user_id {
        return AccessDecision::Allowed;
    }
    if caller.is_admin {
        return AccessDecision::Allowed;
    }
    if document.is_private {
        AccessDecision::NotFound
    } else {
        AccessDecision::NotAuthorized
    }
}
