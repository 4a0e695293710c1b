//! Caller identity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of the caller performing an operation.
///
/// Passed by reference into the authorization engine and recorded as the
/// acting user on every audited repository commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl UserContext {
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    /// A regular, non-admin user.
    pub fn user(user_id: Uuid) -> Self {
        Self::new(user_id, false)
    }

    /// An administrative user.
    pub fn admin(user_id: Uuid) -> Self {
        Self::new(user_id, true)
    }
}
