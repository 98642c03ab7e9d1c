//! User domain types.

use harvest_hub_core::{Email, UserId, UserRole};

/// A storefront account.
///
/// The password hash is deliberately not part of this type; only the auth
/// service reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: UserRole,
}
