//! User records

use serde::{Deserialize, Serialize};
use crate::domain::value_objects::Role;

/// Profile returned by `GET /users/find/no-password/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl UserProfile {
    pub fn is_admin(&self) -> bool { self.role == Role::Admin }
    pub fn full_name(&self) -> String { format!("{} {}", self.name, self.surname) }
}

/// Row of the admin user listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    #[serde(flatten)]
    pub profile: UserProfile,
    #[serde(default)]
    pub authorized: bool,
}
