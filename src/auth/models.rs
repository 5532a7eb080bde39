// Authentication data models and DTOs

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

/// User node as stored, including the password digest
///
/// Only ever read inside the auth service; callers receive [`UserView`].
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// User response model (excludes the password digest)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email,
            name: user.name,
        }
    }
}

/// Login response: identity plus a freshly issued token
#[derive(Debug, Clone, Serialize)]
pub struct AuthenticatedUserView {
    #[serde(flatten)]
    pub user: UserView,
    pub token: String,
}

/// Registration request DTO
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,
}

/// Login request DTO
///
/// Not validated: a malformed email must fail exactly like an unknown one.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}
