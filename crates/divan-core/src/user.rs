use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ids::UserId;
use crate::serde_helpers::{lenient_optional, lenient_or_default, lenient_string};
use crate::validation::{required, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

/// A storefront account as stored by the users endpoint.
///
/// `password` is the demo backend's plaintext credential and is redacted
/// from `Debug` output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<UserId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub password: String,
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub role: UserRole,
    #[serde(
        default,
        deserialize_with = "lenient_optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub avatar: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("role", &self.role)
            .field("avatar", &self.avatar)
            .finish_non_exhaustive()
    }
}

impl User {
    /// Display name: full name, else email, else `None`.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        [self.full_name.as_str(), self.email.as_str()]
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// The slice of a [`User`] kept in the local session after login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub role: UserRole,
}

impl SessionUser {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub email: String,
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Writes the update onto `user`, leaving every other field as it was.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] if name or email is blank.
    pub fn apply(self, user: &mut User) -> Result<(), ValidationError> {
        let full_name = required("fullName", &self.full_name)?.to_owned();
        let email = required("email", &self.email)?.to_owned();
        user.full_name = full_name;
        user.email = email;
        user.avatar = self
            .avatar
            .map(|a| a.trim().to_owned())
            .filter(|a| !a.is_empty());
        Ok(())
    }
}
