//! Demo login against the users collection.
//!
//! The backend stores plaintext passwords and has no auth endpoint, so login
//! fetches every user and compares credentials locally. This is only fit for
//! the demo deployment.

use divan_core::{SessionUser, User, ValidationError};
use subtle::ConstantTimeEq;

use crate::client::ApiClient;
use crate::error::ApiError;

/// Token stored alongside the session user.
pub const DEMO_TOKEN: &str = "demo-token";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub user: SessionUser,
    pub token: String,
}

impl ApiClient {
    /// # Errors
    ///
    /// - [`ApiError::Validation`] if email or password is blank.
    /// - [`ApiError::InvalidCredentials`] if no user matches.
    /// - Any failure fetching the user list.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginSession, ApiError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(ValidationError::MissingField("email").into());
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("password").into());
        }

        let users = self.users().get_all().await?;
        let Some(user) = find_by_credentials(&users, email, password) else {
            tracing::info!("login rejected");
            return Err(ApiError::InvalidCredentials);
        };
        let Some(id) = user.id.clone() else {
            tracing::warn!(email, "matching user record has no id");
            return Err(ApiError::InvalidCredentials);
        };

        tracing::info!(user_id = %id, "login succeeded");
        Ok(LoginSession {
            user: SessionUser {
                id,
                full_name: user.full_name.clone(),
                role: user.role,
            },
            token: DEMO_TOKEN.to_owned(),
        })
    }
}

/// First user whose email and password both match. Every candidate is
/// compared in full so timing does not reveal which field differed.
fn find_by_credentials<'a>(users: &'a [User], email: &str, password: &str) -> Option<&'a User> {
    users.iter().find(|u| {
        let email_ok = u.email.trim().as_bytes().ct_eq(email.as_bytes());
        let password_ok = u.password.as_bytes().ct_eq(password.as_bytes());
        bool::from(email_ok & password_ok)
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn users() -> Vec<User> {
        serde_json::from_value(json!([
            { "id": "1", "email": "a@example.com", "password": "one" },
            { "id": "2", "email": "b@example.com", "password": "two", "role": "admin" }
        ]))
        .unwrap()
    }

    #[test]
    fn matches_on_email_and_password() {
        let users = users();
        let found = find_by_credentials(&users, "b@example.com", "two").unwrap();
        assert!(found.is_admin());
    }

    #[test]
    fn wrong_password_does_not_match() {
        let users = users();
        assert!(find_by_credentials(&users, "a@example.com", "two").is_none());
        assert!(find_by_credentials(&users, "a@example.com", "on").is_none());
    }
}
