use std::sync::Arc;

use divan_core::SessionUser;

use crate::storage::Storage;
use crate::StoreError;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

/// The logged-in user and their demo token.
pub struct SessionStore {
    storage: Arc<dyn Storage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if either key cannot be written.
    pub fn save(&self, user: &SessionUser, token: &str) -> Result<(), StoreError> {
        let raw = serde_json::to_string(user).map_err(|source| StoreError::Serialize {
            key: USER_KEY.to_string(),
            source,
        })?;
        self.storage.write(USER_KEY, &raw)?;
        self.storage.write(TOKEN_KEY, token)?;
        tracing::info!(user_id = %user.id, "session saved");
        Ok(())
    }

    /// The stored user, or `None` when logged out. An unreadable record is
    /// treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be read.
    pub fn current(&self) -> Result<Option<SessionUser>, StoreError> {
        let Some(raw) = self.storage.read(USER_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                tracing::warn!(error = %e, "stored session is unreadable; ignoring");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be read.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        self.storage.read(TOKEN_KEY)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if storage cannot be read.
    pub fn is_admin(&self) -> Result<bool, StoreError> {
        Ok(self.current()?.as_ref().is_some_and(SessionUser::is_admin))
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] if either key cannot be removed.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(USER_KEY)?;
        self.storage.remove(TOKEN_KEY)
    }
}

#[cfg(test)]
mod tests {
    use divan_core::{RecordId, UserRole};

    use super::*;
    use crate::storage::MemoryStorage;

    fn admin() -> SessionUser {
        SessionUser {
            id: RecordId::from("1"),
            full_name: "Admin".to_string(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn save_then_clear() {
        let store = SessionStore::new(Arc::new(MemoryStorage::new()));
        assert_eq!(store.current().unwrap(), None);
        assert!(!store.is_admin().unwrap());

        store.save(&admin(), "demo-token").unwrap();
        assert_eq!(store.current().unwrap(), Some(admin()));
        assert_eq!(store.token().unwrap().as_deref(), Some("demo-token"));
        assert!(store.is_admin().unwrap());

        store.clear().unwrap();
        assert_eq!(store.current().unwrap(), None);
        assert_eq!(store.token().unwrap(), None);
    }

    #[test]
    fn corrupt_user_reads_as_logged_out() {
        let storage = Arc::new(MemoryStorage::new());
        storage.write(USER_KEY, "nope").unwrap();
        let store = SessionStore::new(storage);
        assert_eq!(store.current().unwrap(), None);
    }
}
