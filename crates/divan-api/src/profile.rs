use divan_core::{Order, Product, ProfileUpdate, SessionUser, User, UserId};

use crate::client::ApiClient;
use crate::error::ApiError;

/// Rows shown per profile section.
pub const PROFILE_SECTION_LIMIT: usize = 5;

/// Everything the profile page shows, each section loaded independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileOverview {
    pub favorites: Vec<Product>,
    pub recent_orders: Vec<Order>,
    /// Only populated for admins.
    pub users: Option<Vec<User>>,
}

impl ApiClient {
    /// Writes new name, email, and avatar onto the stored user.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Validation`] for a blank name or email.
    /// - Any failure fetching or updating the user.
    pub async fn update_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<User, ApiError> {
        let users = self.users();
        let mut user = users.get_by_id(user_id).await?;
        update.apply(&mut user)?;
        let user = users.update(user_id, &user).await?;
        tracing::info!(user_id = %user_id, "profile updated");
        Ok(user)
    }

    /// Loads the profile sections concurrently. A section that fails to load
    /// is logged and left empty.
    pub async fn profile_overview(&self, session: &SessionUser) -> ProfileOverview {
        let (favorites, recent_orders, users) = tokio::join!(
            self.remote_favorites(&session.id),
            self.recent_orders(&session.id),
            self.first_users(session.is_admin()),
        );
        ProfileOverview {
            favorites: section("favorites", favorites),
            recent_orders: section("orders", recent_orders),
            users: users.map(|u| section("users", u)),
        }
    }

    async fn remote_favorites(&self, user_id: &UserId) -> Result<Vec<Product>, ApiError> {
        let records = self.favorites().get_all().await?;
        let ids: Vec<_> = records
            .into_iter()
            .filter(|f| &f.user_id == user_id)
            .map(|f| f.product_id)
            .take(PROFILE_SECTION_LIMIT)
            .collect();
        Ok(self.favorite_products(&ids).await)
    }

    async fn recent_orders(&self, user_id: &UserId) -> Result<Vec<Order>, ApiError> {
        let mut orders = self.orders_for_user(user_id).await?;
        orders.truncate(PROFILE_SECTION_LIMIT);
        Ok(orders)
    }

    async fn first_users(&self, is_admin: bool) -> Option<Result<Vec<User>, ApiError>> {
        if !is_admin {
            return None;
        }
        Some(self.users().get_all().await.map(|mut users| {
            users.truncate(PROFILE_SECTION_LIMIT);
            users
        }))
    }
}

fn section<T>(name: &str, result: Result<Vec<T>, ApiError>) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(ApiError::Unconfigured(entity)) => {
            tracing::debug!(section = name, %entity, "profile section has no endpoint");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(section = name, error = %e, "profile section failed to load");
            Vec::new()
        }
    }
}
