//! Product reviews and the cached average rating on each product.

use std::collections::HashMap;

use chrono::Utc;
use divan_core::review::reviews_for;
use divan_core::{average_rating, Author, ProductId, Review, ReviewDraft, ReviewWithAuthor, UserId};
use futures::future::join_all;

use crate::client::ApiClient;
use crate::entity::Entity;
use crate::error::ApiError;

/// Outcome of [`ApiClient::submit_review`]. The review is stored even when
/// the rating refresh that follows it fails.
#[derive(Debug)]
pub struct ReviewSubmission {
    pub review: Review,
    pub rating: Result<f64, ApiError>,
}

impl ApiClient {
    /// Reviews for one product, newest first, each with its author resolved.
    ///
    /// Authors are fetched concurrently, once per distinct user. A lookup that
    /// fails yields [`Author::Anonymous`] and a warning.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the review list cannot be fetched.
    pub async fn reviews_for_product(
        &self,
        product_id: &ProductId,
    ) -> Result<Vec<ReviewWithAuthor>, ApiError> {
        let all = self.reviews().get_all().await?;
        let matching = reviews_for(&all, product_id);

        let mut user_ids: Vec<&UserId> = matching
            .iter()
            .map(|r| &r.user_id)
            .filter(|id| !id.is_blank())
            .collect();
        user_ids.sort();
        user_ids.dedup();

        let users = self.users();
        let lookups = user_ids.iter().map(|id| users.get_by_id(id));
        let authors: HashMap<&UserId, Author> = user_ids
            .iter()
            .copied()
            .zip(join_all(lookups).await)
            .map(|(id, result)| {
                let author = match result {
                    Ok(user) => user
                        .display_name()
                        .map_or(Author::Anonymous, |name| Author::Named(name.to_owned())),
                    Err(e) => {
                        tracing::warn!(user_id = %id, error = %e, "review author lookup failed");
                        Author::Anonymous
                    }
                };
                (id, author)
            })
            .collect();

        Ok(matching
            .into_iter()
            .map(|review| ReviewWithAuthor {
                author: authors
                    .get(&review.user_id)
                    .cloned()
                    .unwrap_or(Author::Anonymous),
                review: review.clone(),
            })
            .collect())
    }

    /// Validates and stores a review, then refreshes the product's average.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] for a bad draft, or the create error.
    /// A failed rating refresh is reported in [`ReviewSubmission::rating`].
    pub async fn submit_review(&self, draft: ReviewDraft) -> Result<ReviewSubmission, ApiError> {
        let review = draft.into_review(Utc::now())?;
        let review = self.reviews().create(&review).await?;
        tracing::info!(product_id = %review.product_id, rating = review.rating, "review stored");

        let rating = self.refresh_product_rating(&review.product_id).await;
        if let Err(e) = &rating {
            tracing::warn!(product_id = %review.product_id, error = %e, "rating refresh failed");
        }
        Ok(ReviewSubmission { review, rating })
    }

    /// Recomputes a product's `ratingAvg` from its reviews and writes it back.
    ///
    /// The product is read again right before the write. If it changed since
    /// the first read the write is abandoned with [`ApiError::Conflict`]; this
    /// detects concurrent writers but cannot prevent them.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Conflict`] if the product changed underneath us.
    /// - Any fetch or update failure.
    pub async fn refresh_product_rating(&self, product_id: &ProductId) -> Result<f64, ApiError> {
        let products = self.products();
        let reviews_res = self.reviews();
        let (product, reviews) =
            tokio::join!(products.get_by_id(product_id), reviews_res.get_all());
        let product = product?;
        let reviews = reviews?;

        let matching: Vec<Review> = reviews
            .into_iter()
            .filter(|r| &r.product_id == product_id)
            .collect();
        let average = average_rating(&matching).unwrap_or(0.0);

        let current = products.get_by_id(product_id).await?;
        if current != product {
            return Err(ApiError::Conflict {
                entity: Entity::Products,
                id: product_id.to_string(),
            });
        }

        let mut updated = current;
        updated.rating_avg = average;
        products.update(product_id, &updated).await?;
        tracing::info!(product_id = %product_id, average, reviews = matching.len(), "rating refreshed");
        Ok(average)
    }
}
