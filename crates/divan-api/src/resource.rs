use std::marker::PhantomData;

use divan_core::RecordId;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::entity::Entity;
use crate::error::ApiError;

/// CRUD access to one remote collection.
///
/// Every method issues exactly one request and returns the parsed body.
/// Nothing is retried: a create that timed out may still have been stored.
/// `update` replaces the whole record.
#[derive(Debug, Clone)]
pub struct Resource<T> {
    http: Client,
    entity: Entity,
    base: Option<Url>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Resource<T> {
    pub(crate) fn new(http: Client, entity: Entity, base: Option<Url>) -> Self {
        Self {
            http,
            entity,
            base,
            _record: PhantomData,
        }
    }

    #[must_use]
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// `true` when a base URL is configured for this collection.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.base.is_some()
    }

    fn collection_url(&self) -> Result<Url, ApiError> {
        self.base.clone().ok_or(ApiError::Unconfigured(self.entity))
    }

    fn record_url(&self, id: &RecordId) -> Result<Url, ApiError> {
        let mut url = self.collection_url()?;
        let base = url.to_string();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: base,
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

impl<T> Resource<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Fetches the whole collection.
    ///
    /// Records that do not decode are skipped with a warning, so one bad
    /// record never hides the rest.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unconfigured`] if the collection has no base URL.
    /// - [`ApiError::Http`] / [`ApiError::UnexpectedStatus`] on transport or status failure.
    /// - [`ApiError::Deserialize`] if the body is not a list.
    pub async fn get_all(&self) -> Result<Vec<T>, ApiError> {
        let url = self.collection_url()?;
        let raw: Vec<Value> = self.send(Method::GET, url, None).await?;
        let total = raw.len();
        let records: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| match serde_json::from_value(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        entity = %self.entity,
                        index,
                        error = %e,
                        "skipping undecodable record"
                    );
                    None
                }
            })
            .collect();
        if records.len() < total {
            tracing::warn!(
                entity = %self.entity,
                skipped = total - records.len(),
                total,
                "collection had undecodable records"
            );
        }
        Ok(records)
    }

    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] for a 404, otherwise as [`Resource::get_all`].
    pub async fn get_by_id(&self, id: &RecordId) -> Result<T, ApiError> {
        let url = self.record_url(id)?;
        self.send(Method::GET, url, None).await
    }

    /// POSTs `record` and returns the stored copy with its assigned id.
    ///
    /// # Errors
    ///
    /// As [`Resource::get_all`].
    pub async fn create(&self, record: &T) -> Result<T, ApiError> {
        let url = self.collection_url()?;
        self.send(Method::POST, url, Some(record)).await
    }

    /// PUTs the full record, replacing what the backend holds.
    ///
    /// # Errors
    ///
    /// As [`Resource::get_by_id`].
    pub async fn update(&self, id: &RecordId, record: &T) -> Result<T, ApiError> {
        let url = self.record_url(id)?;
        self.send(Method::PUT, url, Some(record)).await
    }

    /// Deletes the record and returns it as the backend last held it.
    ///
    /// # Errors
    ///
    /// As [`Resource::get_by_id`].
    pub async fn remove(&self, id: &RecordId) -> Result<T, ApiError> {
        let url = self.record_url(id)?;
        self.send(Method::DELETE, url, None).await
    }

    async fn send<U>(&self, method: Method, url: Url, body: Option<&T>) -> Result<U, ApiError>
    where
        U: DeserializeOwned,
    {
        tracing::debug!(entity = %self.entity, %method, %url, "gateway request");
        let context = format!("{method} {url}");
        let mut request = self.http.request(method, url.clone());
        if let Some(record) = body {
            request = request.json(record);
        }
        let response = request.send().await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound {
                entity: self.entity,
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|source| ApiError::Deserialize { context, source })
    }
}
