use divan_core::ValidationError;
use thiserror::Error;

use crate::entity::Entity;

/// Errors returned by the storefront gateway.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{entity} record not found at {url}")]
    NotFound { entity: Entity, url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// No base URL is configured for this collection.
    #[error("no endpoint configured for {0}")]
    Unconfigured(Entity),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid email or password")]
    InvalidCredentials,

    /// The record changed between the read and the write that depended on it.
    #[error("{entity} {id} was modified concurrently; write abandoned")]
    Conflict { entity: Entity, id: String },
}
