//! Typed error hierarchy for the catalog.
//!
//! Two top-level enums cover the two failure surfaces:
//! - `DataApiError` — requests to the remote products API
//! - `SubmitError` — product editor submissions
//!
//! Field validation failures live in `catalog::editor` as `FieldErrors`;
//! `SubmitError::Invalid` wraps them when a submission is rejected.

use thiserror::Error;

use crate::catalog::editor::FieldErrors;

/// Errors from the products REST API client.
#[derive(Debug, Error)]
pub enum DataApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Products API returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode products API response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid products API base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DataApiError {
    /// True when the API answered `404 Not Found`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == reqwest::StatusCode::NOT_FOUND)
    }
}

/// Errors from submitting the product editor.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("Editor is not accepting submissions")]
    NotIdle,

    #[error("Failed to save product: {0}")]
    Persistence(#[source] DataApiError),
}
