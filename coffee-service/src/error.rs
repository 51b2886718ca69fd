use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::fmt;
use thiserror::Error;

use crate::dtos::MessageResponse;
use crate::services::StoreError;

/// Which storage operation failed; picks the message returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageAction {
    Retrieve,
    Update,
    Add,
    Delete,
}

impl StorageAction {
    pub fn message(&self) -> &'static str {
        match self {
            StorageAction::Retrieve => "Error retrieving coffee data",
            StorageAction::Update => "Error updating coffee data",
            StorageAction::Add => "Error adding coffee data",
            StorageAction::Delete => "Error deleting coffee data",
        }
    }
}

impl fmt::Display for StorageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Error)]
pub enum CoffeeError {
    #[error("Invalid Coffee ID: {0}")]
    InvalidId(String),

    #[error("Invalid Coffee data: {0}")]
    InvalidBody(String),

    #[error("Coffee not found")]
    NotFound,

    #[error("{action}: {source}")]
    Storage {
        action: StorageAction,
        #[source]
        source: StoreError,
    },
}

impl CoffeeError {
    /// Adapter for `map_err` on store calls.
    pub fn storage(action: StorageAction) -> impl FnOnce(StoreError) -> Self {
        move |source| CoffeeError::Storage { action, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            CoffeeError::InvalidId(_) | CoffeeError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            CoffeeError::NotFound => StatusCode::NOT_FOUND,
            CoffeeError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Never includes the storage cause.
    pub fn public_message(&self) -> &'static str {
        match self {
            CoffeeError::InvalidId(_) => "Invalid Coffee ID",
            CoffeeError::InvalidBody(_) => "Invalid Coffee data",
            CoffeeError::NotFound => "Coffee not found",
            CoffeeError::Storage { action, .. } => action.message(),
        }
    }
}

impl IntoResponse for CoffeeError {
    fn into_response(self) -> Response {
        match &self {
            CoffeeError::Storage { action, source } => {
                tracing::error!(error = %source, "{}", action);
            }
            other => {
                tracing::debug!(error = %other, "Rejected coffee request");
            }
        }

        (
            self.status_code(),
            Json(MessageResponse {
                message: self.public_message().to_string(),
            }),
        )
            .into_response()
    }
}
