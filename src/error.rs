//! Error types and HTTP error mapping for the City Explorer service

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Main error type for the City Explorer service
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Missing or malformed request parameters
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Upstream provider failures: transport, non-2xx or undecodable payload
    #[error("{provider} provider error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// The geocoding provider returned an empty match set
    #[error("No results found for '{query}'")]
    NoResultsFound { query: String },

    /// Persistent store connection or query failures
    #[error("Store error: {message}")]
    Store { message: String },
}

impl ExplorerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new provider error tagged with the upstream name
    pub fn provider<S: Into<String>>(provider: &'static str, message: S) -> Self {
        Self::Provider {
            provider,
            message: message.into(),
        }
    }

    /// Create a new no-results error for a normalized query
    pub fn no_results<S: Into<String>>(query: S) -> Self {
        Self::NoResultsFound {
            query: query.into(),
        }
    }

    /// Create a new store error
    pub fn store<S: Into<String>>(message: S) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            ExplorerError::Validation { message } => format!("Invalid input: {message}"),
            ExplorerError::Provider { provider, .. } => {
                format!("Unable to reach the {provider} service.")
            }
            ExplorerError::NoResultsFound { query } => {
                format!("No location matches '{query}'.")
            }
            ExplorerError::Store { .. } => "Location store is unavailable.".to_string(),
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: bool,
    pub message: String,
}

impl IntoResponse for ExplorerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed: {}", self.user_message());

        // Caller mistakes and upstream failures share one status.
        let body = ErrorBody {
            error: true,
            message: self.to_string(),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
