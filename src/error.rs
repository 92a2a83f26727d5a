// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Error types for the API gateway and the route tracker.

use uuid::Uuid;

/// Errors from talking to the Wanderly backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Token is missing")]
    MissingToken,

    #[error("Token refresh failed: {0}")]
    RefreshFailed(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Response carried no data: {0}")]
    MissingData(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Token storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Envelope status the backend uses for an expired or invalid JWT.
    pub const JWT_ERROR_STATUS: &'static str = "error-jwt";

    /// Check whether this error means the session is no longer authenticated.
    pub fn is_auth_error(&self) -> bool {
        match self {
            ApiError::MissingToken | ApiError::RefreshFailed(_) => true,
            ApiError::Server { status, .. } => *status == 401,
            _ => false,
        }
    }
}

/// Errors from route tracker operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Unknown route: {0}")]
    UnknownRoute(Uuid),

    #[error("Unknown AR model: {0}")]
    UnknownModel(Uuid),

    #[error("Route {0} has no markers")]
    EmptyRoute(Uuid),

    #[error("Marker index {index} out of range for route {route_id}")]
    InvalidMarkerIndex { route_id: Uuid, index: usize },

    #[error("No route at position {0}")]
    InvalidRouteIndex(usize),

    #[error("No route selected")]
    NoRouteSelected,

    #[error("No city loaded")]
    NoCityLoaded,
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;
