// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Token gateway: authenticated calls with a single automatic refresh.
//!
//! Every backend response is wrapped in an envelope
//! `{status, message, data, metadata}`. HTTP 200 is the only success path.
//! A 401 whose envelope status is `error-jwt` triggers one refresh of the
//! credential pair followed by one retry of the same call. A failed
//! refresh logs the session out.

use crate::error::ApiError;
use crate::models::{AuthTokens, RefreshRequest};
use crate::services::session::Session;
use crate::services::transport::{HttpRequest, HttpResponse, Transport};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

const REFRESH_ENDPOINT: &str = "auth/refresh-token";

/// Response envelope returned by every backend endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Authenticated API client.
///
/// Cloning is cheap; clones share the session and the refresh guard.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Session,
    base_url: String,
    /// Serializes refreshes so concurrent expired calls refresh only once.
    refresh_lock: Arc<Mutex<()>>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Session, base_url: &str) -> Self {
        Self {
            transport,
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
            refresh_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Perform a call and return the envelope's `data`.
    ///
    /// With `requires_auth`, a missing access token fails before any
    /// network traffic.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        requires_auth: bool,
    ) -> Result<Option<T>, ApiError> {
        let mut retry = true;

        loop {
            let bearer = if requires_auth {
                Some(self.session.access_token()?.ok_or(ApiError::MissingToken)?)
            } else {
                None
            };

            let (status, envelope) = self
                .send_once::<T>(endpoint, method.clone(), body, bearer.clone())
                .await?;

            if status == 200 {
                return Ok(envelope.data);
            }

            // Only calls that carried a token can be rescued by refreshing it.
            if status == 401 && envelope.status == ApiError::JWT_ERROR_STATUS && retry {
                if let Some(stale) = bearer {
                    tracing::info!(endpoint, "Access token expired, refreshing");
                    self.refresh_after_expiry(&stale).await?;
                    retry = false;
                    continue;
                }
            }

            tracing::debug!(endpoint, status, message = %envelope.message, "API call failed");
            return Err(ApiError::Server {
                status,
                message: envelope.message,
            });
        }
    }

    /// Like [`call`](Self::call) but the envelope must carry data.
    pub async fn call_data<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        requires_auth: bool,
    ) -> Result<T, ApiError> {
        self.call(endpoint, method, body, requires_auth)
            .await?
            .ok_or_else(|| ApiError::MissingData(endpoint.to_string()))
    }

    /// Call for operations whose `data` is irrelevant.
    pub async fn call_void(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        requires_auth: bool,
    ) -> Result<(), ApiError> {
        self.call::<serde::de::IgnoredAny>(endpoint, method, body, requires_auth)
            .await
            .map(|_| ())
    }

    /// Exchange the stored refresh token for a new credential pair.
    ///
    /// Does not store the result.
    pub async fn refresh(&self) -> Result<AuthTokens, ApiError> {
        let refresh_token = self
            .session
            .refresh_token()?
            .ok_or_else(|| ApiError::RefreshFailed("refresh token is missing".to_string()))?;
        let body = to_body(&RefreshRequest { refresh_token })?;

        let (status, envelope) = self
            .send_once::<AuthTokens>(REFRESH_ENDPOINT, Method::POST, Some(&body), None)
            .await?;

        if status != 200 {
            return Err(ApiError::Server {
                status,
                message: envelope.message,
            });
        }
        envelope
            .data
            .ok_or_else(|| ApiError::MissingData(REFRESH_ENDPOINT.to_string()))
    }

    /// Refresh after `stale` was rejected, unless another call already did.
    async fn refresh_after_expiry(&self, stale: &str) -> Result<(), ApiError> {
        let _guard = self.refresh_lock.lock().await;

        // Re-check after acquiring the guard: a concurrent call may have
        // refreshed (or logged out) while we waited.
        match self.session.access_token()? {
            Some(current) if current != stale => {
                tracing::debug!("Token already refreshed by a concurrent call");
                return Ok(());
            }
            Some(_) => {}
            None => {
                return Err(ApiError::RefreshFailed("session ended".to_string()));
            }
        }

        // Failing to store the new pair counts as a failed refresh.
        match self.refresh().await.and_then(|tokens| self.session.login(&tokens)) {
            Ok(()) => {
                tracing::info!("Token refreshed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, logging out");
                self.session.logout();
                Err(ApiError::RefreshFailed(e.to_string()))
            }
        }
    }

    /// One request/response round trip, no refresh handling.
    async fn send_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        body: Option<&Value>,
        bearer: Option<String>,
    ) -> Result<(u16, Envelope<T>), ApiError> {
        let request = HttpRequest {
            method,
            url: format!("{}/{}", self.base_url, endpoint.trim_start_matches('/')),
            bearer,
            body: body.cloned(),
        };
        tracing::debug!(method = %request.method, url = %request.url, "API request");

        let response = self.transport.send(request).await?;
        let envelope = decode_envelope(&response)?;
        Ok((response.status, envelope))
    }
}

/// Serialize a request body.
pub fn to_body<B: Serialize>(body: &B) -> Result<Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::Decode(format!("Failed to encode body: {}", e)))
}

fn decode_envelope<T: DeserializeOwned>(response: &HttpResponse) -> Result<Envelope<T>, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| {
        ApiError::Decode(format!("HTTP {}: invalid envelope: {}", response.status, e))
    })
}
