// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Wanderly backend client.
//!
//! Handles:
//! - Login, registration and verification (unauthenticated)
//! - Markers, routes and AR models per city
//! - Route editing: generate, save, branch, delete
//! - Completion records, preferences, profile and statistics

use crate::error::ApiError;
use crate::models::{
    ArModel, AuthRequest, AuthTokens, Marker, ModelCompletionRequest, Route, RouteCompletion,
    Statistics, UserDto, UserPreferences, UserProfile,
};
use crate::services::backend::RouteBackend;
use crate::services::gateway::{to_body, ApiClient};
use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use std::fmt::Display;
use uuid::Uuid;

/// Body of `POST geo/routes/branch`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRequest {
    pub route_id: Uuid,
    pub marker_index: usize,
}

/// Typed wrapper over the gateway for every backend endpoint.
#[derive(Clone)]
pub struct WanderlyApi {
    client: ApiClient,
}

impl WanderlyApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    // ─── Auth ───────────────────────────────────────────────────────────────

    /// Log in and store the returned credential pair in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthTokens, ApiError> {
        let request = AuthRequest::credentials(email, password);
        let tokens = self.authenticate("auth/login", &request).await?;
        tracing::info!("Logged in");
        Ok(tokens)
    }

    /// Start registration; the backend emails a verification code.
    pub async fn register(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let request = AuthRequest::credentials(email, password);
        request.check().map_err(ApiError::Validation)?;
        let body = to_body(&request)?;
        self.client
            .call_void("auth/register", Method::POST, Some(&body), false)
            .await
    }

    /// Finish registration with the emailed code and sign in.
    pub async fn verify_registration(
        &self,
        email: &str,
        password: &str,
        code: &str,
    ) -> Result<AuthTokens, ApiError> {
        let request = AuthRequest::verification(email, password, code);
        let tokens = self.authenticate("auth/verify-registration", &request).await?;
        tracing::info!("Registration verified");
        Ok(tokens)
    }

    async fn authenticate(
        &self,
        endpoint: &str,
        request: &AuthRequest,
    ) -> Result<AuthTokens, ApiError> {
        request.check().map_err(ApiError::Validation)?;
        let body = to_body(request)?;
        let tokens: AuthTokens = self
            .client
            .call_data(endpoint, Method::POST, Some(&body), false)
            .await?;
        self.client.session().login(&tokens)?;
        Ok(tokens)
    }

    pub fn logout(&self) {
        self.client.session().logout();
    }

    pub async fn me(&self) -> Result<UserDto, ApiError> {
        self.get("auth/me").await
    }

    // ─── Geo ────────────────────────────────────────────────────────────────

    pub async fn markers(&self, city_id: Uuid) -> Result<Vec<Marker>, ApiError> {
        self.get(&path("geo/markers", city_id)).await
    }

    pub async fn routes(&self, city_id: Uuid) -> Result<Vec<Route>, ApiError> {
        self.get(&path("geo/routes", city_id)).await
    }

    pub async fn generate_route(&self, city_id: Uuid) -> Result<Route, ApiError> {
        self.get(&path("geo/routes/generate", city_id)).await
    }

    pub async fn save_route(&self, route: &Route) -> Result<Route, ApiError> {
        self.post("geo/routes", route).await
    }

    pub async fn branch_route(&self, route_id: Uuid, marker_index: usize) -> Result<Route, ApiError> {
        let request = BranchRequest {
            route_id,
            marker_index,
        };
        self.post("geo/routes/branch", &request).await
    }

    pub async fn delete_route(&self, route_id: Uuid) -> Result<(), ApiError> {
        self.client
            .call_void(&path("geo/routes", route_id), Method::DELETE, None, true)
            .await
    }

    pub async fn ar_models(&self, city_id: Uuid) -> Result<Vec<ArModel>, ApiError> {
        self.get(&path("geo/ar-models", city_id)).await
    }

    pub async fn verify_model(&self, model_id: Uuid, code: i32) -> Result<(), ApiError> {
        let body = to_body(&ModelCompletionRequest { model_id, code })?;
        self.client
            .call_void("geo/ar-models/verify", Method::POST, Some(&body), true)
            .await
    }

    pub async fn preferences(&self) -> Result<UserPreferences, ApiError> {
        self.get("geo/me").await
    }

    pub async fn save_preferences(
        &self,
        preferences: &UserPreferences,
    ) -> Result<UserPreferences, ApiError> {
        self.post("geo/me", preferences).await
    }

    // ─── User ───────────────────────────────────────────────────────────────

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get("user/me").await
    }

    pub async fn save_profile(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        self.post("user/me", profile).await
    }

    pub async fn route_completion(
        &self,
        route_id: Uuid,
    ) -> Result<Option<RouteCompletion>, ApiError> {
        self.client
            .call(&path("user/completions/routes", route_id), Method::GET, None, true)
            .await
    }

    pub async fn save_route_completion(&self, completion: &RouteCompletion) -> Result<(), ApiError> {
        let body = to_body(completion)?;
        self.client
            .call_void("user/completions/routes", Method::POST, Some(&body), true)
            .await
    }

    pub async fn model_completion(&self, model_id: Uuid) -> Result<bool, ApiError> {
        let completed: Option<bool> = self
            .client
            .call(&path("user/completions/ar-models", model_id), Method::GET, None, true)
            .await?;
        Ok(completed.unwrap_or(false))
    }

    pub async fn statistics(&self) -> Result<Statistics, ApiError> {
        self.get("user/statistics").await
    }

    // ─── Helpers ────────────────────────────────────────────────────────────

    async fn get<T: serde::de::DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.client.call_data(endpoint, Method::GET, None, true).await
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_body(body)?;
        self.client
            .call_data(endpoint, Method::POST, Some(&body), true)
            .await
    }
}

/// Join a path prefix and an encoded id segment.
fn path(prefix: &str, id: impl Display) -> String {
    format!("{}/{}", prefix, urlencoding::encode(&id.to_string()))
}

#[async_trait]
impl RouteBackend for WanderlyApi {
    async fn markers(&self, city_id: Uuid) -> Result<Vec<Marker>, ApiError> {
        WanderlyApi::markers(self, city_id).await
    }

    async fn ar_models(&self, city_id: Uuid) -> Result<Vec<ArModel>, ApiError> {
        WanderlyApi::ar_models(self, city_id).await
    }

    async fn routes(&self, city_id: Uuid) -> Result<Vec<Route>, ApiError> {
        WanderlyApi::routes(self, city_id).await
    }

    async fn generate_route(&self, city_id: Uuid) -> Result<Route, ApiError> {
        WanderlyApi::generate_route(self, city_id).await
    }

    async fn save_route(&self, route: &Route) -> Result<Route, ApiError> {
        WanderlyApi::save_route(self, route).await
    }

    async fn branch_route(&self, route_id: Uuid, marker_index: usize) -> Result<Route, ApiError> {
        WanderlyApi::branch_route(self, route_id, marker_index).await
    }

    async fn delete_route(&self, route_id: Uuid) -> Result<(), ApiError> {
        WanderlyApi::delete_route(self, route_id).await
    }

    async fn route_completion(&self, route_id: Uuid) -> Result<Option<RouteCompletion>, ApiError> {
        WanderlyApi::route_completion(self, route_id).await
    }

    async fn save_route_completion(&self, completion: &RouteCompletion) -> Result<(), ApiError> {
        WanderlyApi::save_route_completion(self, completion).await
    }

    async fn model_completion(&self, model_id: Uuid) -> Result<bool, ApiError> {
        WanderlyApi::model_completion(self, model_id).await
    }

    async fn verify_model(&self, model_id: Uuid, code: i32) -> Result<(), ApiError> {
        WanderlyApi::verify_model(self, model_id, code).await
    }
}
