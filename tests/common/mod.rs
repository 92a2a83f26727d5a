// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use geo::{Coord, LineString};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;
use uuid::Uuid;
use wanderly_core::db::{MemoryTokenStore, TokenStore, TokenStoreError};
use wanderly_core::error::ApiError;
use wanderly_core::models::{
    ArModel, AuthTokens, Marker, Route, RouteCompletion, TravelType,
};
use wanderly_core::services::{
    ApiClient, CompanionChannel, CompanionMessage, DirectionsError, DirectionsProvider,
    HttpRequest, HttpResponse, Leg, RouteBackend, Session, Transport,
};

pub const BASE_URL: &str = "http://wanderly.test/api";

// ─── HTTP ────────────────────────────────────────────────────────────────────

/// Build a response with the backend's envelope.
#[allow(dead_code)]
pub fn envelope(code: u16, status: &str, message: &str, data: Value) -> HttpResponse {
    let body = json!({
        "status": status,
        "message": message,
        "data": data,
        "metadata": null,
    });
    HttpResponse {
        status: code,
        body: body.to_string().into_bytes(),
    }
}

#[allow(dead_code)]
pub fn ok(data: Value) -> HttpResponse {
    envelope(200, "success", "ok", data)
}

#[allow(dead_code)]
pub fn jwt_expired() -> HttpResponse {
    envelope(401, "error-jwt", "JWT expired", Value::Null)
}

#[allow(dead_code)]
pub fn tokens(access: &str, refresh: &str) -> AuthTokens {
    AuthTokens {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
    }
}

type Handler = dyn Fn(&HttpRequest) -> HttpResponse + Send + Sync;

/// Transport that answers from a closure and records every request.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
    /// Requests carrying this bearer wait for each other before answering.
    gate: Option<(String, Barrier)>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> HttpResponse + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    /// Hold `parties` requests bearing `token` until all have arrived.
    pub fn with_gate(mut self, token: &str, parties: usize) -> Self {
        self.gate = Some((token.to_string(), Barrier::new(parties)));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count_path(&self, suffix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.url.ends_with(suffix))
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some((token, barrier)) = &self.gate {
            if request.bearer.as_deref() == Some(token.as_str()) {
                barrier.wait().await;
            }
        }
        Ok((self.handler)(&request))
    }
}

/// Token store that counts how often it was cleared.
#[derive(Default)]
pub struct CountingTokenStore {
    inner: MemoryTokenStore,
    pub clears: AtomicUsize,
    /// Make every `save` fail with an I/O error.
    pub fail_saves: AtomicBool,
}

#[allow(dead_code)]
impl CountingTokenStore {
    pub fn with_tokens(tokens: AuthTokens) -> Self {
        Self {
            inner: MemoryTokenStore::with_tokens(tokens),
            ..Self::default()
        }
    }

    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl TokenStore for CountingTokenStore {
    fn access_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.inner.access_token()
    }

    fn refresh_token(&self) -> Result<Option<String>, TokenStoreError> {
        self.inner.refresh_token()
    }

    fn save(&self, tokens: &AuthTokens) -> Result<(), TokenStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(std::io::Error::other("disk full").into());
        }
        self.inner.save(tokens)
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

/// Client over a scripted transport and a counting store.
#[allow(dead_code)]
pub fn test_client(
    transport: ScriptedTransport,
    stored: Option<AuthTokens>,
) -> (ApiClient, Arc<ScriptedTransport>, Arc<CountingTokenStore>) {
    let store = Arc::new(match stored {
        Some(t) => CountingTokenStore::with_tokens(t),
        None => CountingTokenStore::default(),
    });
    let transport = Arc::new(transport);
    let session = Session::new(store.clone());
    let client = ApiClient::new(transport.clone(), session, BASE_URL);
    (client, transport, store)
}

// ─── Domain fixtures ─────────────────────────────────────────────────────────

#[allow(dead_code)]
pub fn marker(name: &str, latitude: f64, longitude: f64) -> Marker {
    Marker {
        id: Uuid::new_v4(),
        latitude,
        longitude,
        name: name.to_string(),
        tag: "MUSEUM".to_string(),
        category: "CULTURE".to_string(),
        order_index: None,
        staying_time: Some(15),
        rating: 4.5,
    }
}

/// Route with `n` markers spaced ~111 m apart going north.
#[allow(dead_code)]
pub fn route(n: usize) -> Route {
    let markers = (0..n)
        .map(|i| marker(&format!("Stop {}", i + 1), 49.84 + i as f64 * 0.001, 24.03))
        .collect();
    let mut route = Route {
        id: Uuid::new_v4(),
        category: "CULTURE".to_string(),
        avg_time: 90,
        markers: Vec::new(),
    };
    route.set_markers(markers);
    route
}

#[allow(dead_code)]
pub fn ar_model(code: i32) -> ArModel {
    ArModel {
        id: Uuid::new_v4(),
        latitude: 49.841,
        longitude: 24.031,
        code,
        completed: None,
    }
}

// ─── Backend ─────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct FakeState {
    pub markers: Vec<Marker>,
    pub ar_models: Vec<ArModel>,
    pub routes: Vec<Route>,
    pub completions: HashMap<Uuid, RouteCompletion>,
    pub model_completions: HashMap<Uuid, bool>,
    /// Routes handed out by `generate_route`, in order.
    pub generated: Vec<Route>,
    /// Markers appended after the branch point by `branch_route`.
    pub branch_tail: Vec<Marker>,
    pub verified: Vec<(Uuid, i32)>,
    pub calls: Vec<String>,
}

/// In-memory backend with failure switches.
#[derive(Default)]
pub struct FakeBackend {
    pub state: Mutex<FakeState>,
    pub fail_routes: AtomicBool,
    pub fail_save_completion: AtomicBool,
    pub fail_completion_lookup: AtomicBool,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn with_routes(routes: Vec<Route>) -> Self {
        let backend = Self::default();
        backend.state.lock().unwrap().routes = routes;
        backend
    }

    pub fn calls(&self, name: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.as_str() == name)
            .count()
    }

    pub fn completion(&self, route_id: Uuid) -> Option<RouteCompletion> {
        self.state.lock().unwrap().completions.get(&route_id).cloned()
    }

    fn record(&self, name: &str) -> std::sync::MutexGuard<'_, FakeState> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(name.to_string());
        state
    }
}

fn server_error(message: &str) -> ApiError {
    ApiError::Server {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl RouteBackend for FakeBackend {
    async fn markers(&self, _city_id: Uuid) -> Result<Vec<Marker>, ApiError> {
        Ok(self.record("markers").markers.clone())
    }

    async fn ar_models(&self, _city_id: Uuid) -> Result<Vec<ArModel>, ApiError> {
        Ok(self.record("ar_models").ar_models.clone())
    }

    async fn routes(&self, _city_id: Uuid) -> Result<Vec<Route>, ApiError> {
        let state = self.record("routes");
        if self.fail_routes.load(Ordering::SeqCst) {
            return Err(server_error("routes unavailable"));
        }
        Ok(state.routes.clone())
    }

    async fn generate_route(&self, _city_id: Uuid) -> Result<Route, ApiError> {
        let mut state = self.record("generate_route");
        if state.generated.is_empty() {
            return Err(server_error("no more routes"));
        }
        let route = state.generated.remove(0);
        state.routes.push(route.clone());
        Ok(route)
    }

    async fn save_route(&self, route: &Route) -> Result<Route, ApiError> {
        let mut state = self.record("save_route");
        let stored = state
            .routes
            .iter_mut()
            .find(|r| r.id == route.id)
            .ok_or_else(|| server_error("Route not found"))?;
        *stored = route.clone();
        Ok(route.clone())
    }

    async fn branch_route(&self, route_id: Uuid, marker_index: usize) -> Result<Route, ApiError> {
        let mut state = self.record("branch_route");
        let tail = state.branch_tail.clone();
        let stored = state
            .routes
            .iter_mut()
            .find(|r| r.id == route_id)
            .ok_or_else(|| server_error("Route not found"))?;
        let mut markers: Vec<Marker> = stored.markers[..=marker_index].to_vec();
        markers.extend(tail);
        stored.set_markers(markers);
        Ok(stored.clone())
    }

    async fn delete_route(&self, route_id: Uuid) -> Result<(), ApiError> {
        let mut state = self.record("delete_route");
        state.routes.retain(|r| r.id != route_id);
        state.completions.remove(&route_id);
        Ok(())
    }

    async fn route_completion(&self, route_id: Uuid) -> Result<Option<RouteCompletion>, ApiError> {
        let state = self.record("route_completion");
        if self.fail_completion_lookup.load(Ordering::SeqCst) {
            return Err(server_error("completions unavailable"));
        }
        Ok(state.completions.get(&route_id).cloned())
    }

    async fn save_route_completion(&self, completion: &RouteCompletion) -> Result<(), ApiError> {
        let mut state = self.record("save_route_completion");
        if self.fail_save_completion.load(Ordering::SeqCst) {
            return Err(server_error("write failed"));
        }
        state
            .completions
            .insert(completion.route_id, completion.clone());
        Ok(())
    }

    async fn model_completion(&self, model_id: Uuid) -> Result<bool, ApiError> {
        let state = self.record("model_completion");
        Ok(state
            .model_completions
            .get(&model_id)
            .copied()
            .unwrap_or(false))
    }

    async fn verify_model(&self, model_id: Uuid, code: i32) -> Result<(), ApiError> {
        let mut state = self.record("verify_model");
        state.verified.push((model_id, code));
        state.model_completions.insert(model_id, true);
        Ok(())
    }
}

// ─── Directions and companion ────────────────────────────────────────────────

/// Every leg is a straight segment with a fixed distance and time.
pub struct FixedDirections {
    pub leg_distance: f64,
    pub leg_time: f64,
    /// Legs starting at these (latitude, longitude) points fail.
    pub failing_from: Vec<(f64, f64)>,
    pub requests: AtomicUsize,
}

impl Default for FixedDirections {
    fn default() -> Self {
        Self {
            leg_distance: 100.0,
            leg_time: 60.0,
            failing_from: Vec::new(),
            requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl DirectionsProvider for FixedDirections {
    async fn leg(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
        _travel_type: TravelType,
    ) -> Result<Leg, DirectionsError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if self
            .failing_from
            .iter()
            .any(|&(lat, lon)| from.y == lat && from.x == lon)
        {
            return Err(DirectionsError::NoRoute);
        }
        Ok(Leg {
            path: LineString::from(vec![from, to]),
            distance: self.leg_distance,
            expected_travel_time: self.leg_time,
        })
    }
}

/// Companion that keeps every message sent to it.
#[derive(Default)]
pub struct RecordingCompanion {
    pub messages: Mutex<Vec<CompanionMessage>>,
}

#[allow(dead_code)]
impl RecordingCompanion {
    pub fn messages(&self) -> Vec<CompanionMessage> {
        self.messages.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<CompanionMessage> {
        self.messages.lock().unwrap().last().copied()
    }
}

impl CompanionChannel for RecordingCompanion {
    fn send(&self, message: CompanionMessage) {
        self.messages.lock().unwrap().push(message);
    }
}
