// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route playback tracker.
//!
//! Owns everything the map screen shows for one city: markers, AR models,
//! routes with their drawable projections, and per-route progress. Every
//! operation takes `&mut self`, so one tracker can never run two loads (or
//! any two transitions) at once.
//!
//! Handles:
//! - Loading a city and drawing its routes
//! - Advancing through a route and persisting completion
//! - Branching, editing, deleting and adding routes
//! - AR challenge verification
//! - Mirroring playback to the companion device

use crate::error::{Result, TrackerError};
use crate::models::{
    ArModel, Marker, Progress, ProgressStatus, Route, RouteCompletion, RouteStatus, TravelType,
};
use crate::services::backend::RouteBackend;
use crate::services::companion::{CompanionChannel, CompanionMessage, CompanionRequest};
use crate::services::directions::DirectionsProvider;
use crate::services::drawable::{ColorRotation, DrawableRoute};
use crate::services::markers::{visible_markers, MapRegion};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Result of an AR challenge verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Verified,
    AlreadyCompleted,
    /// Entered code didn't match; nothing was sent.
    CodeMismatch,
}

pub struct RouteTracker {
    backend: Arc<dyn RouteBackend>,
    directions: Arc<dyn DirectionsProvider>,
    companion: Arc<dyn CompanionChannel>,
    travel_type: TravelType,

    city_id: Option<Uuid>,
    has_loaded: bool,
    markers: Vec<Marker>,
    ar_models: Vec<ArModel>,
    /// Raw routes; `drawables[i]` is always the projection of `routes[i]`.
    routes: Vec<Route>,
    drawables: Vec<DrawableRoute>,
    progress: HashMap<Uuid, Progress>,
    colors: ColorRotation,

    selected: Option<usize>,
    playing: bool,
}

impl RouteTracker {
    pub fn new(
        backend: Arc<dyn RouteBackend>,
        directions: Arc<dyn DirectionsProvider>,
        companion: Arc<dyn CompanionChannel>,
        travel_type: TravelType,
    ) -> Self {
        Self {
            backend,
            directions,
            companion,
            travel_type,
            city_id: None,
            has_loaded: false,
            markers: Vec::new(),
            ar_models: Vec::new(),
            routes: Vec::new(),
            drawables: Vec::new(),
            progress: HashMap::new(),
            colors: ColorRotation::default(),
            selected: None,
            playing: false,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────────

    pub fn city_id(&self) -> Option<Uuid> {
        self.city_id
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn ar_models(&self) -> &[ArModel] {
        &self.ar_models
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn drawables(&self) -> &[DrawableRoute] {
        &self.drawables
    }

    pub fn drawable(&self, route_id: Uuid) -> Option<&DrawableRoute> {
        self.drawables.iter().find(|d| d.route.id == route_id)
    }

    /// Progress for a route; routes without state are not started.
    pub fn progress(&self, route_id: Uuid) -> Progress {
        self.progress.get(&route_id).copied().unwrap_or_default()
    }

    pub fn status(&self, route_id: Uuid) -> Option<ProgressStatus> {
        let route = self.routes.iter().find(|r| r.id == route_id)?;
        let status = match route.last_index() {
            Some(last) => self.progress(route_id).status(last),
            None => ProgressStatus::NotStarted,
        };
        Some(status)
    }

    pub fn selected_route(&self) -> Option<&DrawableRoute> {
        self.selected.and_then(|i| self.drawables.get(i))
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// City markers to draw in the current viewport.
    pub fn visible_markers(&self, region: Option<&MapRegion>) -> Vec<&Marker> {
        visible_markers(&self.markers, region)
    }

    // ─── Loading ─────────────────────────────────────────────────────────────

    /// Load a city the first time only; later calls are no-ops.
    pub async fn initial_load(&mut self, city_id: Uuid) -> Result<()> {
        if self.has_loaded {
            return Ok(());
        }
        self.load(city_id).await
    }

    /// Reload the current city.
    pub async fn reload(&mut self) -> Result<()> {
        let city_id = self.city_id.ok_or(TrackerError::NoCityLoaded)?;
        self.load(city_id).await
    }

    /// Fetch markers, AR models and routes for a city and rebuild all state.
    ///
    /// Failing to fetch any of the three lists aborts with state unchanged.
    /// Directions and completion lookups are best-effort.
    pub async fn load(&mut self, city_id: Uuid) -> Result<()> {
        tracing::info!(%city_id, "Loading city");

        let markers = self.backend.markers(city_id).await?;
        let mut ar_models = self.backend.ar_models(city_id).await?;
        let routes = self.backend.routes(city_id).await?;

        let mut drawables = Vec::with_capacity(routes.len());
        for route in &routes {
            drawables.push(self.draw(route.clone()).await);
        }

        let mut progress = HashMap::with_capacity(routes.len());
        for route in &routes {
            progress.insert(route.id, self.fetch_progress(route).await);
        }

        for model in &mut ar_models {
            match self.backend.model_completion(model.id).await {
                Ok(completed) => model.completed = Some(completed),
                Err(e) => {
                    tracing::warn!(model_id = %model.id, error = %e, "Failed to load model completion");
                }
            }
        }

        tracing::info!(
            %city_id,
            markers = markers.len(),
            routes = routes.len(),
            ar_models = ar_models.len(),
            "City loaded"
        );

        self.city_id = Some(city_id);
        self.has_loaded = true;
        self.markers = markers;
        self.ar_models = ar_models;
        self.routes = routes;
        self.drawables = drawables;
        self.progress = progress;
        self.stop_playback();
        self.selected = None;
        Ok(())
    }

    // ─── Progress ────────────────────────────────────────────────────────────

    /// Complete the marker being approached.
    ///
    /// On the final marker the route becomes DONE, and playback stops if it
    /// is the selected route. Otherwise the step is persisted as IN_PROGRESS
    /// and the next marker becomes the target. Local state only changes once
    /// the backend has accepted the completion. Only the selected route
    /// reaches the companion.
    pub async fn advance(&mut self, route_id: Uuid) -> Result<Progress> {
        let index = self.route_index(route_id)?;
        let route = &self.routes[index];
        let last = route.last_index().ok_or(TrackerError::EmptyRoute(route_id))?;
        let total = route.markers.len();
        let current = self.progress(route_id);

        if current.status(last) == ProgressStatus::Done {
            tracing::debug!(%route_id, "Route already done");
            return Ok(current);
        }

        if current.visiting >= last {
            self.save_completion(route_id, RouteStatus::Done, last).await?;

            let done = Progress {
                visited: Some(last),
                visiting: last,
            };
            self.progress.insert(route_id, done);
            if self.selected == Some(index) {
                self.playing = false;
                self.companion.send(CompanionMessage::stopped());
            }

            tracing::info!(%route_id, step = last, "Route finished");
            return Ok(done);
        }

        let step = current.visiting;
        self.save_completion(route_id, RouteStatus::InProgress, step)
            .await?;

        let next = Progress {
            visited: Some(step),
            visiting: step + 1,
        };
        self.progress.insert(route_id, next);
        if self.selected == Some(index) {
            self.companion
                .send(CompanionMessage::progress(index + 1, next.visiting, total));
        }

        tracing::debug!(%route_id, visited = step, visiting = next.visiting, "Route advanced");
        Ok(next)
    }

    async fn save_completion(&self, route_id: Uuid, status: RouteStatus, step: usize) -> Result<()> {
        let completion = RouteCompletion {
            status,
            step: i32::try_from(step).map_err(|_| TrackerError::InvalidMarkerIndex {
                route_id,
                index: step,
            })?,
            route_id,
        };
        self.backend.save_route_completion(&completion).await?;
        Ok(())
    }

    // ─── Route editing ───────────────────────────────────────────────────────

    /// Regenerate the markers after `from_marker_index`, keeping earlier ones.
    pub async fn branch(&mut self, route_id: Uuid, from_marker_index: usize) -> Result<()> {
        let index = self.route_index(route_id)?;
        if from_marker_index >= self.routes[index].markers.len() {
            return Err(TrackerError::InvalidMarkerIndex {
                route_id,
                index: from_marker_index,
            });
        }

        let route = self
            .backend
            .branch_route(route_id, from_marker_index)
            .await?;
        tracing::info!(%route_id, from = from_marker_index, markers = route.markers.len(), "Route branched");
        self.replace_route(index, route).await;
        Ok(())
    }

    /// Save a client-reordered (and possibly pruned) marker list.
    pub async fn save_edits(&mut self, route_id: Uuid, markers: Vec<Marker>) -> Result<()> {
        let index = self.route_index(route_id)?;
        if markers.is_empty() {
            return Err(TrackerError::EmptyRoute(route_id));
        }

        let mut edited = self.routes[index].clone();
        edited.set_markers(markers);
        let saved = self.backend.save_route(&edited).await?;
        tracing::info!(%route_id, markers = saved.markers.len(), "Route edits saved");
        self.replace_route(index, saved).await;
        Ok(())
    }

    pub async fn delete(&mut self, route_id: Uuid) -> Result<()> {
        let index = self.route_index(route_id)?;
        self.backend.delete_route(route_id).await?;

        self.routes.remove(index);
        self.drawables.remove(index);
        self.progress.remove(&route_id);

        match self.selected {
            Some(i) if i == index => {
                self.selected = None;
                if self.playing {
                    self.playing = false;
                    self.companion.send(CompanionMessage::stopped());
                }
            }
            Some(i) if i > index => self.selected = Some(i - 1),
            _ => {}
        }

        tracing::info!(%route_id, "Route deleted");
        Ok(())
    }

    /// Generate one more route for the city. Returns its id.
    pub async fn add(&mut self, city_id: Uuid) -> Result<Uuid> {
        let route = self.backend.generate_route(city_id).await?;
        let route_id = route.id;
        let drawable = self.draw(route.clone()).await;

        self.routes.push(route);
        self.drawables.push(drawable);
        self.progress.insert(route_id, Progress::not_started());

        tracing::info!(%route_id, %city_id, "Route generated");
        Ok(route_id)
    }

    /// Swap in a new version of the route at `index` and rebuild what depends
    /// on its markers.
    async fn replace_route(&mut self, index: usize, route: Route) {
        let drawable = self.draw(route.clone()).await;
        let progress = self.fetch_progress(&route).await;

        let old_id = self.routes[index].id;
        if old_id != route.id {
            self.progress.remove(&old_id);
        }
        self.progress.insert(route.id, progress);
        self.routes[index] = route;
        self.drawables[index] = drawable;
    }

    async fn draw(&mut self, route: Route) -> DrawableRoute {
        let color = self.colors.next_color();
        DrawableRoute::build(route, self.directions.as_ref(), self.travel_type, color).await
    }

    /// Progress from the backend record, or not started if it can't be read.
    async fn fetch_progress(&self, route: &Route) -> Progress {
        match self.backend.route_completion(route.id).await {
            Ok(record) => Progress::from_record(record.as_ref(), route.last_index()),
            Err(e) => {
                tracing::warn!(route_id = %route.id, error = %e, "Failed to load route completion");
                Progress::not_started()
            }
        }
    }

    fn route_index(&self, route_id: Uuid) -> Result<usize> {
        self.routes
            .iter()
            .position(|r| r.id == route_id)
            .ok_or(TrackerError::UnknownRoute(route_id))
    }

    // ─── AR challenges ───────────────────────────────────────────────────────

    /// Check an entered code and, if it matches, confirm with the backend.
    pub async fn verify_ar_model(&mut self, model_id: Uuid, entered_code: i32) -> Result<VerifyOutcome> {
        let model = self
            .ar_models
            .iter()
            .find(|m| m.id == model_id)
            .ok_or(TrackerError::UnknownModel(model_id))?;

        if model.is_completed() {
            return Ok(VerifyOutcome::AlreadyCompleted);
        }
        if model.code != entered_code {
            tracing::debug!(%model_id, "AR code mismatch");
            return Ok(VerifyOutcome::CodeMismatch);
        }

        self.backend.verify_model(model_id, entered_code).await?;

        if let Some(model) = self.ar_models.iter_mut().find(|m| m.id == model_id) {
            model.completed = Some(true);
        }
        tracing::info!(%model_id, "AR model completed");
        Ok(VerifyOutcome::Verified)
    }

    // ─── Playback ────────────────────────────────────────────────────────────

    /// Select the route at `index` (display order). Stops any playback.
    pub fn select_route(&mut self, index: usize) -> Result<()> {
        if index >= self.drawables.len() {
            return Err(TrackerError::InvalidRouteIndex(index));
        }
        self.stop_playback();
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.stop_playback();
        self.selected = None;
    }

    /// Start playing the selected route and tell the companion where we are.
    pub fn play(&mut self) -> Result<()> {
        let index = self.selected.ok_or(TrackerError::NoRouteSelected)?;
        let drawable = self
            .drawables
            .get(index)
            .ok_or(TrackerError::InvalidRouteIndex(index))?;
        let progress = self.progress(drawable.route.id);

        self.playing = true;
        self.companion.send(CompanionMessage::progress(
            index + 1,
            progress.visiting,
            drawable.marker_count(),
        ));
        Ok(())
    }

    pub fn pause(&mut self) {
        self.stop_playback();
    }

    /// The app is leaving the foreground.
    pub fn enter_background(&self) {
        self.companion.send(CompanionMessage::stopped());
    }

    fn stop_playback(&mut self) {
        if self.playing {
            self.playing = false;
            self.companion.send(CompanionMessage::stopped());
        }
    }

    /// Handle a request from the companion device.
    ///
    /// Next advances the selected route exactly like the local Next button.
    /// Returns `None` when no route is selected.
    pub async fn handle_companion_request(
        &mut self,
        request: CompanionRequest,
    ) -> Result<Option<Progress>> {
        match request {
            CompanionRequest::NextStep => {
                let Some(route_id) = self.selected_route().map(|d| d.route.id) else {
                    tracing::debug!("Companion requested next step with no route selected");
                    return Ok(None);
                };
                self.advance(route_id).await.map(Some)
            }
        }
    }
}
