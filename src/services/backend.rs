//! Backend operations the route tracker depends on.

use crate::error::ApiError;
use crate::models::{ArModel, Marker, Route, RouteCompletion};
use async_trait::async_trait;
use uuid::Uuid;

/// Route, marker and completion persistence as seen by the tracker.
#[async_trait]
pub trait RouteBackend: Send + Sync {
    async fn markers(&self, city_id: Uuid) -> Result<Vec<Marker>, ApiError>;

    async fn ar_models(&self, city_id: Uuid) -> Result<Vec<ArModel>, ApiError>;

    async fn routes(&self, city_id: Uuid) -> Result<Vec<Route>, ApiError>;

    /// Ask the backend for one freshly generated route.
    async fn generate_route(&self, city_id: Uuid) -> Result<Route, ApiError>;

    /// Persist a client-edited route; returns the stored version.
    async fn save_route(&self, route: &Route) -> Result<Route, ApiError>;

    /// Regenerate markers after `marker_index`, keeping earlier ones.
    async fn branch_route(&self, route_id: Uuid, marker_index: usize) -> Result<Route, ApiError>;

    async fn delete_route(&self, route_id: Uuid) -> Result<(), ApiError>;

    /// Persisted completion record, `None` if the user never started the route.
    async fn route_completion(&self, route_id: Uuid) -> Result<Option<RouteCompletion>, ApiError>;

    async fn save_route_completion(&self, completion: &RouteCompletion) -> Result<(), ApiError>;

    async fn model_completion(&self, model_id: Uuid) -> Result<bool, ApiError>;

    async fn verify_model(&self, model_id: Uuid, code: i32) -> Result<(), ApiError>;
}
