// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - gateway, backend client and route tracking.

pub mod api;
pub mod backend;
pub mod companion;
pub mod directions;
pub mod drawable;
pub mod gateway;
pub mod markers;
pub mod session;
pub mod tracker;
pub mod transport;

pub use api::WanderlyApi;
pub use backend::RouteBackend;
pub use companion::{
    CompanionChannel, CompanionDevice, CompanionMessage, CompanionRequest, LinkedCompanion,
    NullCompanion,
};
pub use directions::{DirectionsError, DirectionsProvider, Leg, StraightLineDirections};
pub use drawable::{ColorRotation, DrawableRoute, RouteColor, ROUTE_PALETTE};
pub use gateway::{ApiClient, Envelope};
pub use markers::{visible_markers, MapRegion};
pub use session::{AuthState, Session};
pub use tracker::{RouteTracker, VerifyOutcome};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
