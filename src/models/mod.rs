// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod ar_model;
pub mod completion;
pub mod route;
pub mod stats;
pub mod user;

pub use ar_model::{ArModel, ModelCompletionRequest};
pub use completion::{Progress, ProgressStatus, RouteCompletion, RouteStatus};
pub use route::{Marker, MarkerColor, MarkerStyle, Route};
pub use stats::{CityStatistics, Statistics};
pub use user::{
    ActivityType, AuthRequest, AuthTokens, City, RefreshRequest, TravelType, UserDto,
    UserPreferences, UserProfile,
};
