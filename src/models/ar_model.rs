// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! AR "treasure" challenge models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A location-bound AR challenge unlocked by a numeric code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArModel {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub code: i32,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl ArModel {
    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// Body of `POST geo/ar-models/verify`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelCompletionRequest {
    pub model_id: Uuid,
    pub code: i32,
}
