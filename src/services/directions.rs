// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Directions between consecutive markers.

use crate::models::TravelType;
use async_trait::async_trait;
use geo::{Coord, Distance, Haversine, LineString, Point};

/// Average walking speed (m/s).
const WALKING_SPEED_MPS: f64 = 1.4;
/// Average urban driving speed (m/s), about 40 km/h.
const DRIVING_SPEED_MPS: f64 = 11.1;

/// One resolved leg between two markers.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    pub path: LineString<f64>,
    /// Meters
    pub distance: f64,
    /// Seconds
    pub expected_travel_time: f64,
}

/// Source of turn-by-turn geometry and estimates.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn leg(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
        travel_type: TravelType,
    ) -> Result<Leg, DirectionsError>;
}

/// Directions as the crow flies: a two-point path with haversine distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct StraightLineDirections;

#[async_trait]
impl DirectionsProvider for StraightLineDirections {
    async fn leg(
        &self,
        from: Coord<f64>,
        to: Coord<f64>,
        travel_type: TravelType,
    ) -> Result<Leg, DirectionsError> {
        if ![from.x, from.y, to.x, to.y].iter().all(|v| v.is_finite()) {
            return Err(DirectionsError::NoRoute);
        }

        let distance = Haversine.distance(Point::from(from), Point::from(to));
        let speed = match travel_type {
            TravelType::Foot => WALKING_SPEED_MPS,
            TravelType::Car => DRIVING_SPEED_MPS,
        };

        Ok(Leg {
            path: LineString::from(vec![from, to]),
            distance,
            expected_travel_time: distance / speed,
        })
    }
}

/// Errors from directions lookups.
#[derive(Debug, thiserror::Error)]
pub enum DirectionsError {
    #[error("No route between the given points")]
    NoRoute,
}
