// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Drawable routes: path geometry, color and aggregates for a route.

use crate::models::{Route, TravelType};
use crate::services::directions::DirectionsProvider;
use geo::{Coord, LineString};

/// HSB color used to paint a route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteColor {
    pub hue: f64,
    pub saturation: f64,
    pub brightness: f64,
}

impl RouteColor {
    const fn hsb(hue: f64, saturation: f64, brightness: f64) -> Self {
        Self {
            hue,
            saturation,
            brightness,
        }
    }
}

/// Fixed palette routes rotate through.
pub const ROUTE_PALETTE: [RouteColor; 5] = [
    RouteColor::hsb(0.15, 0.85, 0.65), // yellow-orange
    RouteColor::hsb(0.55, 0.8, 0.7),   // teal
    RouteColor::hsb(0.75, 0.7, 0.6),   // purple-blue
    RouteColor::hsb(0.03, 0.9, 0.6),   // reddish-orange
    RouteColor::hsb(0.95, 0.8, 0.65),  // magenta
];

/// Rotating color picker. Never resets, so consecutive routes differ.
#[derive(Debug, Default, Clone)]
pub struct ColorRotation {
    next: usize,
}

impl ColorRotation {
    pub fn next_color(&mut self) -> RouteColor {
        let color = ROUTE_PALETTE[self.next % ROUTE_PALETTE.len()];
        self.next = self.next.wrapping_add(1);
        color
    }
}

/// Client-side rendering projection of a route.
#[derive(Debug, Clone)]
pub struct DrawableRoute {
    pub route: Route,
    /// Concatenated leg paths; may have gaps where a leg failed to resolve
    pub path: LineString<f64>,
    pub color: RouteColor,
    /// Meters, over resolved legs only
    pub total_distance: f64,
    /// Seconds, over resolved legs only
    pub expected_travel_time: f64,
    pub resolved_legs: usize,
}

impl DrawableRoute {
    /// Resolve every consecutive marker pair, in order, and stitch the legs.
    ///
    /// A leg that fails is skipped and logged; the route is still drawn.
    pub async fn build(
        route: Route,
        directions: &dyn DirectionsProvider,
        travel_type: TravelType,
        color: RouteColor,
    ) -> Self {
        let mut coords: Vec<Coord<f64>> = Vec::new();
        let mut total_distance = 0.0;
        let mut expected_travel_time = 0.0;
        let mut resolved_legs = 0;

        for pair in route.markers.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);
            match directions.leg(from.coord(), to.coord(), travel_type).await {
                Ok(leg) => {
                    let mut leg_coords = leg.path.0.into_iter().peekable();
                    // Skip the joint point when it repeats the previous leg's end.
                    if coords.last().is_some() && coords.last() == leg_coords.peek() {
                        leg_coords.next();
                    }
                    coords.extend(leg_coords);
                    total_distance += leg.distance;
                    expected_travel_time += leg.expected_travel_time;
                    resolved_legs += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        route_id = %route.id,
                        from = %from.name,
                        to = %to.name,
                        error = %e,
                        "Skipping unresolved leg"
                    );
                }
            }
        }

        Self {
            route,
            path: LineString::from(coords),
            color,
            total_distance,
            expected_travel_time,
            resolved_legs,
        }
    }

    pub fn marker_count(&self) -> usize {
        self.route.markers.len()
    }

    /// Number of legs the route should have.
    pub fn leg_count(&self) -> usize {
        self.marker_count().saturating_sub(1)
    }

    /// Whether every leg resolved (no gaps in the path).
    pub fn is_complete(&self) -> bool {
        self.resolved_legs == self.leg_count()
    }

    /// Path as a Google encoded polyline (precision 5).
    pub fn encoded_path(&self) -> Option<String> {
        polyline::encode_coordinates(self.path.0.iter().copied(), 5).ok()
    }
}
