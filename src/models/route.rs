// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Route and marker models as served by the backend.

use geo::Coord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point of interest on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    /// OSM-style tag (PARK, MUSEUM, CAFE, ...)
    pub tag: String,
    pub category: String,
    /// Position within a route, if the marker belongs to one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_index: Option<i32>,
    /// Suggested time to spend here (minutes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staying_time: Option<i32>,
    pub rating: f64,
}

impl Marker {
    /// Marker position as a geo coordinate (x = longitude, y = latitude).
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.longitude,
            y: self.latitude,
        }
    }

    /// Display style derived from the marker tag.
    pub fn style(&self) -> MarkerStyle {
        MarkerStyle::for_tag(&self.tag)
    }
}

/// An ordered walk/drive through markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: Uuid,
    pub category: String,
    /// Average time budget for the whole route (minutes)
    pub avg_time: i32,
    pub markers: Vec<Marker>,
}

impl Route {
    /// Index of the final marker, or `None` for an empty route.
    pub fn last_index(&self) -> Option<usize> {
        self.markers.len().checked_sub(1)
    }

    /// Sum of marker staying times; markers without one count as zero.
    pub fn avg_staying_time(&self) -> i32 {
        self.markers.iter().map(|m| m.staying_time.unwrap_or(0)).sum()
    }

    /// Replace the marker sequence and renumber order indices from zero.
    pub fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
        for (i, marker) in self.markers.iter_mut().enumerate() {
            marker.order_index = Some(i as i32);
        }
    }
}

/// Color family used to render a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Green,
    Brown,
    Indigo,
    Orange,
    Pink,
    Blue,
}

/// How a marker should be drawn: color family and icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub color: MarkerColor,
    pub icon: &'static str,
}

impl MarkerStyle {
    /// Look up the style for a marker tag. Unknown tags get a blue pin.
    pub fn for_tag(tag: &str) -> Self {
        let color = match tag {
            "PARK" | "GARDEN" | "NATURE_RESERVE" | "VIEWPOINT" | "TRAILHEAD" => MarkerColor::Green,
            "MONUMENT" | "MEMORIAL" | "CASTLE" | "RUINS" | "STATUE" | "PLACE_OF_WORSHIP"
            | "CHURCH" | "MOSQUE" | "SYNAGOGUE" | "TEMPLE" => MarkerColor::Brown,
            "MUSEUM" | "GALLERY" | "THEATRE" | "CINEMA" | "LIBRARY" => MarkerColor::Indigo,
            "CAFE" | "RESTAURANT" | "BAR" | "PUB" => MarkerColor::Orange,
            "ATTRACTION" | "THEME_PARK" => MarkerColor::Pink,
            _ => MarkerColor::Blue,
        };

        let icon = match tag {
            "PARK" => "leaf",
            "GARDEN" => "florinsign.circle",
            "NATURE_RESERVE" => "tree",
            "MONUMENT" | "MEMORIAL" => "building.columns",
            "CASTLE" => "building",
            "RUINS" => "hammer",
            "STATUE" => "figure.stand",
            "MUSEUM" | "LIBRARY" => "books.vertical",
            "GALLERY" => "paintpalette",
            "PLACE_OF_WORSHIP" | "CHURCH" | "MOSQUE" | "SYNAGOGUE" | "TEMPLE" => "cross",
            "VIEWPOINT" => "binoculars",
            "TRAILHEAD" => "figure.walk",
            "ATTRACTION" | "THEME_PARK" => "sparkles",
            "CAFE" => "cup.and.saucer",
            "RESTAURANT" => "fork.knife",
            "BAR" | "PUB" => "wineglass",
            "THEATRE" => "theatermasks",
            "CINEMA" => "film",
            _ => "mappin",
        };

        Self { color, icon }
    }
}
