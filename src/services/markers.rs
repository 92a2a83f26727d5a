//! Marker visibility for a map viewport.

use crate::models::Marker;
use geo::{Coord, Distance, Haversine, Point};

/// Latitude span (degrees) at or below which markers are packed tightest.
const MIN_ZOOM_SPAN: f64 = 0.002;
/// Latitude span at or above which markers are spread widest.
const MAX_ZOOM_SPAN: f64 = 0.034;
/// Minimum spacing (meters) when zoomed in.
const MIN_SPACING_M: f64 = 10.0;
/// Minimum spacing (meters) when zoomed out.
const MAX_SPACING_M: f64 = 500.0;

/// Visible map area: a center and the span in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapRegion {
    pub center: Coord<f64>,
    pub latitude_delta: f64,
    pub longitude_delta: f64,
}

impl MapRegion {
    pub fn contains(&self, point: Coord<f64>) -> bool {
        (point.y - self.center.y).abs() <= self.latitude_delta / 2.0
            && (point.x - self.center.x).abs() <= self.longitude_delta / 2.0
    }

    /// Minimum distance between shown markers, interpolated from the zoom.
    pub fn marker_spacing(&self) -> f64 {
        let span = self.latitude_delta.clamp(MIN_ZOOM_SPAN, MAX_ZOOM_SPAN);
        let t = (span - MIN_ZOOM_SPAN) / (MAX_ZOOM_SPAN - MIN_ZOOM_SPAN);
        MIN_SPACING_M + t * (MAX_SPACING_M - MIN_SPACING_M)
    }
}

/// Markers worth drawing in `region`.
///
/// Without a region every marker is returned. Otherwise markers outside the
/// region are dropped and, walking in input order, any marker closer than the
/// zoom spacing to an already kept one is skipped.
pub fn visible_markers<'a>(markers: &'a [Marker], region: Option<&MapRegion>) -> Vec<&'a Marker> {
    let Some(region) = region else {
        return markers.iter().collect();
    };
    let spacing = region.marker_spacing();

    let mut kept: Vec<&Marker> = Vec::new();
    for marker in markers {
        let here = marker.coord();
        if !region.contains(here) {
            continue;
        }
        let too_close = kept.iter().any(|other| {
            Haversine.distance(Point::from(here), Point::from(other.coord())) < spacing
        });
        if !too_close {
            kept.push(marker);
        }
    }
    kept
}
