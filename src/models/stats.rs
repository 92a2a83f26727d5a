//! Exploration statistics returned by `GET user/statistics`.

use serde::{Deserialize, Serialize};

/// Routes or AR models beyond this count don't add to a city's progress.
const PROGRESS_CAP_PER_KIND: u32 = 5;

/// Totals across all cities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_completed_routes: u32,
    #[serde(rename = "totalCompletedARModels")]
    pub total_completed_ar_models: u32,
    pub total_completed_markers: u32,
    #[serde(default)]
    pub cities: Vec<CityStatistics>,
}

/// Per-city progress.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityStatistics {
    pub name: String,
    pub in_progress_routes: u32,
    pub completed_routes: u32,
    #[serde(rename = "completedARModels")]
    pub completed_ar_models: u32,
}

impl CityStatistics {
    /// City completion percentage: five routes and five AR models make 100.
    pub fn progress_percent(&self) -> u32 {
        let routes = self.completed_routes.min(PROGRESS_CAP_PER_KIND);
        let models = self.completed_ar_models.min(PROGRESS_CAP_PER_KIND);
        (routes + models) * 100 / (2 * PROGRESS_CAP_PER_KIND)
    }
}
