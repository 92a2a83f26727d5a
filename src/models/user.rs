//! User, credential and preference models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Access/refresh token pair issued by login, verification and refresh.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl std::fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Body of the login, register and verify-registration calls.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct AuthRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub password: String,
    /// Emailed verification code (verify-registration only)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 6))]
    pub code: Option<String>,
}

impl AuthRequest {
    pub fn credentials(email: &str, password: &str) -> Self {
        Self {
            email: email.trim().to_string(),
            password: password.to_string(),
            code: None,
        }
    }

    pub fn verification(email: &str, password: &str, code: &str) -> Self {
        Self {
            code: Some(code.trim().to_string()),
            ..Self::credentials(email, password)
        }
    }

    /// Validate before sending. Returns a human-readable reason on failure.
    pub fn check(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())?;
        if let Some(code) = &self.code {
            if !code.chars().all(|c| c.is_ascii_digit()) {
                return Err("code: must be numeric".to_string());
            }
        }
        Ok(())
    }
}

/// Body of `POST auth/refresh-token`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Account info.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    pub email: String,
    pub created_at: String,
}

/// Public profile shown in settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub avatar_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelType {
    Foot,
    Car,
}

impl TravelType {
    /// Parse the backend spelling, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FOOT" => Some(TravelType::Foot),
            "CAR" => Some(TravelType::Car),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Indoor,
    Outdoor,
    Combined,
}

/// A city the user can explore.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: Uuid,
    #[serde(default)]
    pub place_id: i64,
    pub name: String,
    #[serde(default)]
    pub details: String,
    pub latitude: f64,
    pub longitude: f64,
    /// [south, north, west, east] as returned by the geocoder
    #[serde(default)]
    pub bounding_box: Vec<f64>,
}

/// Route generation preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub name: String,
    pub travel_type: TravelType,
    /// Preferred route length (minutes)
    pub time_per_route: i32,
    pub activity_type: ActivityType,
    pub city: City,
}
