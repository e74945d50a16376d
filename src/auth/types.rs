//! Wire types of the authentication endpoints

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Profile of the signed-in user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthData {
    /// The user ID
    #[serde(default)]
    pub user_id: i64,

    /// The login name
    #[serde(default)]
    pub username: String,

    /// The permission group
    #[serde(default)]
    pub group: Option<String>,

    /// Code of the site the user currently works in
    #[serde(default)]
    pub active_site: Option<String>,

    /// When the server-side session ends
    #[serde(default)]
    pub expiry_date: Option<String>,
}

impl AuthData {
    /// Parsed `expiry_date`
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        self.expiry_date.as_deref().and_then(parse_timestamp)
    }
}

/// Parse an RFC 3339 timestamp, or a naive one taken as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Response envelope shared by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// Domain-level success flag
    #[serde(default = "default_success")]
    pub success: bool,

    /// Optional human-readable message
    #[serde(default)]
    pub message: Option<String>,

    /// The payload
    pub data: Option<T>,

    /// Access token, when the server issues one
    #[serde(default)]
    pub access_token: Option<String>,

    /// Refresh token, when the server issues one
    #[serde(default)]
    pub refresh_token: Option<String>,
}

fn default_success() -> bool {
    true
}

/// Sign-in credentials
#[derive(Debug, Clone, Serialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Body of the switch-site request
#[derive(Debug, Clone, Serialize)]
pub struct SwitchSiteBody {
    /// `None` leaves the user without an active site
    pub site_code: Option<String>,
}
