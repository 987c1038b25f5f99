use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{User, UserStatus};

/// Request body for `POST /register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<UserStatus>,
}

/// Public view of a freshly registered user, plus the access token.
#[derive(Debug, Serialize)]
pub struct RegisteredUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub register_at: OffsetDateTime,
    pub token: String,
}

impl RegisteredUser {
    pub fn new(user: User, token: String) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            address: user.address,
            latitude: user.latitude,
            longitude: user.longitude,
            status: user.status,
            register_at: user.register_at,
            token,
        }
    }
}

/// Query for `GET /distance`. Kept as raw strings so missing and
/// malformed values both turn into a 400 with our own message.
#[derive(Debug, Default, Deserialize)]
pub struct DistanceQuery {
    pub input_latitude: Option<String>,
    pub input_longitude: Option<String>,
}

/// Query for `GET /listing`, e.g. `week_number=0,1`.
#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    pub week_number: Option<String>,
}
