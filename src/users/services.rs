use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{DistanceQuery, RegisterRequest, RegisteredUser},
    repo::UserStore,
    repo_types::{NewUser, ToggleOutcome},
};
use crate::{
    auth::{password::hash_password_blocking, JwtKeys},
    error::{ApiError, ApiResult},
    geo::{format_km, haversine_km, Coordinates},
    weekday::{parse_week_numbers, WeekdayListing},
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_registration(payload: &mut RegisterRequest) -> ApiResult<()> {
    payload.name = payload.name.trim().to_string();
    payload.email = payload.email.trim().to_lowercase();

    if payload.name.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::validation("name, email and password are required"));
    }
    if !is_valid_email(&payload.email) {
        return Err(ApiError::validation("Invalid email"));
    }
    match (payload.latitude, payload.longitude) {
        (Some(lat), Some(lon)) => {
            Coordinates::new(lat, lon)?;
        }
        (None, None) => {}
        _ => {
            return Err(ApiError::validation(
                "latitude and longitude must be provided together",
            ))
        }
    }
    Ok(())
}

/// Creates a user and issues its access token.
pub async fn register_user(
    store: &dyn UserStore,
    keys: &JwtKeys,
    mut payload: RegisterRequest,
) -> ApiResult<RegisteredUser> {
    validate_registration(&mut payload)?;

    if store.find_by_email(&payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Duplicate("User already exists".into()));
    }

    let password_hash = hash_password_blocking(payload.password).await?;

    let user = store
        .create(NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
            address: payload.address,
            latitude: payload.latitude,
            longitude: payload.longitude,
            status: payload.status.unwrap_or_default(),
        })
        .await?;

    let token = keys.sign(user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(RegisteredUser::new(user, token))
}

/// Flips every user's status; 404 when the store holds no users at all.
pub async fn toggle_statuses(store: &dyn UserStore) -> ApiResult<ToggleOutcome> {
    let outcome = store.toggle_statuses().await?;
    if outcome.matched == 0 {
        return Err(ApiError::not_found("No users found to update"));
    }
    info!(matched = outcome.matched, modified = outcome.modified, "user statuses toggled");
    Ok(outcome)
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_query_point(query: &DistanceQuery) -> ApiResult<Coordinates> {
    let (Some(lat), Some(lon)) = (
        non_blank(&query.input_latitude),
        non_blank(&query.input_longitude),
    ) else {
        return Err(ApiError::validation(
            "Destination latitude and longitude are required",
        ));
    };

    let lat: f64 = lat
        .parse()
        .map_err(|_| ApiError::validation("input_latitude must be a number"))?;
    let lon: f64 = lon
        .parse()
        .map_err(|_| ApiError::validation("input_longitude must be a number"))?;
    Ok(Coordinates::new(lat, lon)?)
}

/// Distance from the caller's stored location to the query point, e.g. `"12.34 km"`.
pub async fn distance_from(
    store: &dyn UserStore,
    user_id: Uuid,
    query: &DistanceQuery,
) -> ApiResult<String> {
    let destination = parse_query_point(query)?;

    // Only a missing coordinate means "no location"; 0.0 is a real latitude/longitude.
    let origin = store
        .find_by_id(user_id)
        .await?
        .and_then(|u| match (u.latitude, u.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        })
        .ok_or_else(|| ApiError::not_found("User location not found"))?;

    Ok(format_km(haversine_km(origin, destination)))
}

/// Registrations grouped by the requested weekdays.
pub async fn listing_by_weekday(
    store: &dyn UserStore,
    week_number: Option<&str>,
) -> ApiResult<WeekdayListing> {
    let days = parse_week_numbers(week_number)?;
    let records = store.registrations_on(&days).await?;
    Ok(WeekdayListing::group(&days, records))
}
