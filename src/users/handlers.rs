use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRef, Query, State,
    },
    routing::{get, post, put},
    Json, Router,
};
use tracing::{instrument, warn};

use super::{
    dto::{DistanceQuery, ListingQuery, RegisterRequest, RegisteredUser},
    repo_types::ToggleOutcome,
    services,
};
use crate::{
    auth::{AuthUser, JwtKeys},
    error::{ApiError, ApiResult},
    response::{ApiResponse, DistanceResponse},
    state::AppState,
    weekday::WeekdayListing,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/toggle-status", put(toggle_status))
        .route("/distance", get(distance))
        .route("/listing", get(listing))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<ApiResponse<RegisteredUser>> {
    let Json(payload) = payload.map_err(|e| {
        warn!(error = %e, "rejected register body");
        ApiError::validation(e.body_text())
    })?;

    let keys = JwtKeys::from_ref(&state);
    let user = services::register_user(state.store.as_ref(), &keys, payload).await?;
    Ok(ApiResponse::ok("User registered successfully", user))
}

#[instrument(skip(state))]
pub async fn toggle_status(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> ApiResult<ApiResponse<ToggleOutcome>> {
    let outcome = services::toggle_statuses(state.store.as_ref()).await?;
    Ok(ApiResponse::ok(
        "All users' status updated successfully",
        outcome,
    ))
}

/// Query strings that fail to deserialize (duplicate keys, stray types)
/// still answer with the JSON envelope.
fn query_or_400<T>(query: Result<Query<T>, QueryRejection>) -> ApiResult<T> {
    query.map(|Query(q)| q).map_err(|e| {
        warn!(error = %e, "rejected query string");
        ApiError::validation(e.body_text())
    })
}

#[instrument(skip(state, query))]
pub async fn distance(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<DistanceQuery>, QueryRejection>,
) -> ApiResult<DistanceResponse> {
    let query = query_or_400(query)?;
    let distance = services::distance_from(state.store.as_ref(), user_id, &query).await?;
    Ok(DistanceResponse::ok(distance))
}

#[instrument(skip(state, query))]
pub async fn listing(
    State(state): State<AppState>,
    _auth: AuthUser,
    query: Result<Query<ListingQuery>, QueryRejection>,
) -> ApiResult<ApiResponse<WeekdayListing>> {
    let query = query_or_400(query)?;
    let listing =
        services::listing_by_weekday(state.store.as_ref(), query.week_number.as_deref()).await?;
    Ok(ApiResponse::ok("User listing fetched successfully", listing))
}
