//! REST API handlers for state and county lookups
//!
//! Handlers read the process-wide registries directly; there is no shared
//! application state to thread through the router.

use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::document::{CountyDocument, StateDocument};
use crate::error::Error;
use crate::query::{CountyKey, StateKey};
use crate::{County, State};

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct StateCountiesResponse {
    pub state: StateDocument,
    pub counties: Vec<CountyDocument>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(e: Error) -> ApiError {
    let status = match e {
        Error::StateNotFound { .. } | Error::CountyNotFound { .. } => StatusCode::NOT_FOUND,
        Error::InvalidArgument(_) | Error::Document(_) => StatusCode::BAD_REQUEST,
        Error::Load(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ErrorResponse { error: e.to_string() }))
}

// ============================================================================
// Query Parameters
// ============================================================================

#[derive(Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/v1/health
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({"status": "ok"}))
}

/// GET /api/v1/states
pub async fn get_states() -> Result<Json<Vec<StateDocument>>, ApiError> {
    let states = State::all().map_err(api_error)?;
    Ok(Json(states.into_iter().map(StateDocument::from).collect()))
}

/// GET /api/v1/states/:query
pub async fn get_state(Path(query): Path<String>) -> Result<Json<StateDocument>, ApiError> {
    let state = State::find(query).map_err(api_error)?;
    Ok(Json(StateDocument::from(state)))
}

/// GET /api/v1/states/:query/counties
pub async fn get_state_counties(
    Path(query): Path<String>,
) -> Result<Json<StateCountiesResponse>, ApiError> {
    let state = State::find(query).map_err(api_error)?;
    let counties = state.counties().map_err(api_error)?;
    Ok(Json(StateCountiesResponse {
        state: StateDocument::from(state),
        counties: counties.into_iter().map(CountyDocument::from).collect(),
    }))
}

/// GET /api/v1/states/:state/counties/:county
pub async fn get_county(
    Path((state, county)): Path<(String, String)>,
) -> Result<Json<CountyDocument>, ApiError> {
    let county = County::find(state, county).map_err(api_error)?;
    Ok(Json(CountyDocument::from(county)))
}

/// GET /api/v1/counties?limit=N
pub async fn get_counties(
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<CountyDocument>>, ApiError> {
    let limit = params.limit.unwrap_or(usize::MAX);
    let counties = County::all().map_err(api_error)?;
    Ok(Json(
        counties.into_iter().take(limit).map(CountyDocument::from).collect(),
    ))
}

/// POST /api/v1/lookup
///
/// Body `{"state": ..., "county": ...}` with JSON integer or string keys. Returns a
/// state document, or a county document when `county` is present (even as null).
/// A body that is not a JSON object is a malformed document.
pub async fn lookup(
    body: std::result::Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body.map_err(|e| api_error(Error::Document(e.body_text())))?;
    let state = request.get("state").ok_or_else(|| {
        api_error(Error::InvalidArgument("missing 'state' key".to_string()))
    })?;
    let state = StateKey::try_from(state).map_err(api_error)?;

    let document = match request.get("county") {
        Some(county) => {
            let county = CountyKey::try_from(county).map_err(api_error)?;
            let county = County::find(state, county).map_err(api_error)?;
            serde_json::to_value(CountyDocument::from(county))
        }
        None => {
            let state = State::find(state).map_err(api_error)?;
            serde_json::to_value(StateDocument::from(state))
        }
    };
    document
        .map(Json)
        .map_err(|e| api_error(Error::Document(e.to_string())))
}
