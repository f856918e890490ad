use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;

use tripwire_application::commands::check_commands;
use tripwire_application::queries::check_queries;
use tripwire_application::AppState;
use tripwire_domain::{CheckInfo, CheckOverride};

use crate::error::HttpError;
use crate::middleware::authorize;

pub async fn list_checks(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<CheckInfo>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    Ok(Json(check_queries::list_checks(&state).await))
}

pub async fn get_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<CheckInfo>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let info = check_queries::get_check(&state, &name).await?;
    Ok(Json(info))
}

pub async fn update_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
    Json(payload): Json<CheckOverride>,
) -> Result<Json<CheckInfo>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let info = check_commands::set_check_state(&state, &name, payload).await?;
    Ok(Json(info))
}

pub async fn toggle_check(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(name): Path<String>,
) -> Result<Json<CheckInfo>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let info = check_commands::toggle_check(&state, &name).await?;
    Ok(Json(info))
}
