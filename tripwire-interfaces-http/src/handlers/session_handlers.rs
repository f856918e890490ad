use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};

use tripwire_application::commands::session_commands;
use tripwire_application::AppState;

use crate::error::HttpError;
use crate::middleware::{authorize, parse_entity_id};

pub async fn disconnect(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entity_id): Path<String>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity_id = parse_entity_id(&entity_id)?;
    session_commands::disconnect(&state, entity_id).await;
    Ok(StatusCode::NO_CONTENT)
}
