use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use tripwire_application::commands::session_commands;
use tripwire_application::queries::violation_queries::{self, EntityViolations};
use tripwire_application::AppState;
use tripwire_domain::Escalation;

use crate::error::HttpError;
use crate::middleware::{authorize, parse_entity_id};

#[derive(serde::Deserialize)]
pub struct ClearViolationsQuery {
    pub check: Option<String>,
}

#[derive(serde::Deserialize)]
pub struct EscalationQuery {
    pub entity_id: Option<String>,
    pub limit: Option<usize>,
}

#[derive(serde::Deserialize)]
pub struct EscalationLogQuery {
    pub entity_name: String,
    pub date: Option<String>,
}

pub async fn get_violations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entity_id): Path<String>,
) -> Result<Json<EntityViolations>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity_id = parse_entity_id(&entity_id)?;
    Ok(Json(
        violation_queries::entity_violations(&state, entity_id).await,
    ))
}

pub async fn clear_violations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(entity_id): Path<String>,
    Query(query): Query<ClearViolationsQuery>,
) -> Result<StatusCode, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity_id = parse_entity_id(&entity_id)?;
    session_commands::clear_violations(&state, entity_id, query.check.as_deref()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_escalations(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EscalationQuery>,
) -> Result<Json<Vec<Escalation>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let entity_id = match query.entity_id.as_deref() {
        Some(raw) => Some(parse_entity_id(raw)?),
        None => None,
    };
    let rows = violation_queries::recent_escalations(&state, entity_id, query.limit).await;
    Ok(Json(rows))
}

pub async fn read_escalation_log(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<EscalationLogQuery>,
) -> Result<Json<Vec<String>>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }
    let lines = violation_queries::read_entity_log(&state, &query.entity_name, query.date).await?;
    Ok(Json(lines))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state::{authed, state};

    const STEVE: &str = "00000000-0000-0000-0000-000000000001";

    #[tokio::test]
    async fn violations_are_listed_and_cleared() {
        let state = state();
        let id = parse_entity_id(STEVE).expect("uuid");
        state.dispatcher.ledger().record(id, "Speed", 3, 0);

        let Json(view) = get_violations(State(state.clone()), authed(), Path(STEVE.to_string()))
            .await
            .expect("get");
        assert_eq!(view.violations.get("Speed"), Some(&1));

        let status = clear_violations(
            State(state.clone()),
            authed(),
            Path(STEVE.to_string()),
            Query(ClearViolationsQuery { check: None }),
        )
        .await
        .expect("clear");
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(state.dispatcher.ledger().violation_count(id, "Speed"), 0);
    }

    #[tokio::test]
    async fn bad_entity_ids_are_rejected() {
        let result = list_escalations(
            State(state()),
            authed(),
            Query(EscalationQuery {
                entity_id: Some("Steve".to_string()),
                limit: None,
            }),
        )
        .await;
        assert!(matches!(result, Err(HttpError::BadRequest(_))));
    }
}
