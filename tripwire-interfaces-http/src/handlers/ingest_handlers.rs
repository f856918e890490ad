use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use tracing::{error, warn};

use tripwire_application::commands::ingest_commands::{self, IngestSummary};
use tripwire_application::AppState;
use tripwire_domain::{IngestEnvelope, PacketEnvelope};

use crate::error::HttpError;
use crate::middleware::{authorize, parse_json_body};

pub async fn ingest_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<IngestSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let envelope: IngestEnvelope =
        parse_json_body(&headers, &body, state.config.max_body_bytes).map_err(|err| {
            error!("failed to parse ingest body: {}", err);
            state.metrics.record_ingest_error();
            HttpError::BadRequest(err.to_string())
        })?;
    if envelope.events.is_empty() {
        warn!("empty event batch");
    }

    let summary = ingest_commands::process_ingest_events(&state, envelope).await?;
    Ok(Json(summary))
}

pub async fn ingest_packets(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<Json<IngestSummary>, HttpError> {
    if !authorize(&state.config, &headers) {
        return Err(HttpError::Unauthorized);
    }

    let envelope: PacketEnvelope =
        parse_json_body(&headers, &body, state.config.max_body_bytes).map_err(|err| {
            error!("failed to parse packet body: {}", err);
            state.metrics.record_ingest_error();
            HttpError::BadRequest(err.to_string())
        })?;

    let summary = ingest_commands::process_tap_packets(&state, envelope).await?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use axum::body::Bytes;

    use super::*;
    use crate::handlers::test_state::{authed, state};

    #[tokio::test]
    async fn events_are_dispatched() {
        let body = r#"{
            "schema_version": "v1",
            "events": [{
                "actor": {"id": "00000000-0000-0000-0000-000000000001", "name": "Steve"},
                "event": {"type": "move", "from": [0.0, 64.0, 0.0], "to": [2.0, 64.0, 0.0], "timestamp": 10}
            }]
        }"#;
        let Json(summary) = ingest_events(State(state()), authed(), Bytes::from(body))
            .await
            .expect("ingest");
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.violations, 1);
    }

    #[tokio::test]
    async fn malformed_bodies_are_bad_requests() {
        let result = ingest_packets(State(state()), authed(), Bytes::from_static(b"not json")).await;
        assert!(matches!(result, Err(HttpError::BadRequest(_))));
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let result = ingest_events(State(state()), HeaderMap::new(), Bytes::new()).await;
        assert!(matches!(result, Err(HttpError::Unauthorized)));
    }
}
