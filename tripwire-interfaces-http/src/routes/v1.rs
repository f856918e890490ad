use axum::routing::{get, post};
use axum::Router;

use tripwire_application::AppState;

use crate::handlers::{
    check_handlers, ingest_handlers, ops_handlers, session_handlers, violation_handlers,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/ingest/events", post(ingest_handlers::ingest_events))
        .route("/v1/ingest/packets", post(ingest_handlers::ingest_packets))
        .route(
            "/v1/sessions/:entity_id/disconnect",
            post(session_handlers::disconnect),
        )
        .route("/v1/checks", get(check_handlers::list_checks))
        .route(
            "/v1/checks/:name",
            get(check_handlers::get_check).put(check_handlers::update_check),
        )
        .route(
            "/v1/checks/:name/toggle",
            post(check_handlers::toggle_check),
        )
        .route(
            "/v1/violations/:entity_id",
            get(violation_handlers::get_violations).delete(violation_handlers::clear_violations),
        )
        .route(
            "/v1/escalations",
            get(violation_handlers::list_escalations),
        )
        .route(
            "/v1/escalations/log",
            get(violation_handlers::read_escalation_log),
        )
        .route("/v1/ops/health/live", get(ops_handlers::health_live))
        .route("/v1/ops/health/ready", get(ops_handlers::health_ready))
        .route(
            "/v1/ops/metrics/prometheus",
            get(ops_handlers::metrics_prometheus),
        )
        .with_state(state)
}
