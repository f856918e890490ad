use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use tokio::time::{timeout, Duration};
use tracing::error;

use tripwire_application::AppState;

use crate::middleware::authorize;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> StatusCode {
    let timeout_secs = state.config.request_timeout_seconds.max(1);
    let timeout_duration = Duration::from_secs(timeout_secs);
    match timeout(timeout_duration, state.escalation_log.ping()).await {
        Ok(Ok(_)) => StatusCode::OK,
        Ok(Err(err)) => {
            error!("ready check failed: {}", err);
            StatusCode::SERVICE_UNAVAILABLE
        }
        Err(_) => {
            error!("ready check timeout after {}s", timeout_secs);
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn metrics_prometheus(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if !authorize(&state.config, &headers) {
        return (StatusCode::UNAUTHORIZED, "unauthorized".to_string()).into_response();
    }
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_state::{authed, state};

    #[tokio::test]
    async fn ready_follows_the_escalation_log() {
        assert_eq!(health_ready(State(state())).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_require_the_token() {
        let denied = metrics_prometheus(State(state()), HeaderMap::new())
            .await
            .into_response();
        assert_eq!(denied.status(), StatusCode::UNAUTHORIZED);
        let allowed = metrics_prometheus(State(state()), authed())
            .await
            .into_response();
        assert_eq!(allowed.status(), StatusCode::OK);
    }
}
