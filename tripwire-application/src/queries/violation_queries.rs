use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::error;

use crate::AppError;
use crate::AppState;
use tripwire_domain::{EntityId, Escalation};

pub const DEFAULT_ESCALATION_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityViolations {
    pub entity_id: EntityId,
    pub violations: BTreeMap<String, u32>,
}

pub async fn entity_violations(state: &AppState, entity_id: EntityId) -> EntityViolations {
    let violations = state
        .dispatcher
        .ledger()
        .all_violations(entity_id)
        .into_iter()
        .collect();
    EntityViolations {
        entity_id,
        violations,
    }
}

/// Newest first, capped by the in-memory ring size.
pub async fn recent_escalations(
    state: &AppState,
    entity_id: Option<EntityId>,
    limit: Option<usize>,
) -> Vec<Escalation> {
    let limit = limit
        .unwrap_or(DEFAULT_ESCALATION_LIMIT)
        .min(state.config.recent_escalation_capacity);
    state.escalation_log.recent(entity_id, limit).await
}

/// Lines of the per-entity escalation log for `date` (`YYYY-MM-DD`, default today).
pub async fn read_entity_log(
    state: &AppState,
    entity_name: &str,
    date: Option<String>,
) -> Result<Vec<String>, AppError> {
    let entity_name = entity_name.trim();
    if entity_name.is_empty() {
        return Err(AppError::BadRequest("entity_name is required".to_string()));
    }
    let date = match date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::BadRequest(format!("invalid date '{}'", raw)))?,
        None => Local::now().date_naive(),
    };

    state
        .escalation_log
        .read_day(entity_name, date)
        .await
        .map_err(|err| {
            error!("failed to read escalation log for {}: {}", entity_name, err);
            AppError::Internal(err)
        })
}
