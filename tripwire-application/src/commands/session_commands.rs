use tracing::info;

use crate::AppError;
use crate::AppState;
use tripwire_domain::EntityId;

/// Entity left: drop all of its detector and ledger state.
pub async fn disconnect(state: &AppState, entity_id: EntityId) {
    state.dispatcher.purge(entity_id);
    state.metrics.record_purge();
    info!(entity = %entity_id, "entity disconnected; state purged");
}

/// Clears ledger counts for one check, or for all checks when `check` is `None`.
/// Detector state is left alone.
pub async fn clear_violations(
    state: &AppState,
    entity_id: EntityId,
    check: Option<&str>,
) -> Result<(), AppError> {
    let ledger = state.dispatcher.ledger();
    match check {
        Some(name) => {
            let info = state
                .dispatcher
                .check(name)
                .ok_or_else(|| AppError::NotFound(format!("check '{}'", name)))?;
            ledger.clear_check(entity_id, &info.name);
        }
        None => ledger.clear(entity_id),
    }
    info!(entity = %entity_id, check = ?check, "violations cleared");
    Ok(())
}
