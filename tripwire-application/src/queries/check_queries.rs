use crate::AppError;
use crate::AppState;
use tripwire_domain::CheckInfo;

pub async fn list_checks(state: &AppState) -> Vec<CheckInfo> {
    state.dispatcher.checks()
}

pub async fn get_check(state: &AppState, name: &str) -> Result<CheckInfo, AppError> {
    state
        .dispatcher
        .check(name)
        .ok_or_else(|| AppError::NotFound(format!("check '{}'", name)))
}
