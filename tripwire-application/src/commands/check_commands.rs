use tracing::info;

use crate::AppError;
use crate::AppState;
use tripwire_domain::{CheckInfo, CheckOverride};

/// Applies an admin update to one check. Unknown names are `NotFound`.
pub async fn set_check_state(
    state: &AppState,
    name: &str,
    update: CheckOverride,
) -> Result<CheckInfo, AppError> {
    if update.enabled.is_none() && update.threshold.is_none() {
        return Err(AppError::BadRequest(
            "expected at least one of enabled, threshold".to_string(),
        ));
    }
    if update.threshold == Some(0) {
        return Err(AppError::BadRequest("threshold must be > 0".to_string()));
    }

    let mut info = state
        .dispatcher
        .check(name)
        .ok_or_else(|| AppError::NotFound(format!("check '{}'", name)))?;
    if let Some(enabled) = update.enabled {
        info = state.dispatcher.set_enabled(name, enabled)?;
    }
    if let Some(threshold) = update.threshold {
        info = state.dispatcher.set_threshold(name, threshold)?;
    }
    info!(
        check = %info.name,
        enabled = info.enabled,
        threshold = info.threshold,
        "check updated"
    );
    Ok(info)
}

pub async fn toggle_check(state: &AppState, name: &str) -> Result<CheckInfo, AppError> {
    Ok(state.dispatcher.toggle(name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::app_state;

    #[tokio::test]
    async fn updates_are_case_insensitive() {
        let (state, _) = app_state();
        let info = set_check_state(
            &state,
            "multitarget",
            CheckOverride {
                enabled: Some(false),
                threshold: Some(7),
            },
        )
        .await
        .expect("update");
        assert_eq!(info.name, "MultiTarget");
        assert!(!info.enabled);
        assert_eq!(info.threshold, 7);
        assert_eq!(info.default_threshold, 3);
    }

    #[tokio::test]
    async fn empty_or_zero_updates_are_rejected() {
        let (state, _) = app_state();
        let empty = set_check_state(&state, "Speed", CheckOverride::default()).await;
        assert!(matches!(empty, Err(AppError::BadRequest(_))));
        let zero = set_check_state(
            &state,
            "Speed",
            CheckOverride {
                enabled: None,
                threshold: Some(0),
            },
        )
        .await;
        assert!(matches!(zero, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn unknown_check_is_not_found() {
        let (state, _) = app_state();
        assert!(matches!(
            toggle_check(&state, "Fly").await,
            Err(AppError::NotFound(_))
        ));
        let update = CheckOverride {
            enabled: Some(true),
            threshold: None,
        };
        assert!(matches!(
            set_check_state(&state, "Fly", update).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn toggle_flips_state() {
        let (state, _) = app_state();
        assert!(!toggle_check(&state, "Reach").await.expect("toggle").enabled);
        assert!(toggle_check(&state, "Reach").await.expect("toggle").enabled);
    }
}
