use std::sync::Arc;

use anyhow::Result;
use tokio::task::JoinHandle;
use tracing::info;

use tripwire_application::{AppState, Metrics};
use tripwire_domain::services::{default_checks, Dispatcher, EntityStates, ViolationLedger};
use tripwire_domain::RuntimeConfig;
use tripwire_infrastructure::{AppConfig, FileEscalationLog};

pub struct AppContext {
    pub state: AppState,
    /// Background escalation writer; finishes once every log handle is dropped.
    pub escalation_writer: JoinHandle<()>,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Ok(Self::from_runtime_config(config.to_runtime_config()))
    }

    /// Wires the detection core. Must run inside a tokio runtime.
    pub fn from_runtime_config(runtime_config: RuntimeConfig) -> Self {
        let (escalation_log, escalation_writer) = FileEscalationLog::spawn(
            &runtime_config.log_dir,
            runtime_config.recent_escalation_capacity,
        );
        let escalation_log = Arc::new(escalation_log);

        let states = Arc::new(EntityStates::new());
        let ledger = Arc::new(ViolationLedger::new(runtime_config.decay_window_ms));
        let dispatcher = Dispatcher::new(ledger, states.clone(), escalation_log.clone());
        for check in default_checks(&states) {
            dispatcher.register(check);
        }
        dispatcher.apply_overrides(&runtime_config.checks);

        for check in dispatcher.checks() {
            info!(
                check = %check.name,
                enabled = check.enabled,
                threshold = check.threshold,
                "check ready"
            );
        }

        let state = AppState {
            config: runtime_config,
            dispatcher: Arc::new(dispatcher),
            escalation_log,
            metrics: Arc::new(Metrics::default()),
        };

        Self {
            state,
            escalation_writer,
        }
    }
}
