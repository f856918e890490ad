// Shared fixtures for the command and query tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use tripwire_domain::ports::{EscalationLog, EscalationSink};
use tripwire_domain::services::{default_checks, Dispatcher, EntityStates, ViolationLedger};
use tripwire_domain::{Escalation, EntityId, RuntimeConfig};

use crate::{AppState, Metrics};

#[derive(Default)]
pub(crate) struct MemoryLog {
    pub(crate) entries: Mutex<Vec<Escalation>>,
}

impl EscalationSink for MemoryLog {
    fn report(&self, escalation: &Escalation) {
        self.entries.lock().push(escalation.clone());
    }
}

#[async_trait]
impl EscalationLog for MemoryLog {
    async fn recent(&self, entity: Option<EntityId>, limit: usize) -> Vec<Escalation> {
        self.entries
            .lock()
            .iter()
            .rev()
            .filter(|escalation| entity.map_or(true, |id| escalation.entity_id == id))
            .take(limit)
            .cloned()
            .collect()
    }

    async fn read_day(&self, entity_name: &str, _date: NaiveDate) -> anyhow::Result<Vec<String>> {
        Ok(self
            .entries
            .lock()
            .iter()
            .filter(|escalation| escalation.entity_name == entity_name)
            .map(|escalation| escalation.reason.clone())
            .collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

pub(crate) fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        api_token: None,
        log_dir: "logs".to_string(),
        decay_window_ms: 30_000,
        recent_escalation_capacity: 100,
        max_body_bytes: 1024 * 1024,
        request_timeout_seconds: 5,
        checks: HashMap::new(),
    }
}

pub(crate) fn app_state() -> (AppState, Arc<MemoryLog>) {
    let log = Arc::new(MemoryLog::default());
    let states = Arc::new(EntityStates::new());
    let dispatcher = Dispatcher::new(
        Arc::new(ViolationLedger::default()),
        states.clone(),
        log.clone(),
    );
    for check in default_checks(&states) {
        dispatcher.register(check);
    }
    let state = AppState {
        config: runtime_config(),
        dispatcher: Arc::new(dispatcher),
        escalation_log: log.clone(),
        metrics: Arc::new(Metrics::default()),
    };
    (state, log)
}
