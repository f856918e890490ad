use std::sync::Arc;

use tripwire_domain::ports::EscalationLog;
use tripwire_domain::services::Dispatcher;
use tripwire_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub dispatcher: Arc<Dispatcher>,
    pub escalation_log: Arc<dyn EscalationLog>,
    pub metrics: Arc<Metrics>,
}
