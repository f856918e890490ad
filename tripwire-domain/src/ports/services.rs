use async_trait::async_trait;
use chrono::NaiveDate;

use crate::entities::Escalation;
use crate::value_objects::EntityId;

/// Receives escalations inline on the event path; implementations must not block.
pub trait EscalationSink: Send + Sync {
    fn report(&self, escalation: &Escalation);
}

#[async_trait]
pub trait EscalationLog: Send + Sync {
    async fn recent(&self, entity: Option<EntityId>, limit: usize) -> Vec<Escalation>;
    async fn read_day(&self, entity_name: &str, date: NaiveDate) -> anyhow::Result<Vec<String>>;
    async fn ping(&self) -> anyhow::Result<()>;
}
