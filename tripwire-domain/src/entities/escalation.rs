// Escalation entity
// Emitted once per threshold-crossing violation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{EntityId, Severity};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub check_name: String,
    pub severity: Severity,
    pub cumulative_count: u32,
    pub reason: String,
    /// Event timestamp in monotonic milliseconds.
    pub timestamp: i64,
    pub reported_at: DateTime<Utc>,
}
