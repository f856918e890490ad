// Admin view of a registered check

use serde::Serialize;

use crate::entities::EventKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInfo {
    pub name: String,
    pub description: String,
    pub enabled: bool,
    pub threshold: u32,
    pub default_threshold: u32,
    pub subscriptions: Vec<EventKind>,
}
