use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub log_dir: String,
    pub decay_window_ms: i64,
    pub recent_escalation_capacity: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub checks: HashMap<String, CheckOverride>,
}
