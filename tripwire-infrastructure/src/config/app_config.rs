use std::collections::HashMap;
use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use crate::config::validate_check_overrides;
use crate::utils::{parse_env_list, resolve_path};
use tripwire_domain::{CheckOverride, RuntimeConfig, DEFAULT_DECAY_WINDOW_MS};

pub const CONFIG_PATH_ENV: &str = "TRIPWIRE_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub log_dir: String,
    pub decay_window_ms: i64,
    pub recent_escalations: usize,
    pub disabled_checks: Vec<String>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub checks: HashMap<String, CheckOverride>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            log_dir: "./logs".to_string(),
            decay_window_ms: DEFAULT_DECAY_WINDOW_MS,
            recent_escalations: 500,
            disabled_checks: Vec::new(),
            max_body_bytes: 4 * 1024 * 1024,
            request_timeout_seconds: 15,
            checks: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Reads `$TRIPWIRE_CONFIG` (default `./config.toml`), falling back to defaults when the
    /// file is missing, then applies `TRIPWIRE_*` env overrides.
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(Path::new(&path), |key| env::var(key).ok()).await
    }

    pub async fn load_from(
        file_path: &Path,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str(&content)
                .map_err(|err| anyhow!("invalid config {}: {}", file_path.display(), err))?
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_env_overrides(env_lookup);
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        if let Some(api_token) = &self.api_token {
            if api_token.trim().is_empty() {
                self.api_token = None;
            }
        }
        let mut disabled: Vec<String> = std::mem::take(&mut self.disabled_checks)
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        disabled.sort();
        disabled.dedup();
        self.disabled_checks = disabled;
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.log_dir = resolve_path(base, &self.log_dir);
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.log_dir.trim().is_empty() {
            return Err(anyhow!("log_dir must not be empty"));
        }
        if self.decay_window_ms <= 0 {
            return Err(anyhow!("decay_window_ms must be greater than 0"));
        }
        if self.recent_escalations == 0 {
            return Err(anyhow!("recent_escalations must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        validate_check_overrides(&self.checks)
    }

    /// `disabled_checks` folds into the per-check overrides as `enabled = false`.
    pub fn to_runtime_config(&self) -> RuntimeConfig {
        let mut checks = self.checks.clone();
        for name in &self.disabled_checks {
            checks.entry(name.clone()).or_default().enabled = Some(false);
        }
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            log_dir: self.log_dir.clone(),
            decay_window_ms: self.decay_window_ms,
            recent_escalation_capacity: self.recent_escalations,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            checks,
        }
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("TRIPWIRE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("TRIPWIRE_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = lookup("TRIPWIRE_LOG_DIR") {
            self.log_dir = value;
        }
        if let Some(value) = lookup("TRIPWIRE_DECAY_WINDOW_MS") {
            self.decay_window_ms = value.parse().unwrap_or(self.decay_window_ms);
        }
        if let Some(value) = lookup("TRIPWIRE_RECENT_ESCALATIONS") {
            self.recent_escalations = value.parse().unwrap_or(self.recent_escalations);
        }
        if let Some(value) = lookup("TRIPWIRE_DISABLED_CHECKS") {
            self.disabled_checks = parse_env_list(&value);
        }
        if let Some(value) = lookup("TRIPWIRE_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("TRIPWIRE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
    }
}
