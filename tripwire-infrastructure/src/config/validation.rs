use std::collections::HashMap;

use anyhow::{anyhow, Result};
use tripwire_domain::CheckOverride;

pub fn validate_check_overrides(checks: &HashMap<String, CheckOverride>) -> Result<()> {
    for (name, check_override) in checks {
        if name.trim().is_empty() {
            return Err(anyhow!("check override with empty name"));
        }
        if check_override.threshold == Some(0) {
            return Err(anyhow!("checks.{}.threshold must be greater than 0", name));
        }
    }
    Ok(())
}
