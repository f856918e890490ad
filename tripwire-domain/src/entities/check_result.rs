// Check result entity

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::Severity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub violated: bool,
    pub reason: String,
    pub severity: Severity,
}

impl CheckResult {
    pub fn pass() -> Self {
        Self {
            violated: false,
            reason: String::new(),
            severity: Severity::NONE,
        }
    }

    pub fn fail(reason: impl Into<String>, level: i32) -> Self {
        Self {
            violated: true,
            reason: reason.into(),
            severity: Severity::clamped(level),
        }
    }
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.violated {
            write!(f, "[Level {}] {}", self.severity, self.reason)
        } else {
            f.write_str("PASS")
        }
    }
}
