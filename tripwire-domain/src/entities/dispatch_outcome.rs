// Dispatch outcome entity
// What one event did across the registry

use crate::entities::{CheckResult, Escalation};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Checks that ran for this event, faulted ones included.
    pub evaluated: usize,
    pub violations: Vec<(String, CheckResult)>,
    pub escalations: Vec<Escalation>,
    pub faults: usize,
}

impl DispatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.faults == 0
    }
}
