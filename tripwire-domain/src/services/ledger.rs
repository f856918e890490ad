use std::collections::HashMap;

use dashmap::DashMap;

use crate::value_objects::EntityId;

pub const DEFAULT_DECAY_WINDOW_MS: i64 = 30_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LedgerEntry {
    pub count: u32,
    pub last_violation_ms: i64,
}

/// Decaying violation counter per (entity, check).
///
/// Decay is lazy: when a violation arrives more than `decay_window_ms` after the previous
/// one, the count drops by exactly one before the new violation is added. A threshold
/// crossing does not reset the count, so every further violation keeps reporting
/// `true` until enough stale gaps bring it back under the threshold.
pub struct ViolationLedger {
    decay_window_ms: i64,
    entries: DashMap<EntityId, HashMap<String, LedgerEntry>>,
}

impl Default for ViolationLedger {
    fn default() -> Self {
        Self::new(DEFAULT_DECAY_WINDOW_MS)
    }
}

impl ViolationLedger {
    pub fn new(decay_window_ms: i64) -> Self {
        Self {
            decay_window_ms,
            entries: DashMap::new(),
        }
    }

    pub fn decay_window_ms(&self) -> i64 {
        self.decay_window_ms
    }

    /// Records one violation at `now_ms`; returns whether the count is at or over `threshold`.
    pub fn record(&self, id: EntityId, check_name: &str, threshold: u32, now_ms: i64) -> bool {
        let mut checks = self.entries.entry(id).or_default();
        let entry = checks.entry(check_name.to_string()).or_default();

        if now_ms.saturating_sub(entry.last_violation_ms) > self.decay_window_ms
            && entry.count > 0
        {
            entry.count -= 1;
        }
        entry.count = entry.count.saturating_add(1);
        entry.last_violation_ms = now_ms;

        entry.count >= threshold
    }

    pub fn violation_count(&self, id: EntityId, check_name: &str) -> u32 {
        self.entries
            .get(&id)
            .and_then(|checks| checks.get(check_name).map(|entry| entry.count))
            .unwrap_or(0)
    }

    pub fn all_violations(&self, id: EntityId) -> HashMap<String, u32> {
        self.entries
            .get(&id)
            .map(|checks| {
                checks
                    .iter()
                    .map(|(name, entry)| (name.clone(), entry.count))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn clear(&self, id: EntityId) {
        self.entries.remove(&id);
    }

    pub fn clear_check(&self, id: EntityId, check_name: &str) {
        if let Some(mut checks) = self.entries.get_mut(&id) {
            checks.remove(check_name);
        }
    }

    pub fn tracked(&self) -> usize {
        self.entries.len()
    }
}
