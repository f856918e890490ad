use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use crate::entities::{ActionEvent, CheckResult, EventKind};
use crate::ports::ActorView;
use crate::services::checks::{Check, CheckError};
use crate::services::EntityStates;
use crate::value_objects::EntityId;

pub const TIME_WINDOW_MS: i64 = 500;
pub const MAX_UNIQUE_TARGETS: usize = 2;
/// Hard cap on remembered hits so a same-millisecond flood cannot grow the buffer.
const MAX_TRACKED_HITS: usize = 128;

#[derive(Debug, Clone, Copy)]
struct HitRecord {
    target: EntityId,
    at_ms: i64,
}

#[derive(Debug, Default, Clone)]
struct MultiTargetState {
    hits: VecDeque<HitRecord>,
}

pub struct MultiTargetCheck {
    states: Arc<EntityStates>,
}

impl MultiTargetCheck {
    pub fn new(states: Arc<EntityStates>) -> Self {
        Self { states }
    }
}

impl Check for MultiTargetCheck {
    fn name(&self) -> &str {
        "MultiTarget"
    }

    fn description(&self) -> &str {
        "Detects hitting multiple entities too quickly"
    }

    fn default_threshold(&self) -> u32 {
        3
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Attack]
    }

    fn evaluate(
        &self,
        actor: &dyn ActorView,
        event: &ActionEvent,
    ) -> Result<CheckResult, CheckError> {
        let ActionEvent::Attack { target, timestamp } = event else {
            return Ok(CheckResult::pass());
        };
        if !target.living {
            return Ok(CheckResult::pass());
        }
        let now = *timestamp;
        let target_id = target.id;

        let result = self.states.with(actor.id(), |state: &mut MultiTargetState| {
            state.hits.push_back(HitRecord {
                target: target_id,
                at_ms: now,
            });
            state.hits.retain(|hit| now.saturating_sub(hit.at_ms) <= TIME_WINDOW_MS);
            while state.hits.len() > MAX_TRACKED_HITS {
                state.hits.pop_front();
            }

            let unique = state
                .hits
                .iter()
                .map(|hit| hit.target)
                .collect::<HashSet<_>>()
                .len();
            if unique <= MAX_UNIQUE_TARGETS {
                return CheckResult::pass();
            }

            let total = state.hits.len();
            CheckResult::fail(
                format!(
                    "Hit {} different targets in {:.1}s ({} total hits)",
                    unique,
                    TIME_WINDOW_MS as f64 / 1000.0,
                    total
                ),
                multi_target_severity(unique, total),
            )
        });
        Ok(result)
    }
}

fn multi_target_severity(unique: usize, total: usize) -> i32 {
    if unique >= 5 {
        5
    } else if unique >= 4 {
        4
    } else if unique >= 3 {
        3
    } else if total >= 10 {
        3
    } else {
        2
    }
}
