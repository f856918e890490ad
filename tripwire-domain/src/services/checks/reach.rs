use std::sync::Arc;

use crate::entities::{ActionEvent, CheckResult, EventKind};
use crate::ports::ActorView;
use crate::services::checks::{ensure_finite, ensure_finite_scalar, Check, CheckError};
use crate::services::EntityStates;

pub const MAX_REACH: f64 = 3.0;
pub const REACH_BUFFER: f64 = 0.15;
/// Consecutive over-reach hits needed before a flag.
const STREAK_TO_FLAG: u32 = 2;

#[derive(Debug, Default, Clone)]
struct ReachState {
    streak: u32,
}

pub struct ReachCheck {
    states: Arc<EntityStates>,
}

impl ReachCheck {
    pub fn new(states: Arc<EntityStates>) -> Self {
        Self { states }
    }
}

impl Check for ReachCheck {
    fn name(&self) -> &str {
        "Reach"
    }

    fn description(&self) -> &str {
        "Detects extended reach in combat"
    }

    fn default_threshold(&self) -> u32 {
        4
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Attack]
    }

    fn evaluate(
        &self,
        actor: &dyn ActorView,
        event: &ActionEvent,
    ) -> Result<CheckResult, CheckError> {
        let ActionEvent::Attack { target, .. } = event else {
            return Ok(CheckResult::pass());
        };
        let eye = actor.eye_position();
        ensure_finite("actor.eye_position", eye)?;
        ensure_finite("target.position", target.position)?;
        ensure_finite_scalar("target.width", target.width)?;
        ensure_finite_scalar("target.height", target.height)?;

        // Distance to the hitbox surface, approximated by the center minus half the width.
        let distance = eye.distance(target.center());
        let reach = (distance - target.width / 2.0).max(0.0);
        let limit = MAX_REACH + REACH_BUFFER;

        let result = self.states.with(actor.id(), |state: &mut ReachState| {
            if reach <= limit {
                state.streak = state.streak.saturating_sub(1);
                return CheckResult::pass();
            }
            state.streak += 1;
            if state.streak < STREAK_TO_FLAG {
                return CheckResult::pass();
            }
            state.streak = 0;
            CheckResult::fail(
                format!("Hit from {:.2} blocks away (max: {:.2})", reach, limit),
                reach_severity(reach - limit),
            )
        });
        Ok(result)
    }
}

fn reach_severity(excess: f64) -> i32 {
    if excess > 3.0 {
        5
    } else if excess > 2.0 {
        4
    } else if excess > 1.0 {
        3
    } else if excess > 0.5 {
        2
    } else {
        1
    }
}
