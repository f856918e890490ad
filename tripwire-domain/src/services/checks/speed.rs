use std::sync::Arc;

use glam::DVec3;

use crate::entities::{ActionEvent, CheckResult, EventKind};
use crate::ports::ActorView;
use crate::services::checks::{ensure_finite, Check, CheckError};
use crate::services::EntityStates;
use crate::value_objects::EntityId;

/// Blocks per tick.
pub const WALK_SPEED: f64 = 0.215;
pub const SPRINT_SPEED: f64 = 0.28;
/// Added after effect scaling, absorbs lag and legit edge movement.
pub const SPEED_BUFFER: f64 = 0.05;
const SPEED_EFFECT_STEP: f64 = 0.2;

#[derive(Debug, Default, Clone)]
struct SpeedState {
    last_location: Option<DVec3>,
}

/// Horizontal speed check. Every move is judged on its own; smoothing is left to the ledger.
pub struct SpeedCheck {
    states: Arc<EntityStates>,
}

impl SpeedCheck {
    pub fn new(states: Arc<EntityStates>) -> Self {
        Self { states }
    }

    pub fn max_speed(sprinting: bool, speed_amplifier: Option<u32>) -> f64 {
        let mut max_speed = if sprinting { SPRINT_SPEED } else { WALK_SPEED };
        if let Some(amplifier) = speed_amplifier {
            max_speed += max_speed * SPEED_EFFECT_STEP * (f64::from(amplifier) + 1.0);
        }
        max_speed + SPEED_BUFFER
    }

    /// Destination of the last passing move. Not used by the speed computation.
    pub fn last_location(&self, id: EntityId) -> Option<DVec3> {
        self.states.peek::<SpeedState>(id)?.last_location
    }
}

impl Check for SpeedCheck {
    fn name(&self) -> &str {
        "Speed"
    }

    fn description(&self) -> &str {
        "Detects players moving faster than possible"
    }

    fn default_threshold(&self) -> u32 {
        3
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::Move]
    }

    fn evaluate(
        &self,
        actor: &dyn ActorView,
        event: &ActionEvent,
    ) -> Result<CheckResult, CheckError> {
        let ActionEvent::Move {
            from,
            to,
            sprinting,
            speed_amplifier,
            ..
        } = event
        else {
            return Ok(CheckResult::pass());
        };
        ensure_finite("move.from", *from)?;
        ensure_finite("move.to", *to)?;

        if from.x == to.x && from.z == to.z {
            return Ok(CheckResult::pass());
        }

        let dx = to.x - from.x;
        let dz = to.z - from.z;
        let distance = (dx * dx + dz * dz).sqrt();
        let max_speed = Self::max_speed(*sprinting, *speed_amplifier);

        if distance > max_speed {
            let percentage = (distance / max_speed - 1.0) * 100.0;
            return Ok(CheckResult::fail(
                format!(
                    "Moving {:.1}% faster than max speed ({:.3} > {:.3})",
                    percentage, distance, max_speed
                ),
                speed_severity(percentage),
            ));
        }

        let destination = *to;
        self.states.with(actor.id(), |state: &mut SpeedState| {
            state.last_location = Some(destination);
        });
        Ok(CheckResult::pass())
    }
}

fn speed_severity(percentage: f64) -> i32 {
    if percentage > 100.0 {
        5
    } else if percentage > 50.0 {
        4
    } else if percentage > 30.0 {
        3
    } else if percentage > 15.0 {
        2
    } else {
        1
    }
}
