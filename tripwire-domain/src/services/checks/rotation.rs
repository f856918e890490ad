use std::sync::Arc;

use crate::entities::{ActionEvent, CheckResult, EventKind};
use crate::ports::ActorView;
use crate::services::checks::{ensure_finite, Check, CheckError};
use crate::services::EntityStates;
use crate::value_objects::{angle_between_degrees, look_direction, normalize_yaw, Rotation};

/// Degrees of combined yaw/pitch change allowed between two attacks.
pub const MAX_ROTATION_PER_SAMPLE: f32 = 50.0;
pub const MAX_HIT_ANGLE: f64 = 45.0;
pub const RAPID_ATTACK_MS: i64 = 500;
const SUSPICION_LIMIT: u32 = 5;

#[derive(Debug, Default, Clone)]
struct RotationState {
    last_look: Option<Rotation>,
    last_attack_ms: i64,
    suspicion: u32,
}

/// Flags hits landed while facing away and head snaps between rapid attacks.
pub struct RotationAuraCheck {
    states: Arc<EntityStates>,
}

impl RotationAuraCheck {
    pub fn new(states: Arc<EntityStates>) -> Self {
        Self { states }
    }
}

impl Check for RotationAuraCheck {
    fn name(&self) -> &str {
        "KillAura-Rotation"
    }

    fn description(&self) -> &str {
        "Detects killaura via impossible head rotations"
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
        let ActionEvent::Attack { target, timestamp } = event else {
            return Ok(CheckResult::pass());
        };
        if !target.living {
            return Ok(CheckResult::pass());
        }

        let look = actor.look();
        if !look.is_finite() {
            return Err(CheckError::NonFinite { field: "actor.look" });
        }
        let eye = actor.eye_position();
        ensure_finite("actor.eye_position", eye)?;
        ensure_finite("target.position", target.position)?;

        // Degenerate when the eye sits exactly on the target center.
        let hit_angle = angle_between_degrees(look_direction(look), target.center() - eye);
        let now = *timestamp;

        let result = self.states.with(actor.id(), |state: &mut RotationState| {
            let mut result = CheckResult::pass();

            if let Some(angle) = hit_angle.filter(|angle| *angle > MAX_HIT_ANGLE) {
                state.suspicion += 2;
                if state.suspicion > SUSPICION_LIMIT {
                    state.suspicion = 0;
                    result = CheckResult::fail(
                        format!(
                            "Hit target while looking {:.1}° away (max: {:.1}°)",
                            angle, MAX_HIT_ANGLE
                        ),
                        4,
                    );
                }
            }

            if !result.violated {
                if let Some(previous) = state.last_look {
                    let yaw_diff = normalize_yaw(look.yaw - previous.yaw).abs();
                    let pitch_diff = (look.pitch - previous.pitch).abs();
                    let total = yaw_diff.hypot(pitch_diff);

                    if now.saturating_sub(state.last_attack_ms) < RAPID_ATTACK_MS
                        && total > MAX_ROTATION_PER_SAMPLE
                    {
                        state.suspicion += 1;
                        if state.suspicion > SUSPICION_LIMIT {
                            state.suspicion = 0;
                            result = CheckResult::fail(
                                format!(
                                    "Impossible head rotation: {:.1}°/tick (max: {:.1}°)",
                                    total, MAX_ROTATION_PER_SAMPLE
                                ),
                                5,
                            );
                        }
                    } else if total < MAX_ROTATION_PER_SAMPLE {
                        state.suspicion = state.suspicion.saturating_sub(1);
                    }
                }
            }

            state.last_look = Some(look);
            state.last_attack_ms = now;
            result
        });
        Ok(result)
    }
}
