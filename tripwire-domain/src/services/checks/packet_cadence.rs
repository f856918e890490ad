use std::sync::Arc;

use crate::entities::{ActionEvent, CheckResult, EventKind};
use crate::ports::ActorView;
use crate::services::checks::{Check, CheckError};
use crate::services::EntityStates;

/// Attacks closer than this to the previous movement packet are suspicious.
pub const MIN_ATTACK_GAP_MS: i64 = 5;
const STREAK_LIMIT: u32 = 10;

#[derive(Debug, Default, Clone)]
struct CadenceState {
    last_movement_ms: Option<i64>,
    streak: u32,
}

/// Watches the raw packet stream for attack packets glued to movement packets.
pub struct PacketCadenceCheck {
    states: Arc<EntityStates>,
}

impl PacketCadenceCheck {
    pub fn new(states: Arc<EntityStates>) -> Self {
        Self { states }
    }
}

impl Check for PacketCadenceCheck {
    fn name(&self) -> &str {
        "KillAura"
    }

    fn description(&self) -> &str {
        "Detects killaura by packet timing"
    }

    fn default_threshold(&self) -> u32 {
        5
    }

    fn subscriptions(&self) -> &'static [EventKind] {
        &[EventKind::RawTransportPacket]
    }

    fn evaluate(
        &self,
        actor: &dyn ActorView,
        event: &ActionEvent,
    ) -> Result<CheckResult, CheckError> {
        let ActionEvent::RawTransportPacket { kind, timestamp } = *event else {
            return Ok(CheckResult::pass());
        };
        if !kind.is_movement() && !kind.is_attack() {
            return Ok(CheckResult::pass());
        }

        let result = self.states.with(actor.id(), |state: &mut CadenceState| {
            if kind.is_movement() {
                state.last_movement_ms = Some(timestamp);
                return CheckResult::pass();
            }

            match state.last_movement_ms.map(|last| timestamp.saturating_sub(last)) {
                Some(gap) if gap < MIN_ATTACK_GAP_MS => {
                    state.streak += 1;
                    if state.streak > STREAK_LIMIT {
                        state.streak = 0;
                        return CheckResult::fail(
                            format!(
                                "Attack packet sent {}ms after flying packet (expected >{}ms)",
                                gap, MIN_ATTACK_GAP_MS
                            ),
                            4,
                        );
                    }
                }
                _ => state.streak = state.streak.saturating_sub(1),
            }
            CheckResult::pass()
        });
        Ok(result)
    }
}
