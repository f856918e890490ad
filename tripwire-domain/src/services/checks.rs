// Pluggable anomaly checks

pub mod multi_target;
pub mod packet_cadence;
pub mod reach;
pub mod rotation;
pub mod speed;

use std::sync::Arc;

use glam::DVec3;
use thiserror::Error;

use crate::entities::{ActionEvent, CheckResult, EventKind};
use crate::ports::ActorView;
use crate::services::EntityStates;

pub use multi_target::MultiTargetCheck;
pub use packet_cadence::PacketCadenceCheck;
pub use reach::ReachCheck;
pub use rotation::RotationAuraCheck;
pub use speed::SpeedCheck;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    #[error("non-finite input: {field}")]
    NonFinite { field: &'static str },
}

/// One detector. Implementations keep their per-entity state in the shared
/// [`EntityStates`] arena and only see the events they subscribe to.
pub trait Check: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn default_threshold(&self) -> u32;

    fn subscriptions(&self) -> &'static [EventKind];

    fn evaluate(&self, actor: &dyn ActorView, event: &ActionEvent)
        -> Result<CheckResult, CheckError>;
}

/// The built-in detectors in registration order.
pub fn default_checks(states: &Arc<EntityStates>) -> Vec<Box<dyn Check>> {
    vec![
        Box::new(SpeedCheck::new(states.clone())),
        Box::new(PacketCadenceCheck::new(states.clone())),
        Box::new(RotationAuraCheck::new(states.clone())),
        Box::new(MultiTargetCheck::new(states.clone())),
        Box::new(ReachCheck::new(states.clone())),
    ]
}

pub(crate) fn ensure_finite(field: &'static str, value: DVec3) -> Result<(), CheckError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CheckError::NonFinite { field })
    }
}

pub(crate) fn ensure_finite_scalar(field: &'static str, value: f64) -> Result<(), CheckError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CheckError::NonFinite { field })
    }
}
