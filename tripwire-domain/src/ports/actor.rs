use glam::DVec3;

use crate::value_objects::{EntityId, Rotation};

/// Capability queries answered by the event source for the acting entity.
pub trait ActorView: Send + Sync {
    fn id(&self) -> EntityId;
    fn name(&self) -> &str;
    fn eye_position(&self) -> DVec3;
    fn look(&self) -> Rotation;
    /// Bypass flag; exempt entities are never evaluated.
    fn is_exempt(&self) -> bool;
}
