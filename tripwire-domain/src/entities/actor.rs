// Actor entity
// Capability answers about the acting entity, sampled by the event source

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::ports::ActorView;
use crate::value_objects::{EntityId, Rotation};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorSnapshot {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub eye_position: DVec3,
    #[serde(default)]
    pub look: Rotation,
    #[serde(default)]
    pub exempt: bool,
}

impl ActorSnapshot {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            eye_position: DVec3::ZERO,
            look: Rotation::default(),
            exempt: false,
        }
    }

    pub fn with_eye(mut self, eye_position: DVec3) -> Self {
        self.eye_position = eye_position;
        self
    }

    pub fn with_look(mut self, yaw: f32, pitch: f32) -> Self {
        self.look = Rotation::new(yaw, pitch);
        self
    }

    pub fn exempt(mut self, exempt: bool) -> Self {
        self.exempt = exempt;
        self
    }
}

impl ActorView for ActorSnapshot {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn eye_position(&self) -> DVec3 {
        self.eye_position
    }

    fn look(&self) -> Rotation {
        self.look
    }

    fn is_exempt(&self) -> bool {
        self.exempt
    }
}
