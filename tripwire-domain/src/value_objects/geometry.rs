// Geometry helpers shared by the combat checks

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Head rotation in degrees, Minecraft convention (yaw 0 faces +Z, pitch +90 looks down).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Rotation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    pub fn is_finite(&self) -> bool {
        self.yaw.is_finite() && self.pitch.is_finite()
    }
}

/// Unit look vector for a rotation.
pub fn look_direction(rotation: Rotation) -> DVec3 {
    let yaw = f64::from(rotation.yaw).to_radians();
    let pitch = f64::from(rotation.pitch).to_radians();
    let xz = pitch.cos();
    DVec3::new(-xz * yaw.sin(), -pitch.sin(), xz * yaw.cos())
}

/// Wraps a yaw delta into `(-180, 180]`.
pub fn normalize_yaw(delta: f32) -> f32 {
    let mut yaw = delta % 360.0;
    if yaw > 180.0 {
        yaw -= 360.0;
    } else if yaw <= -180.0 {
        yaw += 360.0;
    }
    yaw
}

/// Angle between two vectors in degrees. `None` when either has no direction.
pub fn angle_between_degrees(a: DVec3, b: DVec3) -> Option<f64> {
    let a = a.try_normalize()?;
    let b = b.try_normalize()?;
    Some(a.dot(b).clamp(-1.0, 1.0).acos().to_degrees())
}
