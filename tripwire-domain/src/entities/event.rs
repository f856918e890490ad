// Event entity
// Action events produced for one tracked entity by the event source

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::value_objects::EntityId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Move,
    Attack,
    LookUpdate,
    RawTransportPacket,
}

/// Inbound packet kinds seen on the raw transport tap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacketKind {
    Position,
    Look,
    PositionLook,
    Flying,
    UseEntity,
    Other,
}

impl PacketKind {
    pub fn is_movement(self) -> bool {
        matches!(
            self,
            PacketKind::Position | PacketKind::Look | PacketKind::PositionLook | PacketKind::Flying
        )
    }

    pub fn is_attack(self) -> bool {
        matches!(self, PacketKind::UseEntity)
    }
}

fn default_living() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackTarget {
    pub id: EntityId,
    /// Feet position of the target.
    pub position: DVec3,
    pub width: f64,
    pub height: f64,
    #[serde(default = "default_living")]
    pub living: bool,
}

impl AttackTarget {
    pub fn center(&self) -> DVec3 {
        self.position + DVec3::new(0.0, self.height / 2.0, 0.0)
    }
}

/// Timestamps are monotonic milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionEvent {
    Move {
        from: DVec3,
        to: DVec3,
        #[serde(default)]
        sprinting: bool,
        #[serde(default)]
        speed_amplifier: Option<u32>,
        timestamp: i64,
    },
    Attack {
        target: AttackTarget,
        timestamp: i64,
    },
    LookUpdate {
        yaw: f32,
        pitch: f32,
        timestamp: i64,
    },
    RawTransportPacket {
        kind: PacketKind,
        timestamp: i64,
    },
}

impl ActionEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ActionEvent::Move { .. } => EventKind::Move,
            ActionEvent::Attack { .. } => EventKind::Attack,
            ActionEvent::LookUpdate { .. } => EventKind::LookUpdate,
            ActionEvent::RawTransportPacket { .. } => EventKind::RawTransportPacket,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            ActionEvent::Move { timestamp, .. }
            | ActionEvent::Attack { timestamp, .. }
            | ActionEvent::LookUpdate { timestamp, .. }
            | ActionEvent::RawTransportPacket { timestamp, .. } => *timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_event_deserializes_with_living_default() {
        let event: ActionEvent = serde_json::from_str(
            r#"{"type":"attack","timestamp":1200,"target":{"id":"0123456789abcdef0123456789abcdef","position":[1.0,64.0,2.0],"width":0.6,"height":1.8}}"#,
        )
        .expect("event");
        assert_eq!(event.kind(), EventKind::Attack);
        assert_eq!(event.timestamp(), 1200);
        match event {
            ActionEvent::Attack { target, .. } => {
                assert!(target.living);
                assert!((target.center() - DVec3::new(1.0, 64.9, 2.0)).length() < 1e-9);
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn packet_kinds_split_into_movement_and_attack() {
        assert!(PacketKind::Flying.is_movement());
        assert!(PacketKind::PositionLook.is_movement());
        assert!(PacketKind::UseEntity.is_attack());
        assert!(!PacketKind::Other.is_movement());
        assert!(!PacketKind::Other.is_attack());
    }
}
