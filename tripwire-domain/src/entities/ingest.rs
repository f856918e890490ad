// Ingest envelopes accepted from the event source and the transport tap

use serde::{Deserialize, Serialize};

use crate::entities::{ActionEvent, ActorSnapshot, PacketKind};
use crate::value_objects::EntityId;

pub const INGEST_SCHEMA_VERSION: &str = "v1";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestEvent {
    pub actor: ActorSnapshot,
    pub event: ActionEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngestEnvelope {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub events: Vec<IngestEvent>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TapPacket {
    pub entity_id: EntityId,
    #[serde(default)]
    pub entity_name: String,
    #[serde(default)]
    pub exempt: bool,
    pub kind: PacketKind,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PacketEnvelope {
    #[serde(default)]
    pub schema_version: String,
    #[serde(default)]
    pub packets: Vec<TapPacket>,
}
