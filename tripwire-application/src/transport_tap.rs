// Raw transport tap adapter
// Turns decoded inbound packets into dispatches for the packet-cadence detector

use std::sync::Arc;

use tracing::trace;
use tripwire_domain::services::Dispatcher;
use tripwire_domain::{ActionEvent, ActorSnapshot, DispatchOutcome, TapPacket};

/// Owned by whoever decodes the transport stream; there is one per process, passed in
/// explicitly instead of being looked up globally.
#[derive(Clone)]
pub struct TransportTap {
    dispatcher: Arc<Dispatcher>,
}

impl TransportTap {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    pub fn on_packet(&self, packet: &TapPacket) -> DispatchOutcome {
        let name = if packet.entity_name.is_empty() {
            packet.entity_id.to_string()
        } else {
            packet.entity_name.clone()
        };
        let actor = ActorSnapshot::new(packet.entity_id, name).exempt(packet.exempt);
        let event = ActionEvent::RawTransportPacket {
            kind: packet.kind,
            timestamp: packet.timestamp,
        };
        trace!(entity = %packet.entity_id, kind = ?packet.kind, "tap packet");
        self.dispatcher.dispatch(&actor, &event)
    }
}
