use serde::Serialize;
use tracing::{debug, warn};

use crate::AppState;
use crate::{AppError, TransportTap};
use tripwire_domain::{DispatchOutcome, IngestEnvelope, PacketEnvelope, INGEST_SCHEMA_VERSION};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub accepted: usize,
    pub violations: usize,
    pub escalations: usize,
    pub faults: usize,
}

impl IngestSummary {
    fn absorb(&mut self, outcome: &DispatchOutcome) {
        self.accepted += 1;
        self.violations += outcome.violations.len();
        self.escalations += outcome.escalations.len();
        self.faults += outcome.faults;
    }
}

fn ensure_schema(schema_version: &str) -> Result<(), AppError> {
    if schema_version != INGEST_SCHEMA_VERSION {
        return Err(AppError::BadRequest(format!(
            "unsupported schema_version '{}', expected '{}'",
            schema_version, INGEST_SCHEMA_VERSION
        )));
    }
    Ok(())
}

/// Dispatches a batch of actor events in order.
pub async fn process_ingest_events(
    state: &AppState,
    envelope: IngestEnvelope,
) -> Result<IngestSummary, AppError> {
    state.metrics.record_ingest_request();
    if let Err(err) = ensure_schema(&envelope.schema_version) {
        state.metrics.record_ingest_error();
        warn!("rejected event batch: {}", err);
        return Err(err);
    }

    let mut summary = IngestSummary::default();
    for item in &envelope.events {
        let outcome = state.dispatcher.dispatch(&item.actor, &item.event);
        state.metrics.record_event(&outcome);
        summary.absorb(&outcome);
    }
    debug!(
        accepted = summary.accepted,
        violations = summary.violations,
        "event batch dispatched"
    );
    Ok(summary)
}

/// Feeds tapped transport packets to the packet-cadence detector.
pub async fn process_tap_packets(
    state: &AppState,
    envelope: PacketEnvelope,
) -> Result<IngestSummary, AppError> {
    state.metrics.record_ingest_request();
    if let Err(err) = ensure_schema(&envelope.schema_version) {
        state.metrics.record_ingest_error();
        warn!("rejected packet batch: {}", err);
        return Err(err);
    }

    let tap = TransportTap::new(state.dispatcher.clone());
    let mut summary = IngestSummary::default();
    for packet in &envelope.packets {
        let outcome = tap.on_packet(packet);
        state.metrics.record_packet(&outcome);
        summary.absorb(&outcome);
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use tripwire_domain::{ActionEvent, ActorSnapshot, EntityId, IngestEvent};

    use super::*;
    use crate::testing::app_state;

    fn speeding(timestamp: i64) -> IngestEvent {
        IngestEvent {
            actor: ActorSnapshot::new(EntityId::from_u128(9), "Notch"),
            event: ActionEvent::Move {
                from: DVec3::ZERO,
                to: DVec3::new(0.0, 0.0, 0.9),
                sprinting: true,
                speed_amplifier: None,
                timestamp,
            },
        }
    }

    #[tokio::test]
    async fn batch_is_dispatched_in_order() {
        let (state, log) = app_state();
        let envelope = IngestEnvelope {
            schema_version: "v1".to_string(),
            events: (0..4).map(|i| speeding(i * 50)).collect(),
        };

        let summary = process_ingest_events(&state, envelope)
            .await
            .expect("ingest");
        assert_eq!(
            summary,
            IngestSummary {
                accepted: 4,
                violations: 4,
                escalations: 2,
                faults: 0,
            }
        );
        let counts: Vec<u32> = log
            .entries
            .lock()
            .iter()
            .map(|escalation| escalation.cumulative_count)
            .collect();
        assert_eq!(counts, [3, 4]);
        assert!(state
            .metrics
            .render_prometheus()
            .contains("tripwire_events_total 4\n"));
    }

    #[tokio::test]
    async fn wrong_schema_is_rejected() {
        let (state, _) = app_state();
        let envelope = IngestEnvelope {
            schema_version: "v0".to_string(),
            events: vec![speeding(0)],
        };
        let err = process_ingest_events(&state, envelope)
            .await
            .expect_err("schema mismatch");
        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(state
            .metrics
            .render_prometheus()
            .contains("tripwire_ingest_errors_total 1\n"));
    }

    #[tokio::test]
    async fn empty_packet_batch_is_accepted() {
        let (state, _) = app_state();
        let envelope = PacketEnvelope {
            schema_version: "v1".to_string(),
            packets: Vec::new(),
        };
        let summary = process_tap_packets(&state, envelope).await.expect("ingest");
        assert_eq!(summary, IngestSummary::default());
    }
}
