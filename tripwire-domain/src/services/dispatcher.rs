// Check registry and event dispatch

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::entities::{
    ActionEvent, CheckInfo, CheckOverride, CheckResult, DispatchOutcome, Escalation,
};
use crate::error::DomainError;
use crate::ports::{ActorView, EscalationSink};
use crate::services::{Check, EntityStates, ViolationLedger};
use crate::value_objects::EntityId;

struct RegisteredCheck {
    check: Box<dyn Check>,
    enabled: AtomicBool,
    threshold: AtomicU32,
}

impl RegisteredCheck {
    fn info(&self) -> CheckInfo {
        CheckInfo {
            name: self.check.name().to_string(),
            description: self.check.description().to_string(),
            enabled: self.enabled.load(Ordering::Relaxed),
            threshold: self.threshold.load(Ordering::Relaxed),
            default_threshold: self.check.default_threshold(),
            subscriptions: self.check.subscriptions().to_vec(),
        }
    }
}

/// Ordered check registry. Routes each event to the enabled checks subscribed to its kind,
/// feeds violations to the ledger and reports threshold crossings to the sink.
pub struct Dispatcher {
    checks: RwLock<Vec<Arc<RegisteredCheck>>>,
    ledger: Arc<ViolationLedger>,
    states: Arc<EntityStates>,
    sink: Arc<dyn EscalationSink>,
}

impl Dispatcher {
    pub fn new(
        ledger: Arc<ViolationLedger>,
        states: Arc<EntityStates>,
        sink: Arc<dyn EscalationSink>,
    ) -> Self {
        Self {
            checks: RwLock::new(Vec::new()),
            ledger,
            states,
            sink,
        }
    }

    /// Registered checks start enabled at their default threshold.
    pub fn register(&self, check: Box<dyn Check>) {
        let threshold = check.default_threshold();
        debug!(check = check.name(), threshold, "check registered");
        self.checks.write().push(Arc::new(RegisteredCheck {
            check,
            enabled: AtomicBool::new(true),
            threshold: AtomicU32::new(threshold),
        }));
    }

    pub fn ledger(&self) -> &Arc<ViolationLedger> {
        &self.ledger
    }

    pub fn states(&self) -> &Arc<EntityStates> {
        &self.states
    }

    fn find(&self, name: &str) -> Option<Arc<RegisteredCheck>> {
        self.checks
            .read()
            .iter()
            .find(|registered| registered.check.name().eq_ignore_ascii_case(name))
            .cloned()
    }

    fn require(&self, name: &str) -> Result<Arc<RegisteredCheck>, DomainError> {
        self.find(name)
            .ok_or_else(|| DomainError::CheckNotFound(name.to_string()))
    }

    pub fn check(&self, name: &str) -> Option<CheckInfo> {
        self.find(name).map(|registered| registered.info())
    }

    pub fn checks(&self) -> Vec<CheckInfo> {
        self.checks
            .read()
            .iter()
            .map(|registered| registered.info())
            .collect()
    }

    pub fn set_enabled(&self, name: &str, enabled: bool) -> Result<CheckInfo, DomainError> {
        let registered = self.require(name)?;
        registered.enabled.store(enabled, Ordering::Relaxed);
        info!(check = registered.check.name(), enabled, "check state changed");
        Ok(registered.info())
    }

    pub fn toggle(&self, name: &str) -> Result<CheckInfo, DomainError> {
        let registered = self.require(name)?;
        let enabled = !registered.enabled.fetch_xor(true, Ordering::Relaxed);
        info!(check = registered.check.name(), enabled, "check toggled");
        Ok(registered.info())
    }

    pub fn set_threshold(&self, name: &str, threshold: u32) -> Result<CheckInfo, DomainError> {
        let registered = self.require(name)?;
        registered.threshold.store(threshold, Ordering::Relaxed);
        info!(check = registered.check.name(), threshold, "check threshold changed");
        Ok(registered.info())
    }

    /// Applies configured overrides; names that match no check are logged and skipped.
    pub fn apply_overrides(&self, overrides: &HashMap<String, CheckOverride>) {
        for (name, check_override) in overrides {
            let Some(registered) = self.find(name) else {
                warn!(check = %name, "override for unknown check ignored");
                continue;
            };
            if let Some(enabled) = check_override.enabled {
                registered.enabled.store(enabled, Ordering::Relaxed);
            }
            if let Some(threshold) = check_override.threshold {
                registered.threshold.store(threshold, Ordering::Relaxed);
            }
        }
    }

    pub fn dispatch(&self, actor: &dyn ActorView, event: &ActionEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        if actor.is_exempt() {
            return outcome;
        }

        let kind = event.kind();
        let snapshot: Vec<Arc<RegisteredCheck>> = self.checks.read().clone();

        for registered in snapshot {
            if !registered.enabled.load(Ordering::Relaxed)
                || !registered.check.subscriptions().contains(&kind)
            {
                continue;
            }
            outcome.evaluated += 1;

            let name = registered.check.name();
            let result = match catch_unwind(AssertUnwindSafe(|| {
                registered.check.evaluate(actor, event)
            })) {
                Ok(Ok(result)) => result,
                Ok(Err(err)) => {
                    warn!(
                        check = name,
                        entity = %actor.id(),
                        error = %err,
                        "check failed; treated as pass"
                    );
                    outcome.faults += 1;
                    continue;
                }
                Err(payload) => {
                    warn!(
                        check = name,
                        entity = %actor.id(),
                        panic = panic_message(payload.as_ref()),
                        "check panicked; treated as pass"
                    );
                    outcome.faults += 1;
                    continue;
                }
            };

            if !result.violated {
                continue;
            }
            debug!(check = name, entity = %actor.id(), result = %result, "violation");

            let threshold = registered.threshold.load(Ordering::Relaxed);
            if self
                .ledger
                .record(actor.id(), name, threshold, event.timestamp())
            {
                let escalation = self.escalate(actor, name, &result, event.timestamp());
                outcome.escalations.push(escalation);
            }
            outcome.violations.push((name.to_string(), result));
        }

        outcome
    }

    fn escalate(
        &self,
        actor: &dyn ActorView,
        check_name: &str,
        result: &CheckResult,
        timestamp: i64,
    ) -> Escalation {
        let escalation = Escalation {
            entity_id: actor.id(),
            entity_name: actor.name().to_string(),
            check_name: check_name.to_string(),
            severity: result.severity,
            cumulative_count: self.ledger.violation_count(actor.id(), check_name),
            reason: result.reason.clone(),
            timestamp,
            reported_at: Utc::now(),
        };
        info!(
            entity = %escalation.entity_name,
            check = check_name,
            level = escalation.severity.level(),
            label = escalation.severity.as_str(),
            count = escalation.cumulative_count,
            "threshold crossed"
        );
        self.sink.report(&escalation);
        escalation
    }

    /// Drops every per-check slot and ledger entry for the entity.
    pub fn purge(&self, id: EntityId) {
        self.states.purge(id);
        self.ledger.clear(id);
        debug!(entity = %id, "entity purged");
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use glam::DVec3;
    use parking_lot::Mutex;

    use super::*;
    use crate::entities::{ActorSnapshot, AttackTarget, EventKind, PacketKind};
    use crate::services::{default_checks, CheckError};

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<Escalation>>,
    }

    impl EscalationSink for RecordingSink {
        fn report(&self, escalation: &Escalation) {
            self.seen.lock().push(escalation.clone());
        }
    }

    struct ExplodingCheck;

    impl Check for ExplodingCheck {
        fn name(&self) -> &str {
            "Exploding"
        }

        fn description(&self) -> &str {
            "panics on every move"
        }

        fn default_threshold(&self) -> u32 {
            1
        }

        fn subscriptions(&self) -> &'static [EventKind] {
            &[EventKind::Move]
        }

        fn evaluate(
            &self,
            _actor: &dyn ActorView,
            _event: &ActionEvent,
        ) -> Result<CheckResult, CheckError> {
            panic!("boom");
        }
    }

    fn build() -> (Dispatcher, Arc<RecordingSink>) {
        let states = Arc::new(EntityStates::new());
        let sink = Arc::new(RecordingSink::default());
        let dispatcher = Dispatcher::new(
            Arc::new(ViolationLedger::default()),
            states.clone(),
            sink.clone(),
        );
        for check in default_checks(&states) {
            dispatcher.register(check);
        }
        (dispatcher, sink)
    }

    fn player() -> ActorSnapshot {
        ActorSnapshot::new(EntityId::from_u128(1), "Steve").with_eye(DVec3::new(0.0, 1.62, 0.0))
    }

    fn fast_move(timestamp: i64) -> ActionEvent {
        ActionEvent::Move {
            from: DVec3::ZERO,
            to: DVec3::new(1.0, 0.0, 0.0),
            sprinting: false,
            speed_amplifier: None,
            timestamp,
        }
    }

    fn hit(target: u128, timestamp: i64) -> ActionEvent {
        ActionEvent::Attack {
            target: AttackTarget {
                id: EntityId::from_u128(target),
                position: DVec3::new(0.0, 0.72, 2.0),
                width: 0.6,
                height: 1.8,
                living: true,
            },
            timestamp,
        }
    }

    #[test]
    fn registry_keeps_registration_order() {
        let (dispatcher, _) = build();
        let names: Vec<String> = dispatcher.checks().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            ["Speed", "KillAura", "KillAura-Rotation", "MultiTarget", "Reach"]
        );
    }

    #[test]
    fn events_reach_only_subscribed_checks() {
        let (dispatcher, _) = build();
        let actor = player();
        assert_eq!(dispatcher.dispatch(&actor, &fast_move(0)).evaluated, 1);
        assert_eq!(dispatcher.dispatch(&actor, &hit(5, 0)).evaluated, 3);
        let packet = ActionEvent::RawTransportPacket {
            kind: PacketKind::Flying,
            timestamp: 0,
        };
        assert_eq!(dispatcher.dispatch(&actor, &packet).evaluated, 1);
        let look = ActionEvent::LookUpdate {
            yaw: 10.0,
            pitch: 0.0,
            timestamp: 0,
        };
        assert_eq!(dispatcher.dispatch(&actor, &look).evaluated, 0);
    }

    #[test]
    fn third_speed_violation_escalates() {
        let (dispatcher, sink) = build();
        let actor = player();

        let first = dispatcher.dispatch(&actor, &fast_move(0));
        assert_eq!(first.violations.len(), 1);
        assert!(first.escalations.is_empty());
        dispatcher.dispatch(&actor, &fast_move(50));
        let third = dispatcher.dispatch(&actor, &fast_move(100));

        assert_eq!(third.escalations.len(), 1);
        let escalation = &third.escalations[0];
        assert_eq!(escalation.check_name, "Speed");
        assert_eq!(escalation.entity_name, "Steve");
        assert_eq!(escalation.cumulative_count, 3);
        assert_eq!(escalation.timestamp, 100);
        assert_eq!(sink.seen.lock().len(), 1);

        // No reset after crossing, so every further violation escalates again.
        dispatcher.dispatch(&actor, &fast_move(150));
        assert_eq!(sink.seen.lock().len(), 2);
    }

    #[test]
    fn panicking_check_is_contained() {
        let (dispatcher, _) = build();
        dispatcher.register(Box::new(ExplodingCheck));
        let actor = player();

        let outcome = dispatcher.dispatch(&actor, &fast_move(0));
        assert_eq!(outcome.evaluated, 2);
        assert_eq!(outcome.faults, 1);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].0, "Speed");
    }

    #[test]
    fn check_errors_count_as_faults() {
        let (dispatcher, _) = build();
        let broken = ActionEvent::Move {
            from: DVec3::new(f64::INFINITY, 0.0, 0.0),
            to: DVec3::ZERO,
            sprinting: false,
            speed_amplifier: None,
            timestamp: 0,
        };
        let outcome = dispatcher.dispatch(&player(), &broken);
        assert_eq!(outcome.faults, 1);
        assert!(outcome.violations.is_empty());
    }

    #[test]
    fn disabled_check_never_runs() {
        let (dispatcher, _) = build();
        let info = dispatcher.set_enabled("speed", false).expect("known check");
        assert!(!info.enabled);

        let outcome = dispatcher.dispatch(&player(), &fast_move(0));
        assert_eq!(outcome.evaluated, 0);
        assert!(outcome.is_clean());

        assert!(dispatcher.toggle("SPEED").expect("known check").enabled);
        assert_eq!(dispatcher.dispatch(&player(), &fast_move(10)).evaluated, 1);
    }

    #[test]
    fn unknown_names_are_not_found() {
        let (dispatcher, _) = build();
        assert_eq!(dispatcher.check("Fly"), None);
        assert_eq!(
            dispatcher.set_threshold("Fly", 2),
            Err(DomainError::CheckNotFound("Fly".to_string()))
        );
    }

    #[test]
    fn overrides_adjust_threshold_and_state() {
        let (dispatcher, sink) = build();
        let mut overrides = HashMap::new();
        overrides.insert(
            "Speed".to_string(),
            CheckOverride {
                enabled: None,
                threshold: Some(1),
            },
        );
        overrides.insert(
            "reach".to_string(),
            CheckOverride {
                enabled: Some(false),
                threshold: None,
            },
        );
        overrides.insert("Nope".to_string(), CheckOverride::default());
        dispatcher.apply_overrides(&overrides);

        assert!(!dispatcher.check("Reach").expect("known").enabled);
        let outcome = dispatcher.dispatch(&player(), &fast_move(0));
        assert_eq!(outcome.escalations.len(), 1);
        assert_eq!(sink.seen.lock().len(), 1);
    }

    #[test]
    fn exempt_actors_are_skipped() {
        let (dispatcher, sink) = build();
        let exempt = player().exempt(true);
        for i in 0..5 {
            let outcome = dispatcher.dispatch(&exempt, &fast_move(i * 50));
            assert_eq!(outcome, DispatchOutcome::default());
        }
        assert!(sink.seen.lock().is_empty());
        assert_eq!(dispatcher.ledger().tracked(), 0);
    }

    #[test]
    fn extreme_timestamps_never_escape_dispatch() {
        let (dispatcher, _) = build();
        let actor = player();

        for timestamp in [i64::MIN, i64::MAX, i64::MIN] {
            let outcome = dispatcher.dispatch(&actor, &fast_move(timestamp));
            assert_eq!(outcome.faults, 0);
            assert_eq!(outcome.violations.len(), 1);
        }
        for timestamp in [i64::MIN, i64::MAX] {
            let outcome = dispatcher.dispatch(&actor, &hit(10, timestamp));
            assert_eq!(outcome.faults, 0);
        }
        for timestamp in [i64::MAX, i64::MIN] {
            let packet = ActionEvent::RawTransportPacket {
                kind: PacketKind::UseEntity,
                timestamp,
            };
            assert_eq!(dispatcher.dispatch(&actor, &packet).faults, 0);
        }
    }

    #[test]
    fn purge_racing_dispatch_is_safe() {
        let (dispatcher, _) = build();
        let actor = player();

        std::thread::scope(|scope| {
            scope.spawn(|| {
                for i in 0..500 {
                    dispatcher.dispatch(&actor, &hit(10 + (i % 4) as u128, i * 20));
                    dispatcher.dispatch(&actor, &fast_move(i * 20));
                }
            });
            scope.spawn(|| {
                for _ in 0..500 {
                    dispatcher.purge(actor.id);
                    std::thread::yield_now();
                }
            });
        });

        dispatcher.purge(actor.id);
        assert_eq!(dispatcher.states().tracked(), 0);
        assert_eq!(dispatcher.ledger().tracked(), 0);
    }

    #[test]
    fn purge_restarts_every_detector_cold() {
        let (dispatcher, _) = build();
        let actor = player();

        dispatcher.dispatch(&actor, &hit(10, 0));
        dispatcher.dispatch(&actor, &hit(11, 100));
        let flagged = dispatcher.dispatch(&actor, &hit(12, 200));
        assert!(flagged.violations.iter().any(|(name, _)| name == "MultiTarget"));
        assert_eq!(dispatcher.ledger().violation_count(actor.id, "MultiTarget"), 1);

        dispatcher.purge(actor.id);
        assert_eq!(dispatcher.states().tracked(), 0);
        assert_eq!(dispatcher.ledger().violation_count(actor.id, "MultiTarget"), 0);

        let after = dispatcher.dispatch(&actor, &hit(13, 250));
        assert!(after.violations.iter().all(|(name, _)| name != "MultiTarget"));
    }
}
