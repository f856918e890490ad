use std::sync::atomic::{AtomicU64, Ordering};

use tripwire_domain::DispatchOutcome;

#[derive(Debug, Default)]
pub struct Metrics {
    ingest_requests: AtomicU64,
    ingest_errors: AtomicU64,
    events: AtomicU64,
    packets: AtomicU64,
    violations: AtomicU64,
    escalations: AtomicU64,
    faults: AtomicU64,
    purges: AtomicU64,
}

impl Metrics {
    pub fn record_ingest_request(&self) {
        self.ingest_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_ingest_error(&self) {
        self.ingest_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_event(&self, outcome: &DispatchOutcome) {
        self.events.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(outcome);
    }

    pub fn record_packet(&self, outcome: &DispatchOutcome) {
        self.packets.fetch_add(1, Ordering::Relaxed);
        self.record_outcome(outcome);
    }

    fn record_outcome(&self, outcome: &DispatchOutcome) {
        self.violations
            .fetch_add(outcome.violations.len() as u64, Ordering::Relaxed);
        self.escalations
            .fetch_add(outcome.escalations.len() as u64, Ordering::Relaxed);
        self.faults
            .fetch_add(outcome.faults as u64, Ordering::Relaxed);
    }

    pub fn record_purge(&self) {
        self.purges.fetch_add(1, Ordering::Relaxed);
    }

    pub fn escalations(&self) -> u64 {
        self.escalations.load(Ordering::Relaxed)
    }

    pub fn render_prometheus(&self) -> String {
        let counters = [
            ("tripwire_ingest_requests_total", &self.ingest_requests),
            ("tripwire_ingest_errors_total", &self.ingest_errors),
            ("tripwire_events_total", &self.events),
            ("tripwire_packets_total", &self.packets),
            ("tripwire_violations_total", &self.violations),
            ("tripwire_escalations_total", &self.escalations),
            ("tripwire_check_faults_total", &self.faults),
            ("tripwire_purges_total", &self.purges),
        ];

        let mut out = String::new();
        for (name, counter) in counters {
            out.push_str(&format!(
                "# TYPE {} counter\n{} {}\n",
                name,
                name,
                counter.load(Ordering::Relaxed)
            ));
        }
        out
    }
}
