//! Action counters (lock-free atomics).

use std::sync::atomic::{AtomicU64, Ordering};

pub static METRICS: Metrics = Metrics::new();

pub struct Metrics {
    pub actions_submitted: AtomicU64,
    pub actions_succeeded: AtomicU64,
    pub actions_failed: AtomicU64,
    pub buyouts_detected: AtomicU64,
    pub network_switches: AtomicU64,
    pub in_flight_refusals: AtomicU64,
    pub invalid_amounts: AtomicU64,
}

impl Metrics {
    const fn new() -> Self {
        Self {
            actions_submitted: AtomicU64::new(0),
            actions_succeeded: AtomicU64::new(0),
            actions_failed: AtomicU64::new(0),
            buyouts_detected: AtomicU64::new(0),
            network_switches: AtomicU64::new(0),
            in_flight_refusals: AtomicU64::new(0),
            invalid_amounts: AtomicU64::new(0),
        }
    }

    pub fn record_outcome(&self, ok: bool) {
        if ok {
            self.actions_succeeded.fetch_add(1, Ordering::Relaxed);
        } else {
            self.actions_failed.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Render in Prometheus text exposition format.
    pub fn render(&self, in_flight: u32) -> String {
        let submitted = self.actions_submitted.load(Ordering::Relaxed);
        let succeeded = self.actions_succeeded.load(Ordering::Relaxed);
        let failed = self.actions_failed.load(Ordering::Relaxed);
        let buyouts = self.buyouts_detected.load(Ordering::Relaxed);
        let switches = self.network_switches.load(Ordering::Relaxed);
        let refusals = self.in_flight_refusals.load(Ordering::Relaxed);
        let invalid = self.invalid_amounts.load(Ordering::Relaxed);

        format!(
            "\
# HELP market_actions_submitted_total External calls issued.\n\
# TYPE market_actions_submitted_total counter\n\
market_actions_submitted_total {submitted}\n\
# HELP market_actions_succeeded_total External calls that resolved successfully.\n\
# TYPE market_actions_succeeded_total counter\n\
market_actions_succeeded_total {succeeded}\n\
# HELP market_actions_failed_total External calls that failed.\n\
# TYPE market_actions_failed_total counter\n\
market_actions_failed_total {failed}\n\
# HELP market_buyouts_detected_total Offers that matched the buyout price.\n\
# TYPE market_buyouts_detected_total counter\n\
market_buyouts_detected_total {buyouts}\n\
# HELP market_network_switches_total Network switch requests on chain mismatch.\n\
# TYPE market_network_switches_total counter\n\
market_network_switches_total {switches}\n\
# HELP market_in_flight_refusals_total Duplicate submissions refused.\n\
# TYPE market_in_flight_refusals_total counter\n\
market_in_flight_refusals_total {refusals}\n\
# HELP market_invalid_amounts_total Amounts that failed to parse.\n\
# TYPE market_invalid_amounts_total counter\n\
market_invalid_amounts_total {invalid}\n\
# HELP market_actions_in_flight Actions currently pending.\n\
# TYPE market_actions_in_flight gauge\n\
market_actions_in_flight {in_flight}\n"
        )
    }
}
