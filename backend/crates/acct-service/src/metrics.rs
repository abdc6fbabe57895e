use crate::CacheOperation;

use std::time::Duration;

use metrics::{counter, gauge, histogram};

/// Metrics collector for RPC and consistency events
#[derive(Clone)]
pub struct Metrics {
    prefix: &'static str,
}

impl Metrics {
    pub fn new() -> Self {
        Self { prefix: "acct" }
    }

    pub fn request_received(&self, method: &str) {
        counter!(format!("{}.rpc.requests", self.prefix), "method" => method.to_string())
            .increment(1);
    }

    pub fn response_sent(&self, method: &str, status: u16, latency: Duration) {
        counter!(
            format!("{}.rpc.responses", self.prefix),
            "method" => method.to_string(),
            "status" => status.to_string()
        )
        .increment(1);
        histogram!(format!("{}.rpc.latency_ms", self.prefix), "method" => method.to_string())
            .record(latency.as_secs_f64() * 1_000.0);
    }

    /// Request turned away by admission control
    pub fn admission_rejected(&self) {
        counter!(format!("{}.rpc.admission_rejected", self.prefix)).increment(1);
    }

    /// Request failed fast by the circuit breaker
    pub fn breaker_rejected(&self) {
        counter!(format!("{}.rpc.breaker_rejected", self.prefix)).increment(1);
    }

    pub fn breaker_state(&self, open: bool) {
        gauge!(format!("{}.rpc.breaker_open", self.prefix)).set(if open { 1.0 } else { 0.0 });
    }

    pub fn cache_hit(&self) {
        counter!(format!("{}.cache.hits", self.prefix)).increment(1);
    }

    pub fn cache_miss(&self) {
        counter!(format!("{}.cache.misses", self.prefix)).increment(1);
    }

    pub fn cache_desync(&self, operation: CacheOperation) {
        counter!(
            format!("{}.cache.desync", self.prefix),
            "operation" => operation.as_str()
        )
        .increment(1);
    }

    /// Event handled by the consumer, labelled by outcome (applied, replayed, poison, failed)
    pub fn event_consumed(&self, outcome: &'static str) {
        counter!(format!("{}.events.consumed", self.prefix), "outcome" => outcome).increment(1);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
