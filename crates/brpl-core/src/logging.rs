//! CSV-shaped structured log events (C7's `LogSink`).
//!
//! Grounded in `rpl-brpl.c`'s verbose-logging macros: every refresh and
//! comparison emits one well-known record type so operators can `grep`/pipe
//! the log straight into a spreadsheet without parsing free text.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::ids::NodeId;

/// Sink for the four BRPL log record types. `()` is not a useful default
/// here because most hosts want sampling, hence [`NullLogSink`] and
/// [`TracingLogSink`] as the two concrete choices.
pub trait LogSink {
    #[allow(clippy::too_many_arguments)]
    fn state(&self, self_id: NodeId, q: u16, q_max: u16, q_avg: u16, rho: u16, theta: u16, p_max: u32);

    #[allow(clippy::too_many_arguments)]
    fn weight(
        &self,
        self_id: NodeId,
        parent: NodeId,
        q: u16,
        q_neighbor: u16,
        q_max: u16,
        p_tilde: u64,
        p_norm: u16,
        dq_norm: i64,
        theta: u16,
        weight: i64,
    );

    #[allow(clippy::too_many_arguments)]
    fn trust(
        &self,
        self_id: NodeId,
        parent: NodeId,
        trust: u16,
        trust_min: u16,
        gamma: u8,
        penalized_weight: i64,
    );

    fn best(&self, self_id: NodeId, p1: NodeId, w1: i64, p2: NodeId, w2: i64, best: NodeId);
}

/// Discards every record. The right default for hosts without a logging
/// facility wired up (and for most unit tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogSink;

impl LogSink for NullLogSink {
    fn state(&self, _: NodeId, _: u16, _: u16, _: u16, _: u16, _: u16, _: u32) {}
    fn weight(&self, _: NodeId, _: NodeId, _: u16, _: u16, _: u16, _: u64, _: u16, _: i64, _: u16, _: i64) {}
    fn trust(&self, _: NodeId, _: NodeId, _: u16, _: u16, _: u8, _: i64) {}
    fn best(&self, _: NodeId, _: NodeId, _: i64, _: NodeId, _: i64, _: NodeId) {}
}

/// Emits each record as a `tracing::debug!` line, sampled at
/// `1 / sample_rate`. A `sample_rate` of 1 logs every record.
#[derive(Debug)]
pub struct TracingLogSink {
    sample_rate: u32,
    counter: AtomicU32,
}

impl TracingLogSink {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
            counter: AtomicU32::new(0),
        }
    }

    fn sampled(&self) -> bool {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        n % self.sample_rate == 0
    }
}

impl Default for TracingLogSink {
    fn default() -> Self {
        Self::new(1)
    }
}

impl LogSink for TracingLogSink {
    fn state(&self, self_id: NodeId, q: u16, q_max: u16, q_avg: u16, rho: u16, theta: u16, p_max: u32) {
        if self.sampled() {
            tracing::debug!(
                target: "brpl",
                "BRPL_STATE,{},{},{},{},{},{},{}",
                self_id.0, q, q_max, q_avg, rho, theta, p_max
            );
        }
    }

    fn weight(
        &self,
        self_id: NodeId,
        parent: NodeId,
        q: u16,
        q_neighbor: u16,
        q_max: u16,
        p_tilde: u64,
        p_norm: u16,
        dq_norm: i64,
        theta: u16,
        weight: i64,
    ) {
        if self.sampled() {
            tracing::debug!(
                target: "brpl",
                "BRPL_WEIGHT,{},{},{},{},{},{},{},{},{},{}",
                self_id.0, parent.0, q, q_neighbor, q_max, p_tilde, p_norm, dq_norm, theta, weight
            );
        }
    }

    fn trust(
        &self,
        self_id: NodeId,
        parent: NodeId,
        trust: u16,
        trust_min: u16,
        gamma: u8,
        penalized_weight: i64,
    ) {
        if self.sampled() {
            tracing::debug!(
                target: "brpl",
                "BRPL_TRUST,{},{},{},{},{},{}",
                self_id.0, parent.0, trust, trust_min, gamma, penalized_weight
            );
        }
    }

    fn best(&self, self_id: NodeId, p1: NodeId, w1: i64, p2: NodeId, w2: i64, best: NodeId) {
        if self.sampled() {
            tracing::debug!(
                target: "brpl",
                "BRPL_BEST,{},{},{},{},{},{}",
                self_id.0, p1.0, w1, p2.0, w2, best.0
            );
        }
    }
}
