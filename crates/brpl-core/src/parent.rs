//! BRPL-added fields on a parent record (C4's persistent half of the trust
//! state). The parent record itself — identity, rank, link metric — is
//! owned by the host's parent table; this crate only owns the trust
//! sub-scores and the bookkeeping the trust engine reads and writes.

use crate::config::BrplConfig;
use crate::ids::Rank;

/// Rolling trust sub-scores and data-plane counters for one candidate
/// parent, per [`crate::contracts::ParentTable`] entry. The host stores one
/// of these per parent (keyed however its parent table likes) and passes
/// it into [`crate::comparator::BrplObjective`] alongside the matching
/// [`crate::contracts::ParentSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentTrustState {
    /// Advertisement (sinkhole) trust, EWMA-smoothed, in `[trust_min, scale]`.
    pub trust_sink_adv: u16,
    /// Stability (sinkhole) trust, EWMA-smoothed, in `[trust_min, scale]`.
    pub trust_sink_stab: u16,
    /// Gray-hole trust, EWMA-smoothed from the external oracle.
    pub trust_gray: u16,
    /// Combined trust, floored at `trust_min`.
    pub trust_total: u16,
    /// Self-rank recorded at the previous stability check.
    pub last_rank: Rank,
    /// When `last_rank` was recorded, in clock seconds. `0` means "no
    /// stability check has ever run for this parent".
    pub last_rank_update: u64,
    /// Cumulative packets this parent was asked to forward.
    pub packets_sent: u32,
    /// Cumulative packets this parent is believed to have dropped. Feeds a
    /// host-supplied [`crate::contracts::TrustOracle`]; the core never
    /// reads these two counters directly.
    pub packets_dropped: u32,
}

impl ParentTrustState {
    /// A freshly observed parent starts fully trusted, matching the
    /// source's `brpl_init_trust`.
    pub fn new(config: &BrplConfig) -> Self {
        let scale = config.scale as u16;
        Self {
            trust_sink_adv: scale,
            trust_sink_stab: scale,
            trust_gray: scale,
            trust_total: scale,
            last_rank: Rank(0),
            last_rank_update: 0,
            packets_sent: 0,
            packets_dropped: 0,
        }
    }

    pub fn record_sent(&mut self) {
        self.packets_sent = self.packets_sent.saturating_add(1);
    }

    pub fn record_dropped(&mut self) {
        self.packets_dropped = self.packets_dropped.saturating_add(1);
    }
}
