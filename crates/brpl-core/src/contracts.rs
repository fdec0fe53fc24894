//! External collaborator traits (C7).
//!
//! BRPL is an objective *function*, not a routing stack — it never owns a
//! socket, a timer queue, or the DODAG parent set. Everything it needs from
//! the host routing engine comes in through one of these traits, mirroring
//! how `strata-bonding`'s `LinkSender` keeps transport specifics out of the
//! scheduler. Every trait has a narrow, synchronous surface so a host can
//! implement it directly over static/interrupt-context state without an
//! allocator or an async runtime.

use crate::ids::{NodeId, Rank};

/// Monotonic time source. Implementations are free to back this with `Instant`,
/// an RTC, or (in simulation) a fully synthetic clock.
pub trait Clock {
    /// Free-running tick counter; unit is implementation-defined and only
    /// used for log correlation.
    fn now_ticks(&self) -> u64;
    /// Wall/uptime clock in whole seconds, used by all window-gated logic
    /// (churn sampling, stability trust warm-up).
    fn now_seconds(&self) -> u64;
}

/// Read-only view over the link-local neighbor set, used for churn
/// sampling (C2). Implementations should return a deterministic snapshot;
/// this crate truncates to [`crate::config::MAX_NEIGHBORS`] itself.
pub trait NeighborTable {
    fn neighbors(&self) -> Vec<NodeId>;
}

/// BRPL-specific fields a parent may have advertised alongside its normal
/// RPL DIO, used by the queue-balancing term's remote-queue estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrplQueueAdvert {
    pub queue: u16,
    pub queue_max: u16,
}

/// A candidate parent as seen from the parent table, restricted to the
/// fields BRPL's scoring needs. Identity and rank are authoritative data
/// the host owns; `brpl_queue` is optional because not every neighbor
/// advertises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentSnapshot {
    pub id: NodeId,
    pub rank: Rank,
    pub brpl_queue: Option<BrplQueueAdvert>,
}

/// Enumerates current candidate parents on a DAG. Kept separate from
/// [`ReferenceObjective`] because, unlike link metric/path cost, parent
/// identity and rank are not objective-specific.
pub trait ParentTable {
    fn parents_on_dag(&self, dag: crate::ids::DagId) -> Vec<ParentSnapshot>;
}

/// The non-comparator behavior BRPL delegates to a wrapped objective
/// (conventionally MRHOF or OF0) rather than reimplementing, per C6's
/// "everything except the comparator forwards" rule.
///
/// `is_available` lets a host opt BRPL out of path-cost scoring entirely —
/// see [`NoOpReferenceObjective`] — in which case the comparator degrades
/// to "first candidate wins" rather than computing a meaningless score.
pub trait ReferenceObjective {
    fn parent_link_metric(&self, parent: NodeId) -> u16;
    fn parent_has_usable_link(&self, parent: NodeId) -> bool;
    fn parent_path_cost(&self, parent: NodeId) -> u16;
    fn rank_via_parent(&self, parent: NodeId) -> Rank;

    fn is_available(&self) -> bool {
        true
    }
}

/// Degrades gracefully in place of a real reference objective: BRPL
/// notices `is_available() == false` and falls back to always preferring
/// the first candidate, per the documented failure semantics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpReferenceObjective;

impl ReferenceObjective for NoOpReferenceObjective {
    fn parent_link_metric(&self, _parent: NodeId) -> u16 {
        0
    }
    fn parent_has_usable_link(&self, _parent: NodeId) -> bool {
        false
    }
    fn parent_path_cost(&self, _parent: NodeId) -> u16 {
        0
    }
    fn rank_via_parent(&self, _parent: NodeId) -> Rank {
        Rank::INFINITE
    }
    fn is_available(&self) -> bool {
        false
    }
}

/// Supplies the gray-hole trust sub-score (C4's third leg), which is
/// computed from packet-forwarding observations outside BRPL's own state —
/// typically a separate watchdog that counts forwarded-vs-dropped traffic
/// per neighbor.
pub trait TrustOracle {
    /// Raw, unsmoothed gray-hole trust for `node`, scaled by `scale`.
    /// Returning `scale` (full trust) is the correct answer when no
    /// observation exists yet.
    fn trust_gray_raw(&self, node: NodeId, scale: u32) -> u16;
}

/// Trust oracle for hosts with no gray-hole watchdog wired up: always
/// reports full trust, so the combined score reduces to the
/// advertisement/stability pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysTrustOracle;

impl TrustOracle for AlwaysTrustOracle {
    fn trust_gray_raw(&self, _node: NodeId, scale: u32) -> u16 {
        scale as u16
    }
}
