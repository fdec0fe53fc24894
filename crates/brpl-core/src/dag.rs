//! Per-DAG smoothed state (C3): queue-load average, neighbor churn, the
//! blended coefficient θ, and the running max path cost.

use crate::config::{BrplConfig, MAX_NEIGHBORS};
use crate::contracts::Clock;
use crate::fixedpoint::scale_ratio;
use crate::ids::{DagId, NodeId};
use crate::logging::LogSink;
use crate::neighbors::symmetric_diff_beta;
use crate::queue::QueueMeter;

/// Smoothed, per-DAG inputs to the scoring function. Owned by whatever
/// routing-tree record the host keeps per DODAG — this crate only ever
/// borrows it, never owns the tree itself.
#[derive(Debug, Clone)]
pub struct DagState {
    dag: DagId,
    rank: crate::ids::Rank,
    q_avg: u16,
    beta: u16,
    theta: u16,
    p_max: u32,
    last_beta_update: u64,
    last_rho: u16,
    prev_neighbors: Vec<NodeId>,
}

impl DagState {
    /// A freshly joined DAG: full trust in path cost, no churn observed
    /// yet, no queue pressure.
    pub fn new(dag: DagId, config: &BrplConfig) -> Self {
        let mut state = Self {
            dag,
            rank: crate::ids::Rank(0),
            q_avg: 0,
            beta: config.scale as u16,
            theta: config.scale as u16,
            p_max: 1,
            last_beta_update: 0,
            last_rho: 0,
            prev_neighbors: Vec::new(),
        };
        state.reset(config);
        state
    }

    pub fn dag(&self) -> DagId {
        self.dag
    }

    pub fn rank(&self) -> crate::ids::Rank {
        self.rank
    }

    pub fn set_rank(&mut self, rank: crate::ids::Rank) {
        self.rank = rank;
    }

    pub fn theta(&self) -> u16 {
        self.theta
    }

    pub fn p_max(&self) -> u32 {
        self.p_max.max(1)
    }

    pub fn q_avg(&self) -> u16 {
        self.q_avg
    }

    pub fn beta(&self) -> u16 {
        self.beta
    }

    /// Re-arms the state for a fresh DAG join or a parent-switch event:
    /// θ and β go back to "fully trust path cost, no churn", p_max floors
    /// back to 1, and the neighbor-snapshot history is discarded.
    pub fn reset(&mut self, config: &BrplConfig) {
        self.theta = config.scale as u16;
        self.beta = config.scale as u16;
        self.q_avg = 0;
        self.p_max = 1;
        self.last_beta_update = 0;
        self.last_rho = 0;
        self.prev_neighbors.clear();
    }

    /// Advances the queue-load average, re-samples neighbor churn if the
    /// window has elapsed, recomputes θ, and rescans the candidate set for
    /// the new maximum path cost. Called at most once per comparator
    /// evaluation, regardless of how many candidate pairs it scores.
    ///
    /// `candidate_p_tildes` are `link_metric(p) + rank(p)` for every
    /// candidate with a finite rank — callers (the comparator) own
    /// resolving those from [`crate::contracts::ReferenceObjective`] and
    /// [`crate::contracts::ParentTable`] and filtering out infinite ranks
    /// before calling this.
    pub fn refresh(
        &mut self,
        config: &BrplConfig,
        queue: &QueueMeter,
        clock: &dyn Clock,
        neighbors: &dyn crate::contracts::NeighborTable,
        candidate_p_tildes: &[u64],
        log: &dyn LogSink,
        self_id: NodeId,
    ) {
        let q = queue.length();
        let q_max = queue.capacity();
        let scale = config.scale;

        let alpha = config.queue_ewma_alpha as u32;
        self.q_avg = (((scale - alpha) * self.q_avg as u32 + alpha * q as u32) / scale) as u16;
        let rho = scale_ratio(self.q_avg as u64, q_max as u64, scale);

        let now = clock.now_seconds();
        if self.last_beta_update == 0 {
            self.last_beta_update = now;
            self.beta = scale as u16;
            self.prev_neighbors.clear();
        } else if now.saturating_sub(self.last_beta_update) >= config.beta_window_seconds {
            let mut current = neighbors.neighbors();
            current.truncate(MAX_NEIGHBORS);
            self.beta = symmetric_diff_beta(&self.prev_neighbors, &current, scale);
            self.prev_neighbors = current;
            self.last_beta_update = now;
        }

        let theta_part = ((scale - self.beta as u32) * (scale - rho as u32)) / scale;
        self.theta = (self.beta as u32 + theta_part).min(scale) as u16;

        let mut p_max: u64 = 1;
        for &p_tilde in candidate_p_tildes {
            if p_tilde > p_max {
                p_max = p_tilde;
            }
        }
        self.p_max = p_max.min(u32::MAX as u64) as u32;
        self.last_rho = rho;

        log.state(self_id, q, q_max, self.q_avg, rho, self.theta, self.p_max);
    }
}
