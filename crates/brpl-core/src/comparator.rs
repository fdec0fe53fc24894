//! Comparator / objective (C6): the BRPL objective-function vtable.
//! Forwards every non-comparator hook verbatim to a wrapped reference
//! objective (conventionally MRHOF) and implements only `best_parent` and
//! `reset` itself. Grounded in `rpl-brpl.c`'s `rpl_brpl` vtable and
//! `brpl_best_parent`.

use crate::config::BrplConfig;
use crate::contracts::{Clock, NeighborTable, ParentSnapshot, ParentTable, ReferenceObjective};
use crate::dag::DagState;
use crate::ids::{NodeId, Rank};
use crate::logging::LogSink;
use crate::parent::ParentTrustState;
use crate::queue::QueueMeter;
use crate::scoring;
use crate::trust;

/// Objective Code Point BRPL advertises in its DIO. Not standardized
/// upstream (unlike `RPL_OCP_OF0`/`RPL_OCP_MRHOF`); the source's
/// `RPL_OCP_BRPL` is likewise experimental, defined at the deployment's
/// discretion rather than by an RFC.
pub const OCP_BRPL: u16 = 0xB9;

/// The BRPL objective. Composes (never inherits) a reference objective —
/// held as a borrow for the lifetime of the routing engine that owns both.
pub struct BrplObjective<'a> {
    config: BrplConfig,
    reference: &'a dyn ReferenceObjective,
    oracle: &'a dyn crate::contracts::TrustOracle,
    log: &'a dyn LogSink,
}

impl<'a> BrplObjective<'a> {
    pub fn new(
        config: BrplConfig,
        reference: &'a dyn ReferenceObjective,
        oracle: &'a dyn crate::contracts::TrustOracle,
        log: &'a dyn LogSink,
    ) -> Self {
        Self { config, reference, oracle, log }
    }

    pub fn config(&self) -> &BrplConfig {
        &self.config
    }

    /// Re-arms a DAG's state to its defaults, as `rpl-brpl.c`'s objective
    /// reset does when a DAG is (re)joined.
    pub fn reset(&self, dag: &mut DagState) {
        dag.reset(&self.config);
    }

    // --- Forwarded verbatim to the reference objective ---

    pub fn parent_link_metric(&self, parent: NodeId) -> u16 {
        self.reference.parent_link_metric(parent)
    }

    pub fn parent_has_usable_link(&self, parent: NodeId) -> bool {
        self.reference.parent_has_usable_link(parent)
    }

    pub fn parent_path_cost(&self, parent: NodeId) -> u16 {
        self.reference.parent_path_cost(parent)
    }

    pub fn rank_via_parent(&self, parent: NodeId) -> Rank {
        self.reference.rank_via_parent(parent)
    }

    // `update_metric_container`, `best_dag`, `dao_ack_callback` are left
    // unimplemented on purpose: the source's vtable wires all three to
    // `NULL` and nothing in this crate's scope needs them.

    /// The public hook invoked when new rank or reliability information
    /// arrives for `parent_id`. Must run before [`BrplObjective::best_parent`]
    /// scores that parent in the same evaluation if fresh information just
    /// arrived, so the penalty reflects the latest trust rather than a stale
    /// value from the previous cycle.
    pub fn update_parent_trust(
        &self,
        state: &mut ParentTrustState,
        dag: &DagState,
        parent_id: NodeId,
        parent_rank: Rank,
        clock: &dyn Clock,
    ) {
        trust::update(
            state,
            dag.rank(),
            parent_rank,
            clock.now_seconds(),
            parent_id,
            self.oracle,
            &self.config,
        );
    }

    /// The BRPL comparator: refreshes `dag`'s state at most once, scores
    /// both candidates, applies each one's trust penalty, and returns the
    /// lower-weight candidate's identifier (ties break toward `p1`).
    ///
    /// `p_max`'s candidate scan needs every current candidate on `dag`, not
    /// just the pair being compared, so `parents` enumerates the full set;
    /// `p1`/`p2` are the two candidates actually being ranked in this call.
    ///
    /// Degrades gracefully: with no reference objective wired up, the whole
    /// comparison collapses to "first candidate wins" rather than computing
    /// a meaningless score.
    #[allow(clippy::too_many_arguments)]
    pub fn best_parent(
        &self,
        dag: &mut DagState,
        clock: &dyn Clock,
        neighbors: &dyn NeighborTable,
        parents: &dyn ParentTable,
        queue: &QueueMeter,
        self_id: NodeId,
        candidate1: Option<(&ParentSnapshot, &ParentTrustState)>,
        candidate2: Option<(&ParentSnapshot, &ParentTrustState)>,
    ) -> Option<NodeId> {
        let (p1, p2) = match (candidate1, candidate2) {
            (None, None) => return None,
            (Some((p, _)), None) => return Some(p.id),
            (None, Some((p, _))) => return Some(p.id),
            (Some(a), Some(b)) => (a, b),
        };

        if !self.reference.is_available() {
            return Some(p1.0.id);
        }

        let p_tildes: Vec<u64> = parents
            .parents_on_dag(dag.dag())
            .into_iter()
            .filter(|p| p.rank.is_finite())
            .map(|p| self.reference.parent_link_metric(p.id) as u64 + p.rank.0 as u64)
            .collect();

        dag.refresh(&self.config, queue, clock, neighbors, &p_tildes, self.log, self_id);

        let self_rank = dag.rank();
        let w1_base = scoring::base_weight(dag, self_rank, queue, self.reference, p1.0, &self.config, self.log, self_id);
        let w2_base = scoring::base_weight(dag, self_rank, queue, self.reference, p2.0, &self.config, self.log, self_id);

        let w1 = scoring::apply_trust_penalty(w1_base, p1.1.trust_total, &self.config);
        let w2 = scoring::apply_trust_penalty(w2_base, p2.1.trust_total, &self.config);

        self.log.trust(self_id, p1.0.id, p1.1.trust_total, self.config.trust_min, self.config.trust_penalty_gamma, w1);
        self.log.trust(self_id, p2.0.id, p2.1.trust_total, self.config.trust_min, self.config.trust_penalty_gamma, w2);

        let best = if w2 < w1 { p2.0.id } else { p1.0.id };
        self.log.best(self_id, p1.0.id, w1, p2.0.id, w2, best);
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{AlwaysTrustOracle, BrplQueueAdvert, NoOpReferenceObjective};
    use crate::ids::DagId;
    use crate::logging::NullLogSink;

    struct FixedClock(u64);
    impl Clock for FixedClock {
        fn now_ticks(&self) -> u64 {
            self.0
        }
        fn now_seconds(&self) -> u64 {
            self.0
        }
    }

    struct NoNeighbors;
    impl NeighborTable for NoNeighbors {
        fn neighbors(&self) -> Vec<NodeId> {
            Vec::new()
        }
    }

    struct TwoParents(Vec<ParentSnapshot>);
    impl ParentTable for TwoParents {
        fn parents_on_dag(&self, _dag: crate::ids::DagId) -> Vec<ParentSnapshot> {
            self.0.clone()
        }
    }

    struct StubReference {
        metrics: std::collections::HashMap<u16, u16>,
    }
    impl ReferenceObjective for StubReference {
        fn parent_link_metric(&self, parent: NodeId) -> u16 {
            *self.metrics.get(&parent.0).unwrap_or(&0)
        }
        fn parent_has_usable_link(&self, _parent: NodeId) -> bool {
            true
        }
        fn parent_path_cost(&self, _parent: NodeId) -> u16 {
            0
        }
        fn rank_via_parent(&self, _parent: NodeId) -> Rank {
            Rank(0)
        }
    }

    #[test]
    fn best_parent_null_rules_per_testable_property_5() {
        let config = BrplConfig::default();
        let reference = StubReference { metrics: Default::default() };
        let oracle = AlwaysTrustOracle;
        let log = NullLogSink;
        let objective = BrplObjective::new(config.clone(), &reference, &oracle, &log);
        let mut dag = DagState::new(DagId(0), &config);
        let clock = FixedClock(1);
        let neighbors = NoNeighbors;
        let parents = TwoParents(Vec::new());
        let queue = QueueMeter::new(10);

        let p1 = ParentSnapshot { id: NodeId(1), rank: Rank(256), brpl_queue: None };
        let t1 = ParentTrustState::new(&config);

        assert_eq!(
            objective.best_parent(&mut dag, &clock, &neighbors, &parents, &queue, NodeId(0), None, None),
            None
        );
        assert_eq!(
            objective.best_parent(&mut dag, &clock, &neighbors, &parents, &queue, NodeId(0), Some((&p1, &t1)), None),
            Some(NodeId(1))
        );
        assert_eq!(
            objective.best_parent(&mut dag, &clock, &neighbors, &parents, &queue, NodeId(0), None, Some((&p1, &t1))),
            Some(NodeId(1))
        );
    }

    #[test]
    fn scenario_s1_cheaper_link_wins_with_equal_trust_and_queues() {
        let config = BrplConfig::default();
        let mut metrics = std::collections::HashMap::new();
        metrics.insert(1u16, 10u16);
        metrics.insert(2u16, 20u16);
        let reference = StubReference { metrics };
        let oracle = AlwaysTrustOracle;
        let log = NullLogSink;
        let objective = BrplObjective::new(config.clone(), &reference, &oracle, &log);

        let mut dag = DagState::new(DagId(0), &config);
        dag.set_rank(Rank(256));
        let clock = FixedClock(1);
        let neighbors = NoNeighbors;

        let p1 = ParentSnapshot { id: NodeId(1), rank: Rank(256), brpl_queue: None };
        let p2 = ParentSnapshot { id: NodeId(2), rank: Rank(256), brpl_queue: None };
        let parents = TwoParents(vec![p1, p2]);
        let queue = QueueMeter::new(10);

        let t1 = ParentTrustState::new(&config);
        let t2 = ParentTrustState::new(&config);

        let best = objective.best_parent(
            &mut dag, &clock, &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1)), Some((&p2, &t2)),
        );
        assert_eq!(best, Some(NodeId(1)));
    }

    #[test]
    fn trust_penalty_protects_a_parent_that_would_otherwise_win_on_queue_pressure() {
        // Both candidates advertise more headroom than we have (both base
        // weights negative, i.e. both look attractive), P1 more so than P2.
        // The penalty formula only ever shrinks a weight's magnitude toward
        // zero, never flips its sign (see DESIGN.md's note on the S2 worked
        // example), so demonstrating its protective effect against a
        // congested-but-plausible sinkhole needs two negative base weights:
        // distrust pulls P1's weight up toward zero until P2 — untouched —
        // becomes the lower (better) one.
        let mut config = BrplConfig::default();
        config.queue_ewma_alpha = config.scale as u16;
        config.trust_lambda_penalty = 1000;
        config.trust_penalty_gamma = 1;
        let mut metrics = std::collections::HashMap::new();
        metrics.insert(1u16, 10u16);
        metrics.insert(2u16, 10u16);
        let reference = StubReference { metrics };
        let oracle = AlwaysTrustOracle;
        let log = NullLogSink;
        let objective = BrplObjective::new(config.clone(), &reference, &oracle, &log);

        let mut dag = DagState::new(DagId(0), &config);
        dag.set_rank(Rank(256));
        let neighbors = NoNeighbors;

        let p1 = ParentSnapshot {
            id: NodeId(1),
            rank: Rank(256),
            brpl_queue: Some(BrplQueueAdvert { queue: 0, queue_max: 10 }),
        };
        let p2 = ParentSnapshot {
            id: NodeId(2),
            rank: Rank(256),
            brpl_queue: Some(BrplQueueAdvert { queue: 3, queue_max: 10 }),
        };
        let parents = TwoParents(vec![p1, p2]);
        let queue = QueueMeter::new(10);
        for _ in 0..9 {
            queue.on_enqueue();
        }

        let t1_full = ParentTrustState::new(&config);
        let t2_full = ParentTrustState::new(&config);
        // Prime past the first churn window so theta reflects queue pressure.
        objective.best_parent(
            &mut dag, &FixedClock(1), &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1_full)), Some((&p2, &t2_full)),
        );
        let advance = FixedClock(1 + config.beta_window_seconds);

        let best_full_trust = objective.best_parent(
            &mut dag, &advance, &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1_full)), Some((&p2, &t2_full)),
        );
        assert_eq!(best_full_trust, Some(NodeId(1)), "fully trusted, more-headroom P1 should win");

        let mut t1_distrusted = ParentTrustState::new(&config);
        t1_distrusted.trust_total = 300;
        let best_distrusted = objective.best_parent(
            &mut dag, &advance, &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1_distrusted)), Some((&p2, &t2_full)),
        );
        assert_eq!(best_distrusted, Some(NodeId(2)), "distrust should erode P1's advantage enough to lose to P2");
    }

    #[test]
    fn scenario_s3_queue_pressure_outweighs_small_path_cost_gap() {
        // theta only de-emphasizes path cost once beta/rho have had a
        // chance to reflect reality (a brand new DAG always starts at
        // theta=scale as its reset default), so this scenario needs state
        // that has survived at least one churn window.
        let mut config = BrplConfig::default();
        config.queue_ewma_alpha = config.scale as u16; // immediate responsiveness
        let mut metrics = std::collections::HashMap::new();
        metrics.insert(1u16, 10u16);
        metrics.insert(2u16, 20u16);
        let reference = StubReference { metrics };
        let oracle = AlwaysTrustOracle;
        let log = NullLogSink;
        let objective = BrplObjective::new(config.clone(), &reference, &oracle, &log);

        let mut dag = DagState::new(DagId(0), &config);
        dag.set_rank(Rank(256));
        let neighbors = NoNeighbors;

        let p1 = ParentSnapshot {
            id: NodeId(1),
            rank: Rank(256),
            brpl_queue: Some(BrplQueueAdvert { queue: 9, queue_max: 10 }),
        };
        let p2 = ParentSnapshot {
            id: NodeId(2),
            rank: Rank(256),
            brpl_queue: Some(BrplQueueAdvert { queue: 1, queue_max: 10 }),
        };
        let parents = TwoParents(vec![p1, p2]);
        let queue = QueueMeter::new(10);
        for _ in 0..8 {
            queue.on_enqueue();
        }

        let t1 = ParentTrustState::new(&config);
        let t2 = ParentTrustState::new(&config);

        // Priming call: establishes the first churn snapshot at theta=scale.
        objective.best_parent(
            &mut dag, &FixedClock(1), &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1)), Some((&p2, &t2)),
        );
        // Second call, one full window later: beta settles to 0 (no
        // neighbor change) and theta now tracks queue pressure.
        let best = objective.best_parent(
            &mut dag, &FixedClock(1 + config.beta_window_seconds), &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1)), Some((&p2, &t2)),
        );
        assert_eq!(best, Some(NodeId(2)));
    }

    #[test]
    fn unavailable_reference_objective_degrades_to_first_candidate() {
        let config = BrplConfig::default();
        let reference = NoOpReferenceObjective;
        let oracle = AlwaysTrustOracle;
        let log = NullLogSink;
        let objective = BrplObjective::new(config.clone(), &reference, &oracle, &log);
        let mut dag = DagState::new(DagId(0), &config);
        let clock = FixedClock(1);
        let neighbors = NoNeighbors;
        let parents = TwoParents(Vec::new());
        let queue = QueueMeter::new(10);

        let p1 = ParentSnapshot { id: NodeId(9), rank: Rank(256), brpl_queue: None };
        let p2 = ParentSnapshot { id: NodeId(10), rank: Rank(1), brpl_queue: None };
        let t1 = ParentTrustState::new(&config);
        let t2 = ParentTrustState::new(&config);

        let best = objective.best_parent(
            &mut dag, &clock, &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1)), Some((&p2, &t2)),
        );
        assert_eq!(best, Some(NodeId(9)));
    }

    #[test]
    fn candidate_with_no_resolvable_link_local_still_scores_without_panicking() {
        // spec.md §7's Missing-dependency degradation: a parent the host
        // couldn't resolve a link-local identifier for is represented with
        // the sentinel `NodeId::UNKNOWN` rather than refusing to compare it.
        let mut metrics = std::collections::HashMap::new();
        metrics.insert(NodeId::UNKNOWN.0, 15u16);
        metrics.insert(2u16, 10u16);
        let config = BrplConfig::default();
        let reference = StubReference { metrics };
        let oracle = AlwaysTrustOracle;
        let log = NullLogSink;
        let objective = BrplObjective::new(config.clone(), &reference, &oracle, &log);
        let mut dag = DagState::new(DagId(0), &config);
        dag.set_rank(Rank(256));
        let clock = FixedClock(1);
        let neighbors = NoNeighbors;

        let p1 = ParentSnapshot { id: NodeId::UNKNOWN, rank: Rank(256), brpl_queue: None };
        let p2 = ParentSnapshot { id: NodeId(2), rank: Rank(256), brpl_queue: None };
        assert!(!p1.id.is_known());
        assert!(p2.id.is_known());
        let parents = TwoParents(vec![p1, p2]);
        let queue = QueueMeter::new(10);
        let t1 = ParentTrustState::new(&config);
        let t2 = ParentTrustState::new(&config);

        let best = objective.best_parent(
            &mut dag, &clock, &neighbors, &parents, &queue, NodeId(0),
            Some((&p1, &t1)), Some((&p2, &t2)),
        );
        assert_eq!(best, Some(NodeId(2)), "cheaper-link candidate still wins even though the other carries the unknown-link-local sentinel");
    }
}
