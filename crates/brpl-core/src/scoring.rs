//! Parent-scoring function (C5): converts DAG state (C3) and a candidate's
//! trust (C4) into the scalar weight the comparator (C6) ranks on. Lower is
//! better. Grounded in `rpl-brpl.c`'s `brpl_neighbor_queue`,
//! `brpl_weight_base`, and `brpl_apply_trust_penalty`.

use crate::config::BrplConfig;
use crate::contracts::{ParentSnapshot, ReferenceObjective};
use crate::dag::DagState;
use crate::fixedpoint::scale_ratio;
use crate::ids::{NodeId, Rank};
use crate::logging::LogSink;
use crate::queue::QueueMeter;

/// Estimates the candidate parent's own queue occupancy: uses its
/// self-advertised value if present and sane, else assumes deeper nodes in
/// the DAG (higher rank) carry proportionally more load than we do.
fn neighbor_queue_estimate(parent: &ParentSnapshot, self_rank: Rank, q: u16, q_max: u16) -> u16 {
    if let Some(advert) = parent.brpl_queue {
        if advert.queue_max > 0 {
            return advert.queue;
        }
    }
    if self_rank.0 == 0 {
        return q;
    }
    let est = (q as u64 * parent.rank.0 as u64) / self_rank.0 as u64;
    est.min(q_max as u64) as u16
}

/// Base weight for one candidate parent on `dag`, before the trust penalty.
/// Callers must have already called [`DagState::refresh`] for this
/// evaluation — this function only reads `theta`/`p_max`, it never
/// refreshes them itself, so the refresh cost is paid at most once per
/// `best_parent` call regardless of how many candidates it scores.
#[allow(clippy::too_many_arguments)]
pub fn base_weight(
    dag: &DagState,
    self_rank: Rank,
    queue: &QueueMeter,
    reference: &dyn ReferenceObjective,
    parent: &ParentSnapshot,
    config: &BrplConfig,
    log: &dyn LogSink,
    self_id: NodeId,
) -> i64 {
    let q = queue.length();
    let q_max = queue.capacity();
    let scale = config.scale as i64;

    let q_neighbor = neighbor_queue_estimate(parent, self_rank, q, q_max);
    let delta_q = q as i64 - q_neighbor as i64;

    let link_metric = reference.parent_link_metric(parent.id) as u64;
    let p_tilde = link_metric + parent.rank.0 as u64;
    let p_norm = scale_ratio(p_tilde, dag.p_max() as u64, config.scale);

    let dq_norm = if q_max > 0 {
        (delta_q * scale) / q_max as i64
    } else {
        0
    };

    let theta = dag.theta() as i64;
    let weight = (theta * p_norm as i64 - (scale - theta) * dq_norm) / scale;

    log.weight(self_id, parent.id, q, q_neighbor, q_max, p_tilde, p_norm, dq_norm, dag.theta(), weight);
    weight
}

/// Applies the trust penalty to a base weight. A parent at full trust
/// passes through unchanged; a parent at the trust floor has its weight
/// inflated (made less attractive), scaled by `trust_penalty_gamma` and
/// `trust_lambda_penalty`. Falls back to the unpenalized weight if the
/// denominator is non-positive, so a degenerate configuration never produces
/// undefined behavior — it just falls back to the unpenalized weight.
pub fn apply_trust_penalty(weight: i64, trust_total: u16, config: &BrplConfig) -> i64 {
    let scale = config.scale as i64;
    let trust = trust_total.max(config.trust_min) as i64;
    let distrust = scale - trust;
    let lambda = config.trust_lambda_penalty as i64;

    let (num, den) = if config.trust_penalty_gamma == 2 {
        let num = trust * trust;
        let distrust_sq = distrust * distrust;
        let den = scale * scale + (lambda * distrust_sq) / scale;
        (num, den)
    } else {
        let num = trust;
        let den = scale + (lambda * distrust) / scale;
        (num, den)
    };

    if den <= 0 {
        return weight;
    }
    (weight * num) / den
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::{BrplQueueAdvert, NoOpReferenceObjective};
    use crate::ids::DagId;
    use crate::logging::NullLogSink;

    struct StubReference {
        link_metric: u16,
    }
    impl ReferenceObjective for StubReference {
        fn parent_link_metric(&self, _parent: NodeId) -> u16 {
            self.link_metric
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

    struct FixedClock(u64);
    impl crate::contracts::Clock for FixedClock {
        fn now_ticks(&self) -> u64 {
            self.0
        }
        fn now_seconds(&self) -> u64 {
            self.0
        }
    }

    struct FixedNeighbors;
    impl crate::contracts::NeighborTable for FixedNeighbors {
        fn neighbors(&self) -> Vec<NodeId> {
            Vec::new()
        }
    }

    #[test]
    fn scenario_s1_lower_link_metric_wins_when_queues_match() {
        // P1(link=10, rank=256), P2(link=20, rank=256), qmax=10, q=0.
        let config = BrplConfig::default();
        let queue = QueueMeter::new(10);
        let mut dag = DagState::new(DagId(0), &config);

        let ref1 = StubReference { link_metric: 10 };
        let ref2 = StubReference { link_metric: 20 };
        let p1 = ParentSnapshot { id: NodeId(1), rank: Rank(256), brpl_queue: None };
        let p2 = ParentSnapshot { id: NodeId(2), rank: Rank(256), brpl_queue: None };

        // p_max must reflect both candidates for a fair comparison: the
        // larger of the two p_tildes (20+256=276), as a real refresh would
        // compute by scanning the whole candidate set.
        dag.refresh(&config, &queue, &FixedClock(1), &FixedNeighbors, &[266, 276], &NullLogSink, NodeId(0));

        let w1 = base_weight(&dag, Rank(256), &queue, &ref1, &p1, &config, &NullLogSink, NodeId(0));
        let w2 = base_weight(&dag, Rank(256), &queue, &ref2, &p2, &config, &NullLogSink, NodeId(0));
        assert!(w1 < w2, "lower link metric should score lower (better): {w1} vs {w2}");
    }

    #[test]
    fn trust_penalty_is_identity_at_full_trust() {
        let config = BrplConfig::default();
        let w = apply_trust_penalty(500, config.scale as u16, &config);
        assert_eq!(w, 500);
    }

    #[test]
    fn trust_penalty_shrinks_positive_weight_toward_zero_for_low_trust() {
        // The literal source formula (W' = W*T/(S+(lambda*D)/S)) always
        // multiplies by a fraction <= 1, so for a *positive* base weight
        // low trust pulls it toward zero rather than inflating it — see
        // DESIGN.md's note on the scenario S2 worked example.
        let mut config = BrplConfig::default();
        config.trust_lambda_penalty = 1000;
        config.trust_penalty_gamma = 1;
        let base = 100i64;
        let w1 = apply_trust_penalty(base, 300, &config);
        let w2 = apply_trust_penalty(base, 1000, &config);
        assert_eq!(w2, base); // full trust: unchanged
        assert!(w1 < w2, "low trust shrinks a positive weight toward zero");
    }

    #[test]
    fn trust_penalty_makes_a_negative_weight_less_attractive_for_low_trust() {
        // This is the formula's intended protective effect: when a parent
        // would otherwise look attractive (negative weight, e.g. it has
        // much more queue headroom than us), low trust pulls that weight
        // back toward zero, i.e. makes it *less* preferred.
        let mut config = BrplConfig::default();
        config.trust_lambda_penalty = 1000;
        config.trust_penalty_gamma = 1;
        let base = -400i64;
        let w_low_trust = apply_trust_penalty(base, 300, &config);
        let w_full_trust = apply_trust_penalty(base, 1000, &config);
        assert_eq!(w_full_trust, base);
        assert!(
            w_low_trust > w_full_trust,
            "low trust should move a negative weight toward zero (worse): {w_low_trust} vs {w_full_trust}"
        );
    }

    #[test]
    fn no_op_reference_objective_is_degraded_but_bounded() {
        let config = BrplConfig::default();
        let queue = QueueMeter::new(0);
        let dag = DagState::new(DagId(0), &config);
        let reference = NoOpReferenceObjective;
        let parent = ParentSnapshot { id: NodeId(5), rank: Rank::INFINITE, brpl_queue: None };
        let w = base_weight(&dag, Rank(0), &queue, &reference, &parent, &config, &NullLogSink, NodeId(0));
        assert!(w.abs() < i64::MAX);
    }

    #[test]
    fn neighbor_queue_prefers_advertised_value() {
        let parent = ParentSnapshot {
            id: NodeId(1),
            rank: Rank(100),
            brpl_queue: Some(BrplQueueAdvert { queue: 7, queue_max: 10 }),
        };
        assert_eq!(neighbor_queue_estimate(&parent, Rank(50), 3, 10), 7);
    }

    #[test]
    fn neighbor_queue_estimates_from_rank_ratio_when_not_advertised() {
        let parent = ParentSnapshot { id: NodeId(1), rank: Rank(200), brpl_queue: None };
        // q=8, self_rank=100, parent_rank=200 -> est = 8*200/100 = 16, capped at qmax=10
        assert_eq!(neighbor_queue_estimate(&parent, Rank(100), 8, 10), 10);
    }
}
