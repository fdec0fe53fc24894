//! Trust engine (C4): the three per-parent sub-scores and their combination.
//!
//! Grounded in `rpl-brpl.c`'s `brpl_compute_trust_sink_adv`,
//! `brpl_compute_trust_sink_stab`, and `brpl_update_trust`. All three trust
//! formulas are the same piecewise-rational stand-in for `exp(-lambda * x)`:
//! `T = S^2 / (S + penalty)`, which is exactly 1.0 at `penalty == 0` and
//! decays toward (but never reaches) zero as the anomaly grows — cheap
//! enough for a node with no FPU.

use crate::config::BrplConfig;
use crate::contracts::TrustOracle;
use crate::ids::{NodeId, Rank};
use crate::parent::ParentTrustState;

/// `S^2 / (S + penalty)`, the shared rational decay used by both sinkhole
/// sub-scores. `penalty` is already scaled by `S`; the result is clamped to
/// `S` so a zero anomaly reports exactly full trust regardless of rounding.
fn rational_decay(penalty: u64, scale: u32) -> u16 {
    let scale = scale as u64;
    (((scale * scale) / (scale + penalty)).min(scale)) as u16
}

/// Advertisement (sinkhole-advertisement) trust: does this parent's
/// advertised rank make sense given our own rank and the protocol's minimum
/// hop-rank increase? A parent claiming an implausibly low rank (attracting
/// traffic it shouldn't) trips this.
pub fn advertisement_trust_raw(self_rank: Rank, parent_rank: Rank, config: &BrplConfig) -> u16 {
    let delta =
        parent_rank.0 as i64 + config.min_hop_rank_increase as i64 - self_rank.0 as i64;
    let anomaly = (-delta - config.tau_rank as i64).max(0) as u64;
    let penalty = (anomaly * config.lambda_sh_adv as u64) / 1000;
    rational_decay(penalty, config.scale)
}

/// Stability (sinkhole-stability) trust: after a warm-up window, is our own
/// rank still drifting upward relative to where it stood at the previous
/// check for this parent? Persistent drift suggests the parent's path is
/// degrading or the parent is manipulating rank to stay attractive.
///
/// Returns full trust unconditionally before the warm-up window has
/// elapsed since `state.last_rank_update` — including forever, if
/// `update` is never called for this parent. This mirrors the original's
/// cold-start convention of treating "no history yet" as full trust rather
/// than capping how long that grace period can last.
pub fn stability_trust_raw(
    self_rank: Rank,
    state: &ParentTrustState,
    now_seconds: u64,
    config: &BrplConfig,
) -> u16 {
    if state.last_rank_update == 0
        || now_seconds.saturating_sub(state.last_rank_update) < config.stability_window_seconds
    {
        return config.scale as u16;
    }

    let rank_increase = self_rank.0 as i64 - state.last_rank.0 as i64;
    let instability = (rank_increase - config.kappa_rank as i64).max(0) as u64;
    let penalty = (instability * config.lambda_sh_stab as u64) / 1000;
    rational_decay(penalty, config.scale)
}

/// Recomputes and EWMA-smooths all three sub-scores for one parent, then
/// recombines them into `trust_total`, clamped at `trust_min`. Also records
/// `self_rank`/`now_seconds` as the stability check's new baseline for the
/// *next* call — see [`stability_trust_raw`].
///
/// This is the implementation behind the public `update_parent_trust` hook;
/// call it whenever new rank or reliability information arrives for
/// `parent_id`, not on every scoring evaluation.
pub fn update(
    state: &mut ParentTrustState,
    self_rank: Rank,
    parent_rank: Rank,
    now_seconds: u64,
    parent_id: NodeId,
    oracle: &dyn TrustOracle,
    config: &BrplConfig,
) {
    let raw_adv = advertisement_trust_raw(self_rank, parent_rank, config);
    let raw_stab = stability_trust_raw(self_rank, state, now_seconds, config);
    let raw_gray = oracle.trust_gray_raw(parent_id, config.scale);

    let scale = config.scale;
    let beta = config.trust_beta as u32;
    state.trust_sink_adv = ewma(state.trust_sink_adv, raw_adv, beta, scale);
    state.trust_sink_stab = ewma(state.trust_sink_stab, raw_stab, beta, scale);
    state.trust_gray = ewma(state.trust_gray, raw_gray, beta, scale);

    let sink = ((state.trust_sink_adv as u32 * state.trust_sink_stab as u32) / scale) as u16;
    let alpha = config.trust_alpha as u32;
    let total = (alpha * state.trust_gray as u32 + (scale - alpha) * sink as u32) / scale;
    state.trust_total = (total as u16).max(config.trust_min);

    state.last_rank = self_rank;
    state.last_rank_update = now_seconds;
}

/// `new <- ((S - beta) * old + beta * raw) / S`, the EWMA smoothing shared by
/// all three sub-scores.
fn ewma(old: u16, raw: u16, beta: u32, scale: u32) -> u16 {
    (((scale - beta) * old as u32 + beta * raw as u32) / scale) as u16
}
