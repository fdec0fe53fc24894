use serde::Deserialize;

use crate::error::BrplError;

/// Default fixed-point scale (`S` in the ratio/coefficient formulas). All
/// shipped deployments use 1000; the field stays configurable because the
/// arithmetic is generic over it, not because changing it is expected.
pub const DEFAULT_SCALE: u32 = 1000;

/// Upper bound on neighbors retained for churn sampling (C2) per DAG. A
/// compile-time bound rather than a config field: it sizes a fixed buffer,
/// it doesn't tune behavior.
pub const MAX_NEIGHBORS: usize = 32;

/// Tunable coefficients for the BRPL objective.
///
/// Every ratio/coefficient field is an integer scaled by [`BrplConfig::scale`]
/// (default 1000), never a float — the core runs on constrained nodes where
/// float arithmetic may be unavailable or undesirably slow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrplConfig {
    /// Fixed-point scale `S`. Default 1000.
    pub scale: u32,
    /// EWMA smoothing weight for the queue-load average (0..=scale).
    pub queue_ewma_alpha: u16,
    /// Re-sampling period for neighbor-set churn (C2), in seconds.
    pub beta_window_seconds: u64,
    /// Trust floor `TRUST_MIN`; combined trust never reports below this.
    pub trust_min: u16,
    /// Trust-penalty exponent, 1 or 2.
    pub trust_penalty_gamma: u8,
    /// Trust-penalty strength `λ`, scaled by `scale`.
    pub trust_lambda_penalty: u32,
    /// Weight given to gray-hole trust versus the advertisement/stability
    /// pair in the final combination (0..=scale).
    pub trust_alpha: u16,
    /// EWMA smoothing weight applied to each raw trust sub-score before
    /// combination (0..=scale).
    pub trust_beta: u16,
    /// Rank-anomaly tolerance subtracted before the advertisement-trust
    /// penalty engages.
    pub tau_rank: i32,
    /// Rank-drift tolerance subtracted before the stability-trust penalty
    /// engages.
    pub kappa_rank: i32,
    /// Penalty strength for advertisement-trust anomalies, scaled by 1000.
    pub lambda_sh_adv: u32,
    /// Penalty strength for stability-trust anomalies, scaled by 1000.
    pub lambda_sh_stab: u32,
    /// Minimum observation window, in seconds, before stability trust is
    /// recomputed for a parent (warm-up gate).
    pub stability_window_seconds: u64,
    /// `MinHopRankIncrease` — the expected per-hop rank cost used by the
    /// advertisement-trust check.
    pub min_hop_rank_increase: u16,
    /// Emit one verbose CSV-style log line per this many evaluations.
    /// 1 logs every record.
    pub log_sample_rate: u32,
    /// Informational twin of `trust_lambda_penalty`: echoed into
    /// `BRPL_TRUST` log lines for operator correlation but never read by
    /// any formula. See the open question on `TRUST_LAMBDA` naming.
    pub trust_lambda_log_hint: u32,
}

impl Default for BrplConfig {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            queue_ewma_alpha: 100,
            beta_window_seconds: 60,
            trust_min: 300,
            trust_penalty_gamma: 1,
            trust_lambda_penalty: 1000,
            trust_alpha: 500,
            trust_beta: 500,
            tau_rank: 64,
            kappa_rank: 0,
            lambda_sh_adv: 1000,
            lambda_sh_stab: 1000,
            stability_window_seconds: 60,
            min_hop_rank_increase: 256,
            log_sample_rate: 1,
            trust_lambda_log_hint: 0,
        }
    }
}

impl BrplConfig {
    /// Checks the invariants the rest of the crate assumes hold: a config
    /// that fails this must never reach `DagState`/`TrustEngine`/scoring.
    pub fn validate(&self) -> Result<(), BrplError> {
        if self.scale == 0 {
            return Err(BrplError::InvalidScale(self.scale));
        }
        if self.trust_min as u32 > self.scale {
            return Err(BrplError::TrustFloorExceedsScale {
                trust_min: self.trust_min,
                scale: self.scale,
            });
        }
        if self.trust_penalty_gamma != 1 && self.trust_penalty_gamma != 2 {
            return Err(BrplError::InvalidPenaltyGamma(self.trust_penalty_gamma));
        }
        if self.queue_ewma_alpha == 0 || self.queue_ewma_alpha as u32 > self.scale {
            return Err(BrplError::InvalidQueueAlpha {
                alpha: self.queue_ewma_alpha,
                scale: self.scale,
            });
        }
        if self.stability_window_seconds == 0 {
            return Err(BrplError::InvalidStabilityWindow);
        }
        Ok(())
    }

    /// Parses a TOML document into a config, applying it as a sparse
    /// override over [`BrplConfig::default`], then validates the result.
    pub fn from_toml_str(text: &str) -> Result<Self, BrplError> {
        let input: BrplConfigInput = toml::from_str(text)?;
        let config = input.into_config();
        config.validate()?;
        Ok(config)
    }
}

/// Sparse, `Option`-everything mirror of [`BrplConfig`] for TOML loading —
/// every field absent from the document keeps the shipped default rather
/// than forcing operators to restate the whole table.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BrplConfigInput {
    pub scale: Option<u32>,
    pub queue_ewma_alpha: Option<u16>,
    pub beta_window_seconds: Option<u64>,
    pub trust_min: Option<u16>,
    pub trust_penalty_gamma: Option<u8>,
    pub trust_lambda_penalty: Option<u32>,
    pub trust_alpha: Option<u16>,
    pub trust_beta: Option<u16>,
    pub tau_rank: Option<i32>,
    pub kappa_rank: Option<i32>,
    pub lambda_sh_adv: Option<u32>,
    pub lambda_sh_stab: Option<u32>,
    pub stability_window_seconds: Option<u64>,
    pub min_hop_rank_increase: Option<u16>,
    pub log_sample_rate: Option<u32>,
    pub trust_lambda_log_hint: Option<u32>,
}

impl BrplConfigInput {
    fn into_config(self) -> BrplConfig {
        let defaults = BrplConfig::default();
        BrplConfig {
            scale: self.scale.unwrap_or(defaults.scale),
            queue_ewma_alpha: self.queue_ewma_alpha.unwrap_or(defaults.queue_ewma_alpha),
            beta_window_seconds: self
                .beta_window_seconds
                .unwrap_or(defaults.beta_window_seconds),
            trust_min: self.trust_min.unwrap_or(defaults.trust_min),
            trust_penalty_gamma: self
                .trust_penalty_gamma
                .unwrap_or(defaults.trust_penalty_gamma),
            trust_lambda_penalty: self
                .trust_lambda_penalty
                .unwrap_or(defaults.trust_lambda_penalty),
            trust_alpha: self.trust_alpha.unwrap_or(defaults.trust_alpha),
            trust_beta: self.trust_beta.unwrap_or(defaults.trust_beta),
            tau_rank: self.tau_rank.unwrap_or(defaults.tau_rank),
            kappa_rank: self.kappa_rank.unwrap_or(defaults.kappa_rank),
            lambda_sh_adv: self.lambda_sh_adv.unwrap_or(defaults.lambda_sh_adv),
            lambda_sh_stab: self.lambda_sh_stab.unwrap_or(defaults.lambda_sh_stab),
            stability_window_seconds: self
                .stability_window_seconds
                .unwrap_or(defaults.stability_window_seconds),
            min_hop_rank_increase: self
                .min_hop_rank_increase
                .unwrap_or(defaults.min_hop_rank_increase),
            log_sample_rate: self.log_sample_rate.unwrap_or(defaults.log_sample_rate),
            trust_lambda_log_hint: self
                .trust_lambda_log_hint
                .unwrap_or(defaults.trust_lambda_log_hint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(BrplConfig::default().validate().is_ok());
    }

    #[test]
    fn sparse_override_keeps_other_defaults() {
        let config = BrplConfig::from_toml_str("trust_min = 400\n").unwrap();
        assert_eq!(config.trust_min, 400);
        assert_eq!(config.scale, DEFAULT_SCALE);
        assert_eq!(config.trust_penalty_gamma, 1);
    }

    #[test]
    fn rejects_trust_floor_above_scale() {
        let mut config = BrplConfig::default();
        config.trust_min = 2000;
        assert!(matches!(
            config.validate(),
            Err(BrplError::TrustFloorExceedsScale { .. })
        ));
    }

    #[test]
    fn rejects_bad_gamma() {
        let mut config = BrplConfig::default();
        config.trust_penalty_gamma = 3;
        assert!(matches!(
            config.validate(),
            Err(BrplError::InvalidPenaltyGamma(3))
        ));
    }

    #[test]
    fn rejects_zero_scale() {
        let mut config = BrplConfig::default();
        config.scale = 0;
        assert!(matches!(config.validate(), Err(BrplError::InvalidScale(0))));
    }
}
