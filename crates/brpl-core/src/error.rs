use thiserror::Error;

/// Errors raised while loading or validating a [`crate::config::BrplConfig`].
///
/// The core never returns an error from the hot path (state refresh, scoring,
/// comparator) — a misconfigured deployment fails loud at init instead, per
/// the degrade-gracefully-at-runtime / fail-loud-at-boot split the rest of
/// the crate follows.
#[derive(Debug, Error)]
pub enum BrplError {
    #[error("fixed-point scale must be positive, got {0}")]
    InvalidScale(u32),

    #[error("trust floor {trust_min} must not exceed scale {scale}")]
    TrustFloorExceedsScale { trust_min: u16, scale: u32 },

    #[error("trust penalty gamma must be 1 or 2, got {0}")]
    InvalidPenaltyGamma(u8),

    #[error("queue EWMA alpha must be in [1, scale], got {alpha} (scale {scale})")]
    InvalidQueueAlpha { alpha: u16, scale: u32 },

    #[error("stability window must be positive")]
    InvalidStabilityWindow,

    #[error("failed to parse BRPL config: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
