//! Small integer fixed-point helpers shared by the DAG-state updater and
//! the scoring function. Nothing here touches floats.

/// `round_down(num / den * scale)`, clamped to `scale`. `den == 0` reports
/// zero rather than dividing — callers own the "uncapped" semantics that
/// makes `den == 0` reachable (an uncapped queue, for instance).
pub fn scale_ratio(num: u64, den: u64, scale: u32) -> u16 {
    if den == 0 {
        return 0;
    }
    let value = (num * scale as u64) / den;
    value.min(scale as u64) as u16
}
