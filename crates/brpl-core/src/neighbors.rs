//! Neighbor-set churn sampling (C2).

use crate::fixedpoint::scale_ratio;
use crate::ids::NodeId;

/// Jaccard-style symmetric-difference ratio between two neighbor-set
/// snapshots, scaled by `scale`. `0` means identical sets (no churn),
/// `scale` means completely disjoint sets. Both snapshots are assumed
/// already deduplicated and bounded to `MAX_NEIGHBORS`; this is O(n*m)
/// over small bounded sets, matching the original's linear scan rather
/// than paying for a hash set on every window.
pub fn symmetric_diff_beta(prev: &[NodeId], curr: &[NodeId], scale: u32) -> u16 {
    if prev.is_empty() && curr.is_empty() {
        return 0;
    }

    let mut intersection = 0u32;
    for &p in prev {
        if curr.contains(&p) {
            intersection += 1;
        }
    }

    let mut union = prev.len() as u32;
    for &c in curr {
        if !prev.contains(&c) {
            union += 1;
        }
    }

    if union == 0 {
        return 0;
    }

    let diff = union - intersection;
    scale_ratio(diff as u64, union as u64, scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sets_have_zero_churn() {
        let set = [NodeId(1), NodeId(2), NodeId(3)];
        assert_eq!(symmetric_diff_beta(&set, &set, 1000), 0);
    }

    #[test]
    fn disjoint_sets_have_full_churn() {
        let prev = [NodeId(1), NodeId(2)];
        let curr = [NodeId(3), NodeId(4)];
        assert_eq!(symmetric_diff_beta(&prev, &curr, 1000), 1000);
    }

    #[test]
    fn partial_overlap_matches_jaccard_distance() {
        // {A,B,C} -> {A,B,D}: intersection=2, union=4, diff=2 -> 500/1000
        let prev = [NodeId(1), NodeId(2), NodeId(3)];
        let curr = [NodeId(1), NodeId(2), NodeId(4)];
        assert_eq!(symmetric_diff_beta(&prev, &curr, 1000), 500);
    }

    #[test]
    fn both_empty_is_zero_churn() {
        let empty: [NodeId; 0] = [];
        assert_eq!(symmetric_diff_beta(&empty, &empty, 1000), 0);
    }
}
