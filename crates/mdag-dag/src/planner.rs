//! Chunk planning: leaf count and block tree height for a file length.

use crate::config::{HeightRule, SliceConfig};

/// Shape of the block tree for one file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChunkPlan {
    /// Number of leaf blocks.
    pub leaf_count: u64,
    /// Number of internal levels above the leaves.
    pub height: u32,
}

/// Number of leaves needed for `size` bytes: `ceil(size / leaf_size)`.
///
/// `leaf_size` must be positive.
pub fn leaf_count(size: u64, leaf_size: usize) -> u64 {
    size.div_ceil(leaf_size as u64)
}

/// Height of the block tree holding `leaf_count` leaves.
///
/// Always at least 1. `fanout` must be at least 2. See [`HeightRule`] for
/// the difference at exact powers of the fanout.
pub fn height(leaf_count: u64, fanout: usize, rule: HeightRule) -> u32 {
    let fanout = fanout as u64;
    match rule {
        HeightRule::Compat => {
            let mut height = 0;
            let mut q = leaf_count;
            loop {
                height += 1;
                q /= fanout;
                if q == 0 {
                    break height;
                }
            }
        }
        HeightRule::Minimal => {
            let mut height = 1;
            let mut capacity = fanout;
            while capacity < leaf_count {
                height += 1;
                capacity = capacity.saturating_mul(fanout);
            }
            height
        }
    }
}

/// Plan the block tree for a file of `size` bytes.
pub fn plan(size: u64, config: &SliceConfig) -> ChunkPlan {
    let leaf_count = leaf_count(size, config.leaf_size);
    ChunkPlan {
        leaf_count,
        height: height(leaf_count, config.fanout, config.height_rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FANOUT, LEAF_SIZE};
    use proptest::prelude::*;

    #[test]
    fn leaf_count_rounds_up() {
        assert_eq!(leaf_count(0, LEAF_SIZE), 0);
        assert_eq!(leaf_count(1, LEAF_SIZE), 1);
        assert_eq!(leaf_count(262_144, LEAF_SIZE), 1);
        assert_eq!(leaf_count(262_145, LEAF_SIZE), 2);
        assert_eq!(leaf_count(10 * 262_144, LEAF_SIZE), 10);
    }

    #[test]
    fn compat_height_boundaries() {
        assert_eq!(height(1, FANOUT, HeightRule::Compat), 1);
        assert_eq!(height(4095, FANOUT, HeightRule::Compat), 1);
        // Exact multiple of the fanout takes an extra level.
        assert_eq!(height(4096, FANOUT, HeightRule::Compat), 2);
        assert_eq!(height(4097, FANOUT, HeightRule::Compat), 2);
        assert_eq!(height(4096 * 4096 - 1, FANOUT, HeightRule::Compat), 2);
        assert_eq!(height(4096 * 4096, FANOUT, HeightRule::Compat), 3);
    }

    #[test]
    fn minimal_height_boundaries() {
        assert_eq!(height(1, FANOUT, HeightRule::Minimal), 1);
        assert_eq!(height(4095, FANOUT, HeightRule::Minimal), 1);
        assert_eq!(height(4096, FANOUT, HeightRule::Minimal), 1);
        assert_eq!(height(4097, FANOUT, HeightRule::Minimal), 2);
        assert_eq!(height(4096 * 4096, FANOUT, HeightRule::Minimal), 2);
        assert_eq!(height(4096 * 4096 + 1, FANOUT, HeightRule::Minimal), 3);
    }

    #[test]
    fn plan_uses_config() {
        let config = SliceConfig {
            leaf_size: 4,
            fanout: 3,
            ..Default::default()
        };
        // 37 bytes -> 10 leaves -> 10/3 = 3, 3/3 = 1, 1/3 = 0 -> height 3
        assert_eq!(
            plan(37, &config),
            ChunkPlan {
                leaf_count: 10,
                height: 3
            }
        );
    }

    proptest! {
        #[test]
        fn compat_height_holds_every_leaf(leaves in 1u64..1_000_000, fanout in 2usize..64) {
            let h = height(leaves, fanout, HeightRule::Compat);
            prop_assert!((fanout as u64).pow(h) > leaves);
            prop_assert!(h == 1 || (fanout as u64).pow(h - 1) <= leaves);
        }

        #[test]
        fn minimal_height_is_tight(leaves in 1u64..1_000_000, fanout in 2usize..64) {
            let h = height(leaves, fanout, HeightRule::Minimal);
            prop_assert!((fanout as u64).pow(h) >= leaves);
            prop_assert!(h == 1 || (fanout as u64).pow(h - 1) < leaves);
            prop_assert!(h <= height(leaves, fanout, HeightRule::Compat));
        }

        #[test]
        fn leaf_count_covers_size(size in 0u64..10_000_000, leaf_size in 1usize..100_000) {
            let n = leaf_count(size, leaf_size);
            prop_assert!(n * leaf_size as u64 >= size);
            prop_assert!(n == 0 || (n - 1) * (leaf_size as u64) < size);
        }
    }
}
