use core::hash::{BuildHasher, Hasher};

use foldhash::fast::{FixedState, FoldHasher};

// -----------------------------------------------------------------------------
// FixedHasher

const SEED: FixedState = FixedState::with_seed(0x5A17_C0DE_9E37_79B9);

/// `foldhash` hasher seeded with a constant.
pub type FixedHasher = FoldHasher<'static>;

/// Builds [`FixedHasher`]s, so equal keys hash equally in every process.
///
/// # Examples
///
/// ```
/// use core::hash::BuildHasher;
/// use mw_utils::hash::FixedHashState;
///
/// assert_eq!(FixedHashState.hash_one("key"), FixedHashState.hash_one("key"));
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct FixedHashState;

impl BuildHasher for FixedHashState {
    type Hasher = FixedHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        SEED.build_hasher()
    }
}

// -----------------------------------------------------------------------------
// NoOpHasher

/// Uses the last written `u64` as the hash.
///
/// Only meant for keys that already are hashes, such as `TypeId`.
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHasher(u64);

impl Hasher for NoOpHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        // Fallback for keys that do not go through `write_u64`.
        self.0 = bytes
            .iter()
            .rev()
            .fold(self.0, |acc, byte| acc.rotate_left(8).wrapping_add(u64::from(*byte)));
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
}

/// Builds [`NoOpHasher`]s.
///
/// # Examples
///
/// ```
/// use core::hash::{BuildHasher, Hash, Hasher};
/// use mw_utils::hash::NoOpHashState;
///
/// let mut hasher = NoOpHashState.build_hasher();
/// 3_u64.hash(&mut hasher);
/// assert_eq!(hasher.finish(), 3);
/// ```
#[derive(Copy, Clone, Default, Debug)]
pub struct NoOpHashState;

impl BuildHasher for NoOpHashState {
    type Hasher = NoOpHasher;

    #[inline(always)]
    fn build_hasher(&self) -> Self::Hasher {
        NoOpHasher(0)
    }
}

#[cfg(test)]
mod tests {
    use core::hash::{BuildHasher, Hash, Hasher};

    use super::{FixedHashState, NoOpHashState};

    #[test]
    fn fixed_state_is_deterministic() {
        let first = FixedHashState.hash_one(("Model", "field"));
        assert_eq!(first, FixedHashState.hash_one(("Model", "field")));
        assert_ne!(first, FixedHashState.hash_one(("Model", "other")));
    }

    #[test]
    fn byte_fallback_matches_write_u64() {
        let mut direct = NoOpHashState.build_hasher();
        direct.write_u64(1234);

        let mut bytes = NoOpHashState.build_hasher();
        1234_u32.hash(&mut bytes);

        assert_eq!(direct.finish(), bytes.finish());
    }
}
