//! Seed mixing and the deterministic random streams that drive a run.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

/// Stream salt for room placement draws.
const PLACEMENT_STREAM: u64 = 1;
/// Stream salt for extra-link draws.
const LINKS_STREAM: u64 = 2;

/// Mix a run seed with a stream salt so the streams stay independent even
/// for adjacent run seeds.
pub(crate) fn derive_stream_seed(run_seed: u64, stream: u64) -> u64 {
    let mut mixed = run_seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// A seeded stream of the draw shapes generation needs. Placement and link
/// augmentation each hold their own so a change in one phase's draw count
/// cannot shift the other's sequence.
pub(crate) struct GenRng {
    inner: ChaCha8Rng,
}

impl GenRng {
    pub(crate) fn placement_stream(run_seed: u64) -> Self {
        Self::from_stream(run_seed, PLACEMENT_STREAM)
    }

    pub(crate) fn links_stream(run_seed: u64) -> Self {
        Self::from_stream(run_seed, LINKS_STREAM)
    }

    fn from_stream(run_seed: u64, stream: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(derive_stream_seed(run_seed, stream)),
        }
    }

    /// Integer from `[low, high)`. An empty range collapses to `low`.
    pub(crate) fn range_i32(&mut self, low: i32, high: i32) -> i32 {
        if high <= low {
            return low;
        }
        let span = (i64::from(high) - i64::from(low)) as u64;
        (i64::from(low) + (self.inner.next_u64() % span) as i64) as i32
    }

    /// Index into a collection of `len` elements.
    pub(crate) fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "cannot draw an index from an empty collection");
        (self.inner.next_u64() % len as u64) as usize
    }

    /// Fraction from `[low, high)`, built from 24 bits of stream output.
    pub(crate) fn fraction(&mut self, low: f32, high: f32) -> f32 {
        let unit = (self.inner.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
        low + unit * (high - low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_draws_stay_within_bounds() {
        let mut rng = GenRng::placement_stream(7);
        for _ in 0..256 {
            let value = rng.range_i32(-40, 13);
            assert!(
                (-40..13).contains(&value),
                "draw {value} escaped [-40, 13)"
            );
        }
    }

    #[test]
    fn empty_range_collapses_to_low() {
        let mut rng = GenRng::placement_stream(7);
        assert_eq!(rng.range_i32(5, 5), 5);
        assert_eq!(rng.range_i32(9, 2), 9);
    }

    #[test]
    fn fraction_draws_stay_within_bounds() {
        let mut rng = GenRng::links_stream(7);
        for _ in 0..256 {
            let value = rng.fraction(0.25, 0.75);
            assert!(
                (0.25..0.75).contains(&value),
                "draw {value} escaped [0.25, 0.75)"
            );
        }
        assert_eq!(rng.fraction(0.5, 0.5), 0.5);
    }

    #[test]
    fn index_draws_stay_within_bounds() {
        let mut rng = GenRng::links_stream(3);
        for _ in 0..256 {
            assert!(rng.index(7) < 7);
        }
    }

    #[test]
    fn stream_seed_changes_when_inputs_change() {
        let base = derive_stream_seed(1_000, 1);
        assert_ne!(base, derive_stream_seed(1_001, 1));
        assert_ne!(base, derive_stream_seed(1_000, 2));
        assert_eq!(base, derive_stream_seed(1_000, 1));
    }

    #[test]
    fn placement_and_links_streams_are_independent() {
        let mut placement = GenRng::placement_stream(99);
        let mut links = GenRng::links_stream(99);
        let placement_draws: Vec<i32> = (0..8).map(|_| placement.range_i32(0, 1_000)).collect();
        let links_draws: Vec<i32> = (0..8).map(|_| links.range_i32(0, 1_000)).collect();
        assert_ne!(
            placement_draws, links_draws,
            "streams from the same run seed should diverge"
        );
    }
}
