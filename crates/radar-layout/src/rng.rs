//! Small reproducible PRNG threaded explicitly through a layout call.

use std::hash::{BuildHasher, Hasher};

/// xorshift64* generator. Not cryptographic; only used for jitter.
#[derive(Debug, Clone)]
pub(crate) struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub(crate) fn new(seed: u64) -> Self {
        // A zero state would stay zero forever.
        Self { state: seed.max(1) }
    }

    /// Seed drawn from process entropy, for callers that did not ask for determinism.
    pub(crate) fn entropy_seed() -> u64 {
        let mut h = std::collections::hash_map::RandomState::new().build_hasher();
        if let Ok(d) = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH) {
            h.write_u128(d.as_nanos());
        }
        h.finish()
    }

    pub(crate) fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

    /// Uniform in `[0, 1)` with 53 bits of precision.
    pub(crate) fn next_f64_unit(&mut self) -> f64 {
        let u = self.next_u64() >> 11;
        (u as f64) / ((1u64 << 53) as f64)
    }

    /// Uniform in `[lo, hi)`.
    pub(crate) fn next_f64_range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64_unit()
    }
}

#[cfg(test)]
mod tests {
    use super::XorShift64Star;

    #[test]
    fn xorshift64star_is_reproducible_for_a_seed() {
        let mut a = XorShift64Star::new(7);
        let mut b = XorShift64Star::new(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn xorshift64star_unit_values_match_known_sequence() {
        let mut rng = XorShift64Star::new(1);
        let expected = [
            0.28083505005035947,
            0.6711372530266764,
            0.7258461452833668,
        ];
        for (i, &e) in expected.iter().enumerate() {
            let v = rng.next_f64_unit();
            assert!(
                (v - e).abs() < 1e-15,
                "unexpected rng value at {i}: got {v}, expected {e}"
            );
        }
    }

    #[test]
    fn zero_seed_does_not_get_stuck() {
        let mut rng = XorShift64Star::new(0);
        assert_ne!(rng.next_u64(), 0);
    }

    #[test]
    fn range_values_stay_in_bounds() {
        let mut rng = XorShift64Star::new(99);
        for _ in 0..1000 {
            let v = rng.next_f64_range(10.0, 20.0);
            assert!((10.0..20.0).contains(&v), "{v}");
        }
    }
}
