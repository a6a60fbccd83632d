use serde::{Deserialize, Serialize};

/// Clamp `value` into `[min, max]`. NaN collapses to `min`.
pub fn clamp(min: f64, value: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

// Simple pseudorandom number generator using xorshift algorithm
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PseudoRandom {
    state: u64,
}

impl PseudoRandom {
    pub fn new(seed: u64) -> Self {
        // Ensure we don't start with 0 state as xorshift doesn't work with 0
        let state = if seed == 0 { 0x1234567890abcdef } else { seed };
        PseudoRandom { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        // xorshift64 algorithm
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        self.state
    }

    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Uniform value in `0..bound`. A zero bound yields 0.
    pub fn next_below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        // Multiply-shift keeps the modulo bias out of small grids
        ((self.next_u32() as u64 * bound as u64) >> 32) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_bounds() {
        assert_eq!(clamp(0.0, -3.0, 1.0), 0.0);
        assert_eq!(clamp(0.0, 0.25, 1.0), 0.25);
        assert_eq!(clamp(0.0, 7.0, 1.0), 1.0);
        assert_eq!(clamp(0.0, f64::NAN, 1.0), 0.0);
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut a = PseudoRandom::new(0);
        let mut b = PseudoRandom::new(0x1234567890abcdef);
        assert_eq!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = PseudoRandom::new(42);
        let mut b = PseudoRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn next_below_stays_in_range() {
        let mut rng = PseudoRandom::new(7);
        for bound in [1, 2, 3, 30, 50, 1000] {
            for _ in 0..500 {
                assert!(rng.next_below(bound) < bound);
            }
        }
        assert_eq!(rng.next_below(0), 0);
    }
}
