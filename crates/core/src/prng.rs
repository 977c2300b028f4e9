//! PRNG module - seeded xorshift128+ generator
//!
//! Every random decision that a verifier must reproduce (spawn cell and spawn
//! value) is drawn from this generator with integer arithmetic only. The whole
//! stream is a function of the 64-bit seed: `s0 = seed << 1`, `s1 = seed >> 1`.

/// Two-word xorshift128+ generator.
///
/// All arithmetic wraps modulo 2^64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift128Plus {
    s0: u64,
    s1: u64,
}

impl Xorshift128Plus {
    /// Derive the generator state from a seed.
    pub fn new(seed: u64) -> Self {
        Self {
            s0: seed.wrapping_shl(1),
            s1: seed.wrapping_shr(1),
        }
    }

    /// Generate the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        let mut s1 = self.s0;
        let s0 = self.s1;
        self.s0 = s0;
        s1 ^= s1 << 23;
        s1 ^= s1 >> 17;
        s1 ^= s0 ^ (s0 >> 26);
        self.s1 = s1;
        s1.wrapping_add(s0)
    }

    /// Uniform index in `[0, len)` by integer modulo.
    ///
    /// `len` must be non-zero.
    pub fn next_index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0);
        (self.next_u64() % len as u64) as usize
    }

    /// Float in `[0, 1)`: the next value divided by `2^64 - 1`.
    ///
    /// Display-only. Verified decisions never go through floating point.
    pub fn random_unit(&mut self) -> f64 {
        let unit = self.next_u64() as f64 / u64::MAX as f64;
        // u64::MAX - small rounds to exactly 1.0 in f64
        if unit >= 1.0 {
            1.0 - f64::EPSILON / 2.0
        } else {
            unit
        }
    }

    /// Current `(s0, s1)` words.
    pub fn state(&self) -> (u64, u64) {
        (self.s0, self.s1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_derivation() {
        assert_eq!(Xorshift128Plus::new(0).state(), (0, 0));
        assert_eq!(Xorshift128Plus::new(1).state(), (2, 0));
        assert_eq!(
            Xorshift128Plus::new(u64::MAX).state(),
            (u64::MAX - 1, u64::MAX >> 1)
        );
    }

    #[test]
    fn zero_seed_golden() {
        let mut rng = Xorshift128Plus::new(0);
        assert_eq!(rng.next_u64(), 0);
        assert_eq!(rng.next_u64(), 0);
        assert_eq!(rng.state(), (0, 0));
    }

    #[test]
    fn golden_streams() {
        let mut rng = Xorshift128Plus::new(1);
        assert_eq!(rng.next_u64(), 0x0000_0000_0100_0082);
        assert_eq!(rng.next_u64(), 0x0000_0000_0200_0104);
        assert_eq!(rng.next_u64(), 0x0000_8000_0200_2082);
        assert_eq!(rng.next_u64(), 0x0000_8000_0220_2082);

        let mut rng = Xorshift128Plus::new(123456789);
        assert_eq!(rng.next_u64(), 0x0007_5bce_b9aa_d805);
        assert_eq!(rng.next_u64(), 0x000d_e90b_cffb_3885);
        assert_eq!(rng.next_u64(), 0xe761_e862_dcf9_4413);
        assert_eq!(rng.next_u64(), 0x612c_c16d_74d8_3a15);
    }

    #[test]
    fn max_seed_does_not_overflow() {
        let mut rng = Xorshift128Plus::new(u64::MAX);
        assert_eq!(rng.next_u64(), 0xffff_ffe0_00ff_ff80);
        assert_eq!(rng.next_u64(), 0x7fff_bfe0_007f_f7c2);
    }

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = Xorshift128Plus::new(12345);
        let mut rng2 = Xorshift128Plus::new(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn random_unit_in_range() {
        let mut rng = Xorshift128Plus::new(987654321);
        for _ in 0..1000 {
            let u = rng.random_unit();
            assert!((0.0..1.0).contains(&u), "out of range: {}", u);
        }
    }

    #[test]
    fn next_index_in_range() {
        let mut rng = Xorshift128Plus::new(42);
        for len in 1..=16 {
            assert!(rng.next_index(len) < len);
        }
    }
}
