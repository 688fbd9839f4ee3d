//! Seedable linear-congruential generator
//!
//! Every client that starts from the same seed must draw the same sequence,
//! so the arithmetic here is fixed: `state = (a * state + c) mod m` with
//! GCC's constants, evaluated in IEEE-754 double precision.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Modulus (2^31)
pub const LCG_MODULUS: u32 = 0x8000_0000;
/// Multiplier
pub const LCG_MULTIPLIER: u32 = 1_103_515_245;
/// Increment
pub const LCG_INCREMENT: u32 = 12_345;

/// Daily seeds are the day number times this factor.
pub const SEED_MULTIPLIER: u32 = 123;

/// 2023-01-01T00:00:00Z, the first puzzle day.
const PUZZLE_EPOCH_SECS: u64 = 1_672_531_200;
const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// Deterministic random number generator.
///
/// One instance per game session. All draws mutate `state`, so the order in
/// which callers consume numbers is part of the puzzle definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lcg {
    state: u32,
}

impl Lcg {
    /// Create a generator from a fixed seed.
    pub fn new(seed: u32) -> Self {
        Self {
            state: seed % LCG_MODULUS,
        }
    }

    /// Create the generator for the puzzle of the day containing `now`.
    pub fn daily(now: SystemTime) -> Self {
        Self::new(daily_seed(now))
    }

    /// Current raw state.
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance the state and return it.
    ///
    /// The product can exceed 2^53, so it is rounded to the nearest double
    /// before the remainder is taken. Clients that compute the LCG in f64
    /// produce exactly this sequence.
    pub fn next_int(&mut self) -> u32 {
        let next = (f64::from(LCG_MULTIPLIER) * f64::from(self.state) + f64::from(LCG_INCREMENT))
            % f64::from(LCG_MODULUS);
        self.state = next as u32;
        self.state
    }

    /// A float in `[0, 1]`.
    pub fn next_float(&mut self) -> f64 {
        f64::from(self.next_int()) / f64::from(LCG_MODULUS - 1)
    }

    /// An integer in `[start, end)`.
    ///
    /// Scales `next_int() / m` instead of taking a remainder: the low bits of
    /// an LCG are weak.
    pub fn next_range(&mut self, start: usize, end: usize) -> usize {
        let unit = f64::from(self.next_int()) / f64::from(LCG_MODULUS);
        let span = end.saturating_sub(start);
        start + (unit * span as f64).floor() as usize
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    pub fn choice<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(0, items.len()))
    }

    /// A single Bernoulli trial with success probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_float() < p
    }
}

/// Whole days elapsed between 2023-01-01 UTC and `now`.
///
/// Instants before the first puzzle day count as day 0.
pub fn day_number(now: SystemTime) -> u32 {
    let secs = now
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs();
    (secs.saturating_sub(PUZZLE_EPOCH_SECS) / SECS_PER_DAY) as u32
}

/// A non-deterministic seed for practice games.
pub fn random_seed() -> u32 {
    use rand::Rng;
    rand::rng().random_range(0..LCG_MODULUS - 1)
}

/// Seed shared by every player on the day containing `now`.
pub fn daily_seed(now: SystemTime) -> u32 {
    day_number(now).wrapping_mul(SEED_MULTIPLIER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn test_first_draw_matches_integer_lcg() {
        let mut rng = Lcg::new(123);
        assert_eq!(rng.next_int(), 440_917_656);
    }

    #[test]
    fn test_sequence_uses_double_precision() {
        // Exact integer arithmetic would give 1476151025 for the second draw
        let mut rng = Lcg::new(123);
        let draws: Vec<u32> = (0..5).map(|_| rng.next_int()).collect();
        assert_eq!(
            draws,
            vec![440_917_656, 1_476_151_040, 1_041_001_216, 1_977_859_840, 1_344_963_328]
        );
    }

    #[test]
    fn test_seed_one() {
        let mut rng = Lcg::new(1);
        assert_eq!(rng.next_int(), 1_103_527_590);
        assert_eq!(rng.next_int(), 377_401_600);
        assert_eq!(rng.next_int(), 333_417_792);
    }

    #[test]
    fn test_next_float_in_unit_interval() {
        let mut rng = Lcg::new(42);
        assert!((rng.next_float() - 0.582_307_589_977_191_6).abs() < 1e-12);
        for _ in 0..1000 {
            let f = rng.next_float();
            assert!((0.0..=1.0).contains(&f), "{} out of range", f);
        }
    }

    #[test]
    fn test_next_range_pinned() {
        let mut rng = Lcg::new(123);
        let draws: Vec<usize> = (0..8).map(|_| rng.next_range(0, 10)).collect();
        assert_eq!(draws, vec![2, 6, 4, 9, 6, 8, 0, 0]);
    }

    #[test]
    fn test_next_range_bounds() {
        let mut rng = Lcg::new(7);
        for _ in 0..1000 {
            let n = rng.next_range(3, 9);
            assert!((3..9).contains(&n));
        }
    }

    #[test]
    fn test_choice() {
        let mut rng = Lcg::new(5);
        let items = ['A', 'B', 'C'];
        for _ in 0..50 {
            assert!(items.contains(rng.choice(&items).unwrap()));
        }
        let empty: [char; 0] = [];
        assert_eq!(rng.choice(&empty), None);
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Lcg::new(170_601);
        let mut b = Lcg::new(170_601);
        for _ in 0..100 {
            assert_eq!(a.next_int(), b.next_int());
        }
    }

    #[test]
    fn test_day_number() {
        assert_eq!(day_number(at(PUZZLE_EPOCH_SECS)), 0);
        assert_eq!(day_number(at(PUZZLE_EPOCH_SECS + SECS_PER_DAY - 1)), 0);
        assert_eq!(day_number(at(PUZZLE_EPOCH_SECS + SECS_PER_DAY)), 1);
        // 2026-10-19T12:00:00Z
        assert_eq!(day_number(at(1_792_411_200)), 1387);
    }

    #[test]
    fn test_day_number_before_epoch_clamps() {
        assert_eq!(day_number(at(0)), 0);
    }

    #[test]
    fn test_random_seed_in_range() {
        for _ in 0..100 {
            assert!(random_seed() < LCG_MODULUS - 1);
        }
    }

    #[test]
    fn test_daily_seed() {
        assert_eq!(daily_seed(at(1_792_411_200)), 1387 * 123);
        assert_eq!(Lcg::daily(at(1_792_411_200)), Lcg::new(170_601));
    }
}
