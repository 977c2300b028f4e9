//! Session seed sources.
//!
//! The only non-deterministic input to the engine is the seed chosen when a
//! new session starts. It is injected through [`SeedSource`] so the rest of the
//! core never touches process entropy.

use rand::Rng;

/// Supplies the seed for each new session.
pub trait SeedSource {
    fn next_seed(&mut self) -> u64;
}

/// Seeds drawn from the thread-local OS-seeded RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntropySeedSource;

impl SeedSource for EntropySeedSource {
    fn next_seed(&mut self) -> u64 {
        rand::thread_rng().gen()
    }
}

/// Replays a fixed list of seeds, cycling when exhausted.
///
/// An empty list always yields `0`.
#[derive(Debug, Clone, Default)]
pub struct FixedSeedSource {
    seeds: Vec<u64>,
    cursor: usize,
}

impl FixedSeedSource {
    pub fn new(seeds: impl IntoIterator<Item = u64>) -> Self {
        Self {
            seeds: seeds.into_iter().collect(),
            cursor: 0,
        }
    }
}

impl SeedSource for FixedSeedSource {
    fn next_seed(&mut self) -> u64 {
        if self.seeds.is_empty() {
            return 0;
        }
        let seed = self.seeds[self.cursor % self.seeds.len()];
        self.cursor = self.cursor.wrapping_add(1);
        seed
    }
}
