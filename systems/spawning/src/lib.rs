#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use path_defence_core::{Command, EnemyArchetype, Event, Timestamp};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
    limit: Option<u32>,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
            limit: None,
        }
    }

    /// Caps the number of enemies spawned per level.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Pure system that emits one spawn command per elapsed interval.
///
/// Elapsed time is derived from consecutive [`Event::TimeAdvanced`]
/// timestamps, and each archetype is drawn from a seeded ChaCha stream so a
/// given seed always produces the same wave.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    rng: ChaCha8Rng,
    accumulator: Duration,
    last_seen: Timestamp,
    spawned: u32,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            accumulator: Duration::ZERO,
            last_seen: Timestamp::ZERO,
            spawned: 0,
        }
    }

    /// Number of spawn commands emitted since the level was configured.
    #[must_use]
    pub const fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Reports whether the configured limit was reached.
    #[must_use]
    pub fn exhausted(&self) -> bool {
        self.config.limit.is_some_and(|limit| self.spawned >= limit)
    }

    /// Consumes world events and emits spawn commands for elapsed intervals.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::LevelConfigured { .. } => {
                    self.accumulator = Duration::ZERO;
                    self.spawned = 0;
                }
                Event::TimeAdvanced { now } => {
                    let elapsed = now.millis_since(self.last_seen);
                    self.last_seen = *now;
                    self.accumulator = self
                        .accumulator
                        .saturating_add(Duration::from_millis(elapsed));
                }
                _ => {}
            }
        }

        if self.config.spawn_interval.is_zero() {
            return;
        }

        while self.accumulator >= self.config.spawn_interval && !self.exhausted() {
            self.accumulator -= self.config.spawn_interval;
            self.spawned += 1;
            let archetype = self.next_archetype();
            out.push(Command::SpawnEnemy { archetype });
        }
    }

    fn next_archetype(&mut self) -> EnemyArchetype {
        let index = self.rng.gen_range(0..EnemyArchetype::ALL.len());
        EnemyArchetype::ALL[index]
    }
}
