#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting enemy spawn commands.
//!
//! A wave is started explicitly, spawns its quota of enemies one interval
//! apart and is cleared once every spawned enemy has left the world.

use std::time::Duration;

use elemental_defence_core::{Command, EnemyKind, Event, PathId, WaveError};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const DEFAULT_RNG_SEED: u64 = 0x5eed_0f3a_7ec0_de11;
const MAX_WAVE_SIZE_FACTOR: u32 = 6;
const BASE_SPAWN_INTERVAL: Duration = Duration::from_millis(1600);
const SPAWN_INTERVAL_STEP: Duration = Duration::from_millis(100);
const MIN_SPAWN_INTERVAL: Duration = Duration::from_millis(300);

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Debug)]
pub struct Config {
    rng_seed: u64,
    enemy_kinds: Vec<EnemyKind>,
}

impl Config {
    /// Creates a configuration drawing enemies uniformly from `enemy_kinds`.
    #[must_use]
    pub fn new(rng_seed: u64, enemy_kinds: Vec<EnemyKind>) -> Self {
        Self {
            rng_seed,
            enemy_kinds,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_RNG_SEED, EnemyKind::ALL.to_vec())
    }
}

/// Parameters of a wave that has just started.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WavePlan {
    /// Number of the wave.
    pub wave: u32,
    /// Enemies the wave will spawn.
    pub enemies: u32,
    /// Delay between consecutive spawns.
    pub interval: Duration,
}

/// Number of enemies spawned by the provided wave.
#[must_use]
pub fn required_enemies(wave: u32) -> u32 {
    let size = wave.saturating_add(1).min(MAX_WAVE_SIZE_FACTOR);
    (size + 3) * size.saturating_sub(1)
}

/// Delay between spawns for the provided wave.
#[must_use]
pub fn spawn_interval(wave: u32) -> Duration {
    BASE_SPAWN_INTERVAL
        .saturating_sub(SPAWN_INTERVAL_STEP.saturating_mul(wave.saturating_sub(1)))
        .max(MIN_SPAWN_INTERVAL)
}

/// Wave state machine that emits spawn commands as simulated time passes.
#[derive(Debug)]
pub struct WaveScheduler {
    wave: u32,
    in_progress: bool,
    required: u32,
    spawned: u32,
    accumulator: Duration,
    rng: ChaCha8Rng,
    enemy_kinds: Vec<EnemyKind>,
}

impl WaveScheduler {
    /// Creates a scheduler positioned before the first wave.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            wave: 1,
            in_progress: false,
            required: 0,
            spawned: 0,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            enemy_kinds: config.enemy_kinds,
        }
    }

    /// Number of the current wave, or the next one when idle.
    #[must_use]
    pub fn wave(&self) -> u32 {
        self.wave
    }

    /// Reports whether a wave is running.
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Enemies the running wave spawns in total.
    #[must_use]
    pub fn required(&self) -> u32 {
        self.required
    }

    /// Enemies spawned so far by the running wave.
    #[must_use]
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    /// Starts the next wave.
    ///
    /// Fails without touching any counter while a wave is already running.
    pub fn start_wave(&mut self) -> Result<WavePlan, WaveError> {
        if self.in_progress {
            return Err(WaveError::AlreadyInProgress);
        }

        self.in_progress = true;
        self.required = required_enemies(self.wave);
        self.spawned = 0;
        self.accumulator = Duration::ZERO;

        let plan = WavePlan {
            wave: self.wave,
            enemies: self.required,
            interval: spawn_interval(self.wave),
        };
        info!(
            "starting wave {} with {} enemies every {:?}",
            plan.wave, plan.enemies, plan.interval
        );
        Ok(plan)
    }

    /// Consumes world events and emits the spawns that became due.
    ///
    /// Each spawn draws its kind and its path uniformly at random.
    pub fn handle(&mut self, events: &[Event], path_count: usize, out: &mut Vec<Command>) {
        if !self.in_progress || self.spawned >= self.required {
            return;
        }
        if path_count == 0 || self.enemy_kinds.is_empty() {
            return;
        }

        let accumulated = events
            .iter()
            .filter_map(|event| match event {
                Event::TimeAdvanced { dt, .. } => Some(*dt),
                _ => None,
            })
            .fold(Duration::ZERO, Duration::saturating_add);
        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let interval = spawn_interval(self.wave);
        while self.accumulator >= interval && self.spawned < self.required {
            self.accumulator -= interval;
            self.spawned += 1;

            let kind = self.enemy_kinds[self.rng.gen_range(0..self.enemy_kinds.len())];
            let path = self.rng.gen_range(0..path_count);
            let path = PathId::new(u32::try_from(path).unwrap_or(u32::MAX));
            debug!(
                "wave {} spawn {}/{}: {kind} on path {}",
                self.wave,
                self.spawned,
                self.required,
                path.get()
            );
            out.push(Command::SpawnEnemy { kind, path });
        }

        if self.spawned >= self.required {
            self.accumulator = Duration::ZERO;
            debug!("all enemies of wave {} spawned", self.wave);
        }
    }

    /// Clears the running wave once it has spawned its quota and no enemy is left.
    ///
    /// Returns the number of the cleared wave and advances to the next one.
    pub fn clear_wave(&mut self, live_enemies: usize) -> Option<u32> {
        if !self.in_progress || live_enemies > 0 || self.spawned < self.required {
            return None;
        }

        let cleared = self.wave;
        self.in_progress = false;
        self.wave = self.wave.saturating_add(1);
        info!("wave {cleared} cleared");
        Some(cleared)
    }

    /// Stops the running wave without advancing the wave counter.
    pub fn abandon(&mut self) {
        if self.in_progress {
            info!("abandoning wave {}", self.wave);
        }
        self.in_progress = false;
        self.accumulator = Duration::ZERO;
    }
}
