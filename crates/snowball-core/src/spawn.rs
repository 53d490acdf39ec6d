//! Wave planning: how many enemies, where they enter, how fast they fly.
//!
//! Enemy counts and base speed are step functions of the wave number.
//! Placement is best-effort: each enemy gets up to
//! [`EnemyTuning::placement_attempts`](crate::config::EnemyTuning) random
//! draws to land at least `min_spacing` (Manhattan) from every enemy already
//! placed in the wave, and keeps its last draw if none succeeds. Spawning is
//! never blocked by crowding.
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use snowball_core::config::Tuning;
//! use snowball_core::entity::EnemyClass;
//! use snowball_core::spawn::plan_wave;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let plan = plan_wave(5, &Tuning::default(), &mut rng);
//! assert_eq!(plan.count(EnemyClass::Small), 4);
//! assert_eq!(plan.count(EnemyClass::Large), 1);
//! ```

use fixpoint::{manhattan, Fx, FxVec2};
use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Tuning;
use crate::entity::{Countdown, Enemy, EnemyClass, Side};
use crate::state::SimulationState;

// =============================================================================
// Difficulty Tables
// =============================================================================

/// Small enemies in `wave`.
#[must_use]
pub const fn small_enemy_count(wave: u32) -> usize {
    match wave {
        0..=3 => 3,
        4..=7 => 4,
        8..=15 => 5,
        16..=25 => 6,
        _ => 7,
    }
}

/// Large enemies in `wave`.
#[must_use]
pub const fn large_enemy_count(wave: u32) -> usize {
    match wave {
        0..=4 => 0,
        5..=14 => 1,
        15..=24 => 2,
        25..=44 => 3,
        45..=64 => 4,
        _ => 5,
    }
}

/// Horizontal speed before per-enemy variance.
#[must_use]
pub const fn base_speed(wave: u32) -> Fx {
    match wave {
        0..=9 => Fx::from_ratio(30, 100),
        10..=19 => Fx::from_ratio(35, 100),
        20..=29 => Fx::from_ratio(37, 100),
        30..=39 => Fx::from_ratio(40, 100),
        40..=49 => Fx::from_ratio(45, 100),
        _ => Fx::from_ratio(50, 100),
    }
}

// =============================================================================
// Plans
// =============================================================================

/// Where and how one enemy enters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnDescriptor {
    /// Size class.
    pub class: EnemyClass,
    /// Edge it enters from.
    pub entry: Side,
    /// Spawn point, beyond the entry edge.
    pub position: IVec2,
    /// Signed horizontal velocity, pointing into the screen.
    pub velocity_x: Fx,
}

impl SpawnDescriptor {
    /// Builds the enemy with its class's starting hp.
    #[must_use]
    pub fn into_enemy(self, tuning: &Tuning) -> Enemy {
        Enemy {
            class: self.class,
            position: FxVec2::from_pixels(self.position),
            velocity_x: self.velocity_x,
            entry: self.entry,
            hp: tuning.enemy.starting_hp(self.class),
            hurt: Countdown::IDLE,
        }
    }
}

/// Every enemy of one wave, small enemies first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WavePlan {
    /// Wave number this plan was drawn for.
    pub wave: u32,
    /// Spawns in placement order.
    pub spawns: Vec<SpawnDescriptor>,
}

impl WavePlan {
    /// Number of planned enemies of `class`.
    #[must_use]
    pub fn count(&self, class: EnemyClass) -> usize {
        self.spawns.iter().filter(|spawn| spawn.class == class).count()
    }
}

/// Draws the spawn plan for `wave`.
///
/// Counts never exceed the pool capacities. All randomness comes from `rng`,
/// in placement order: side, row and entry offset per attempt, then the speed
/// variance once the position is settled.
///
/// # Arguments
///
/// * `wave` - Wave number (1-based)
/// * `tuning` - Placement and pool settings
/// * `rng` - Deterministic random source
pub fn plan_wave<R: Rng>(wave: u32, tuning: &Tuning, rng: &mut R) -> WavePlan {
    let enemy = &tuning.enemy;
    let width = tuning.screen.width;
    let speed = base_speed(wave);
    let counts = [
        (
            EnemyClass::Small,
            small_enemy_count(wave).min(tuning.pools.enemies),
        ),
        (
            EnemyClass::Large,
            large_enemy_count(wave).min(tuning.pools.large_enemies),
        ),
    ];

    let mut spawns: Vec<SpawnDescriptor> = Vec::new();
    for (class, count) in counts {
        for _ in 0..count {
            let mut entry = Side::Left;
            let mut position = IVec2::ZERO;
            for _ in 0..enemy.placement_attempts.max(1) {
                entry = Side::from_coin(rng.gen::<bool>());
                let y = enemy.spawn_y_min + rng.gen_range(0..enemy.spawn_y_span.max(1));
                let offset = enemy.entry_offset_min + rng.gen_range(0..enemy.entry_offset_span.max(1));
                let x = match entry {
                    Side::Left => -offset,
                    Side::Right => width + offset,
                };
                position = IVec2::new(x, y);

                let clear = spawns
                    .iter()
                    .all(|other| manhattan(other.position, position) >= enemy.min_spacing);
                if clear {
                    break;
                }
            }

            let variance = enemy.speed_variance_percent;
            let percent = rng.gen_range(-variance..=variance);
            spawns.push(SpawnDescriptor {
                class,
                entry,
                position,
                velocity_x: entry.orient(speed + speed.scale_percent(percent)),
            });
        }
    }

    WavePlan { wave, spawns }
}

/// Plans the current wave and fills the enemy pools with it.
///
/// Returns the small and large enemies actually placed; a full pool skips the
/// spawn.
pub fn spawn_wave(state: &mut SimulationState) -> (u32, u32) {
    let tuning = state.tuning;
    let plan = plan_wave(state.wave.number, &tuning, &mut state.rng);

    let mut placed = (0_u32, 0_u32);
    for spawn in plan.spawns {
        let class = spawn.class;
        if state
            .enemy_pool_mut(class)
            .allocate(spawn.into_enemy(&tuning))
            .is_some()
        {
            match class {
                EnemyClass::Small => placed.0 += 1,
                EnemyClass::Large => placed.1 += 1,
            }
        }
    }
    placed
}
