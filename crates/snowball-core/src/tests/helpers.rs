//! Test helpers: tuning presets, entity placement and missile path tracing.

use fixpoint::{Fx, FxVec2};
use glam::IVec2;

use crate::arena::SlotId;
use crate::config::{GameMode, Tuning};
use crate::entity::{Bomb, Countdown, Enemy, EnemyClass, Missile, MissileKind, PlayerId, Side};
use crate::simulation::Simulation;
use crate::state::SimulationState;

// =============================================================================
// Setup
// =============================================================================

/// Installs a fmt subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Default tuning with bomb drops disabled.
#[must_use]
pub fn no_drop_tuning() -> Tuning {
    let mut tuning = Tuning::default();
    tuning.bomb.drop_chance_per_wave = 0;
    tuning
}

/// Builds a single-player simulation from a tuning known to be valid.
///
/// # Panics
///
/// Panics if the tuning fails validation.
#[must_use]
pub fn simulation_with(seed: u64, tuning: Tuning) -> Simulation {
    Simulation::with_tuning(seed, GameMode::SinglePlayer, tuning).expect("valid tuning")
}

/// Removes every enemy from both pools.
pub fn clear_enemies(state: &mut SimulationState) {
    state.enemies.clear();
    state.large_enemies.clear();
}

// =============================================================================
// Placement
// =============================================================================

/// Places an enemy with its class's starting hp.
///
/// # Panics
///
/// Panics if the pool is full.
pub fn place_enemy(
    state: &mut SimulationState,
    class: EnemyClass,
    position: FxVec2,
    velocity_x: Fx,
) -> SlotId {
    let hp = state.tuning.enemy.starting_hp(class);
    let entry = if velocity_x < Fx::ZERO {
        Side::Right
    } else {
        Side::Left
    };
    state
        .enemy_pool_mut(class)
        .allocate(Enemy {
            class,
            position,
            velocity_x,
            entry,
            hp,
            hurt: Countdown::IDLE,
        })
        .expect("enemy slot")
}

/// Places a motionless bomb.
///
/// # Panics
///
/// Panics if the pool is full.
pub fn place_bomb(state: &mut SimulationState, point: IVec2) -> SlotId {
    state
        .bombs
        .allocate(Bomb::released(FxVec2::from_pixels(point), Fx::ZERO))
        .expect("bomb slot")
}

/// Places a motionless missile owned by player one.
///
/// # Panics
///
/// Panics if the pool is full.
pub fn place_missile(state: &mut SimulationState, point: IVec2) -> SlotId {
    state
        .missiles
        .allocate(Missile {
            position: FxVec2::from_pixels(point),
            target: point,
            velocity: FxVec2::ZERO,
            owner: PlayerId::One,
            kind: MissileKind::Normal,
        })
        .expect("missile slot")
}

// =============================================================================
// Paths
// =============================================================================

/// Pixel positions of a normal missile after each of its first `ticks` ticks.
///
/// Follows the physics phase exactly: gravity first, then movement.
///
/// # Panics
///
/// Panics if `from` and `to` coincide.
#[must_use]
pub fn missile_path(tuning: &Tuning, from: IVec2, to: IVec2, ticks: usize) -> Vec<IVec2> {
    let mut position = FxVec2::from_pixels(from);
    let mut velocity = FxVec2::aim(from, to, tuning.missile.speed).expect("distinct points");
    (0..ticks)
        .map(|_| {
            velocity.y += tuning.missile.gravity;
            position += velocity;
            position.to_pixels()
        })
        .collect()
}
