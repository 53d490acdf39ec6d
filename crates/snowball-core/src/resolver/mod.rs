//! Resolvers: the ordered phases of a simulation tick.
//!
//! Each resolver owns one phase of the tick and mutates the shared
//! [`SimulationState`] in place. The [`Simulation`](crate::simulation::Simulation)
//! runs them in a fixed order:
//!
//! 1. [`InputResolver`](crate::player::InputResolver): crosshairs, clicks, firing
//! 2. [`PhysicsResolver`]: integrate every pool, cull, drop and ground bombs
//! 3. [`CollisionResolver`]: proximity sweeps, damage, blast waves
//! 4. [`WaveResolver`](crate::wave::WaveResolver): wave completion and spawning
//! 5. [`ProgressResolver`](crate::scoring::ProgressResolver): power-up timers
//!
//! # Invariants
//!
//! - Resolvers MUST be deterministic given the same state and input
//! - Pools are walked in slot order; every random draw goes through the
//!   state's RNG in that order
//! - Exhausted pools are never an error: the spawn is skipped

pub mod blast;
mod collision;
mod physics;

pub use blast::{apply_blast_wave, detonate, knockback, BlastReport};
pub use collision::CollisionResolver;
pub use physics::PhysicsResolver;

use glam::IVec2;
use tracing::debug;

use crate::arena::SlotId;
use crate::entity::EnemyClass;
use crate::events::{Attribution, GameEvent, KillCause};
use crate::player::TickInput;
use crate::state::SimulationState;

/// One phase of the tick.
///
/// # Example
///
/// ```
/// use snowball_core::player::TickInput;
/// use snowball_core::resolver::Resolver;
/// use snowball_core::state::SimulationState;
///
/// struct TickCounter;
///
/// impl Resolver for TickCounter {
///     fn name(&self) -> &'static str {
///         "tick_counter"
///     }
///
///     fn resolve(&self, state: &mut SimulationState, _input: &TickInput) {
///         // Inspect or mutate state for this phase
///         let _ = state.tick;
///     }
/// }
/// ```
pub trait Resolver: Send + Sync {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Runs this phase against the state.
    ///
    /// # Arguments
    ///
    /// * `state` - The world, mutated in place
    /// * `input` - This tick's player input (most phases ignore it)
    fn resolve(&self, state: &mut SimulationState, input: &TickInput);
}

/// Axis-aligned proximity test: `|dx| < half.x && |dy| < half.y`.
#[must_use]
pub fn within(a: IVec2, b: IVec2, half: IVec2) -> bool {
    let d = (a - b).abs();
    d.x < half.x && d.y < half.y
}

/// Removes an enemy, spawns its explosion and credits the kill.
///
/// Direct hits earn the class's full value, blast kills half of it, and
/// ground-attributed blasts nothing. Returns `false` if the slot was already
/// empty.
pub(crate) fn destroy_enemy(
    state: &mut SimulationState,
    class: EnemyClass,
    id: SlotId,
    cause: KillCause,
    attribution: Attribution,
) -> bool {
    let Some(enemy) = state.enemy_pool_mut(class).free(id) else {
        return false;
    };
    let position = enemy.pixel();
    let full = state.tuning.scoring.kill_points(class);
    let points = match (attribution, cause) {
        (Attribution::Ground, _) => 0,
        (Attribution::Player(_), KillCause::DirectHit) => full,
        (Attribution::Player(_), KillCause::Blast) => full / 2,
    };

    debug!(?class, %id, ?cause, points, "enemy destroyed");
    state.spawn_explosion(position);
    state.emit(GameEvent::EnemyDestroyed {
        class,
        position,
        cause,
        attribution,
        points,
    });
    if let Some(player) = attribution.player() {
        state.award_points(player, points);
    }
    true
}
