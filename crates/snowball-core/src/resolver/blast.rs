//! Blast waves and chain reactions.
//!
//! A detonation at a point affects everything within the blast radius,
//! measured as Manhattan distance in pixels:
//!
//! - Bombs closer than the chain radius (but not exactly at the point) are
//!   freed and detonate in turn
//! - Other bombs inside the blast radius are knocked away with a force that
//!   falls off linearly to zero at the radius
//! - Every enemy inside the blast radius takes 1 hp of area damage
//!
//! # Termination
//!
//! Chain detonations go onto an explicit work stack. A bomb is freed before
//! its position is pushed, so no slot can enter the expansion twice and the
//! stack never holds more entries than the bomb pool has slots.

use fixpoint::{manhattan, FxVec2};
use glam::IVec2;
use tracing::debug;

use super::destroy_enemy;
use crate::config::BlastTuning;
use crate::entity::{Bomb, EnemyClass};
use crate::events::{Attribution, DetonationCause, GameEvent, KillCause};
use crate::state::SimulationState;

/// What a blast wave did, summed over its whole chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlastReport {
    /// Bombs set off by the chain reaction.
    pub chained: u32,
    /// Knockback applications to surviving bombs.
    pub pushed: u32,
    /// Area-damage hits on enemies.
    pub enemies_hit: u32,
    /// Enemies killed by area damage.
    pub enemies_destroyed: u32,
}

/// Knockback for a bomb at `offset` from a detonation.
///
/// `force = max_force × (radius − distance) / radius`, directed along the
/// offset divided by `distance`. Returns `None` outside `(0, radius)`, which
/// also guards the division.
#[must_use]
pub fn knockback(offset: IVec2, distance: i32, blast: &BlastTuning) -> Option<FxVec2> {
    if distance <= 0 || distance >= blast.blast_radius {
        return None;
    }
    let force = blast
        .max_force
        .mul_int(blast.blast_radius - distance)
        .div_int(blast.blast_radius)?;
    Some(FxVec2::new(
        force.mul_int(offset.x).div_int(distance)?,
        force.mul_int(offset.y).div_int(distance)?,
    ))
}

/// Explodes a bomb that has already been removed from its pool.
///
/// Spawns the explosion, reports the detonation and runs the blast wave.
pub fn detonate(
    state: &mut SimulationState,
    point: IVec2,
    cause: DetonationCause,
    attribution: Attribution,
) -> BlastReport {
    state.spawn_explosion(point);
    state.emit(GameEvent::BombDetonated {
        position: point,
        cause,
        attribution,
    });
    apply_blast_wave(state, point, attribution)
}

/// Runs a blast wave from `origin`, including every chain detonation.
///
/// # Arguments
///
/// * `state` - World to mutate
/// * `origin` - Detonation point in pixels
/// * `attribution` - Credited player for lethal area damage, or ground
pub fn apply_blast_wave(
    state: &mut SimulationState,
    origin: IVec2,
    attribution: Attribution,
) -> BlastReport {
    let blast = state.tuning.blast;
    let mut report = BlastReport::default();
    let mut pending = vec![origin];

    while let Some(point) = pending.pop() {
        for id in state.bombs.slot_ids() {
            let Some(bomb_point) = state.bombs.get(id).map(Bomb::pixel) else {
                continue;
            };
            let offset = bomb_point - point;
            let distance = offset.x.abs() + offset.y.abs();
            if distance == 0 || distance >= blast.blast_radius {
                continue;
            }

            if distance < blast.chain_radius {
                state.bombs.free(id);
                state.spawn_explosion(bomb_point);
                state.emit(GameEvent::BombDetonated {
                    position: bomb_point,
                    cause: DetonationCause::Chain,
                    attribution,
                });
                pending.push(bomb_point);
                report.chained += 1;
            } else if let Some(push) = knockback(offset, distance, &blast) {
                if let Some(bomb) = state.bombs.get_mut(id) {
                    bomb.velocity += push;
                    report.pushed += 1;
                }
            }
        }

        damage_enemies(state, point, attribution, &mut report);
    }

    if report.chained > 0 {
        debug!(?origin, chained = report.chained, "chain reaction");
    }
    report
}

fn damage_enemies(
    state: &mut SimulationState,
    point: IVec2,
    attribution: Attribution,
    report: &mut BlastReport,
) {
    let radius = state.tuning.blast.blast_radius;
    let hurt_duration = state.tuning.enemy.hurt_duration;

    for class in EnemyClass::ALL {
        for id in state.enemy_pool(class).slot_ids() {
            let lethal = match state.enemy_pool_mut(class).get_mut(id) {
                Some(enemy) if manhattan(enemy.pixel(), point) < radius => {
                    report.enemies_hit += 1;
                    enemy.take_damage(1, hurt_duration)
                }
                _ => continue,
            };
            if lethal && destroy_enemy(state, class, id, KillCause::Blast, attribution) {
                report.enemies_destroyed += 1;
            }
        }
    }
}
