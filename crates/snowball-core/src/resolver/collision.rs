//! Collision resolver: ordered proximity sweeps.
//!
//! Sweeps run in this order, each an all-pairs test against the pair's
//! half-extents from [`CollisionTuning`](crate::config::CollisionTuning):
//!
//! 1. Missile vs small enemy
//! 2. Missile vs large enemy
//! 3. Missile vs bomb
//! 4. Bomb vs igloo
//!
//! Within a sweep each outer entity takes part in at most one collision: the
//! inner scan stops at the first match.

use glam::IVec2;
use tracing::info;

use super::blast::detonate;
use super::{destroy_enemy, within, Resolver};
use crate::arena::SlotId;
use crate::entity::EnemyClass;
use crate::events::{Attribution, DetonationCause, GameEvent, KillCause};
use crate::player::TickInput;
use crate::state::SimulationState;

/// Applies missile damage, shot bombs and bomb impacts.
#[derive(Debug, Default)]
pub struct CollisionResolver;

impl CollisionResolver {
    /// Creates a new collision resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for CollisionResolver {
    fn name(&self) -> &'static str {
        "collision"
    }

    fn resolve(&self, state: &mut SimulationState, _input: &TickInput) {
        for class in EnemyClass::ALL {
            missiles_vs_enemies(state, class);
        }
        missiles_vs_bombs(state);
        bombs_vs_igloos(state);
    }
}

fn missiles_vs_enemies(state: &mut SimulationState, class: EnemyClass) {
    let half = state.tuning.collision.missile_against(class);
    let damage = state.tuning.missile.damage;
    let hurt_duration = state.tuning.enemy.hurt_duration;

    for missile_id in state.missiles.slot_ids() {
        let Some(missile) = state.missiles.get(missile_id) else {
            continue;
        };
        let (point, owner) = (missile.pixel(), missile.owner);
        let Some(enemy_id) = first_hit(
            state.enemy_pool(class).iter().map(|(id, enemy)| (id, enemy.pixel())),
            point,
            half,
        ) else {
            continue;
        };

        state.missiles.free(missile_id);
        let lethal = state
            .enemy_pool_mut(class)
            .get_mut(enemy_id)
            .is_some_and(|enemy| enemy.take_damage(damage, hurt_duration));
        if lethal {
            destroy_enemy(
                state,
                class,
                enemy_id,
                KillCause::DirectHit,
                Attribution::Player(owner),
            );
        }
    }
}

fn missiles_vs_bombs(state: &mut SimulationState) {
    let half = state.tuning.collision.missile_bomb;
    let points = state.tuning.scoring.bomb_points;

    for missile_id in state.missiles.slot_ids() {
        let Some(missile) = state.missiles.get(missile_id) else {
            continue;
        };
        let (point, owner) = (missile.pixel(), missile.owner);
        let Some(bomb_id) = first_hit(
            state.bombs.iter().map(|(id, bomb)| (id, bomb.pixel())),
            point,
            half,
        ) else {
            continue;
        };

        state.missiles.free(missile_id);
        let Some(bomb) = state.bombs.free(bomb_id) else {
            continue;
        };
        state.award_points(owner, points);
        detonate(
            state,
            bomb.pixel(),
            DetonationCause::Shot,
            Attribution::Player(owner),
        );
    }
}

fn bombs_vs_igloos(state: &mut SimulationState) {
    let half = state.tuning.collision.bomb_igloo;

    for bomb_id in state.bombs.slot_ids() {
        let Some(point) = state.bombs.get(bomb_id).map(|bomb| bomb.pixel()) else {
            continue;
        };
        let Some(index) = state
            .igloos
            .iter()
            .position(|igloo| igloo.alive && within(point, igloo.position, half))
        else {
            continue;
        };

        state.bombs.free(bomb_id);
        state.igloos[index].alive = false;
        state.spawn_explosion(point);
        info!(index, remaining = state.igloos_alive(), "igloo destroyed");
        state.emit(GameEvent::IglooDestroyed { index });
    }
}

fn first_hit(
    mut candidates: impl Iterator<Item = (SlotId, IVec2)>,
    point: IVec2,
    half: IVec2,
) -> Option<SlotId> {
    candidates
        .find(|&(_, position)| within(point, position, half))
        .map(|(id, _)| id)
}
