//! Physics resolver: per-tick integration of every pool.
//!
//! Order within the phase is missiles, small enemies, large enemies, bombs,
//! truck, bear, explosions. Bombs dropped by enemies this tick are integrated
//! in the same tick.

use fixpoint::FxVec2;
use rand::Rng;
use tracing::debug;

use super::blast::detonate;
use super::Resolver;
use crate::entity::{BonusKind, BonusUpdate, Bomb, EnemyClass};
use crate::events::{Attribution, DetonationCause, GameEvent};
use crate::player::TickInput;
use crate::state::SimulationState;

/// Moves everything, applies gravity and culls what left the screen.
#[derive(Debug, Default)]
pub struct PhysicsResolver;

impl PhysicsResolver {
    /// Creates a new physics resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for PhysicsResolver {
    fn name(&self) -> &'static str {
        "physics"
    }

    fn resolve(&self, state: &mut SimulationState, _input: &TickInput) {
        integrate_missiles(state);
        for class in EnemyClass::ALL {
            integrate_enemies(state, class);
        }
        integrate_bombs(state);
        update_bonus(state, BonusKind::PowerupTruck);
        update_bonus(state, BonusKind::PolarBear);
        expire_explosions(state);
    }
}

/// Gravity bias, then movement; missiles leaving the playfield are freed.
fn integrate_missiles(state: &mut SimulationState) {
    let gravity = state.tuning.missile.gravity;
    let (width, height) = (state.tuning.screen.width, state.tuning.screen.height);

    for id in state.missiles.slot_ids() {
        let Some(missile) = state.missiles.get_mut(id) else {
            continue;
        };
        missile.velocity.y += gravity;
        missile.position += missile.velocity;

        let p = missile.pixel();
        if p.x < 0 || p.x > width || p.y < 0 || p.y > height {
            state.missiles.free(id);
        }
    }
}

/// Horizontal movement, escape culling, hurt timers and bomb drops.
fn integrate_enemies(state: &mut SimulationState, class: EnemyClass) {
    let tuning = state.tuning;
    let width = tuning.screen.width;
    let half_width = tuning.enemy.half_width(class);
    let chance = tuning.bomb.drop_chance(state.wave.number);
    let resolution = tuning.bomb.drop_resolution;

    let mut escaped = 0_u32;
    let mut drops: Vec<FxVec2> = Vec::new();
    {
        let pool = match class {
            EnemyClass::Small => &mut state.enemies,
            EnemyClass::Large => &mut state.large_enemies,
        };
        let rng = &mut state.rng;

        for id in pool.slot_ids() {
            let Some(enemy) = pool.get_mut(id) else {
                continue;
            };
            enemy.position.x += enemy.velocity_x;

            if enemy.has_escaped(width) {
                pool.free(id);
                escaped += 1;
                continue;
            }

            enemy.hurt.tick();
            if enemy.is_fully_on_screen(width, half_width) && rng.gen_range(0..resolution) < chance {
                drops.push(enemy.position);
            }
        }
    }

    for _ in 0..escaped {
        state.emit(GameEvent::EnemyEscaped { class });
    }
    for position in drops {
        drop_bomb(state, position);
    }
}

fn drop_bomb(state: &mut SimulationState, position: FxVec2) {
    let bomb = Bomb::released(position, state.tuning.bomb.initial_vy);
    match state.bombs.allocate(bomb) {
        Some(slot) => state.emit(GameEvent::BombDropped {
            slot,
            position: position.to_pixels(),
        }),
        None => debug!("bomb pool full, drop skipped"),
    }
}

/// Gravity with a terminal cap, movement, ground detonation and culling.
fn integrate_bombs(state: &mut SimulationState) {
    let tuning = state.tuning;
    let ground = tuning.ground_y();
    let margin = tuning.screen.offscreen_margin;
    let (width, height) = (tuning.screen.width, tuning.screen.height);

    for id in state.bombs.slot_ids() {
        let Some(bomb) = state.bombs.get_mut(id) else {
            continue;
        };
        bomb.velocity.y = (bomb.velocity.y + tuning.bomb.gravity).min(tuning.bomb.terminal_vy);
        bomb.position += bomb.velocity;

        let p = bomb.pixel();
        if p.y >= ground {
            state.bombs.free(id);
            detonate(state, p, DetonationCause::Ground, Attribution::Ground);
        } else if p.x < -margin || p.x > width + margin || p.y < -margin || p.y > height {
            state.bombs.free(id);
        }
    }
}

fn update_bonus(state: &mut SimulationState, kind: BonusKind) {
    let tuning = state.tuning;
    match state.bonus_mut(kind).update(&tuning) {
        Some(BonusUpdate::Appeared) => state.emit(GameEvent::BonusAppeared { kind }),
        Some(BonusUpdate::Departed) => state.emit(GameEvent::BonusDeparted { kind }),
        None => {}
    }
}

fn expire_explosions(state: &mut SimulationState) {
    for id in state.explosions.slot_ids() {
        let expired = state
            .explosions
            .get_mut(id)
            .is_some_and(|explosion| explosion.lifetime.tick());
        if expired {
            state.explosions.free(id);
        }
    }
}
