//! Read-only views for the presentation layer.
//!
//! A [`WorldSnapshot`] copies out everything a renderer or HUD needs after a
//! tick: one [`SpriteView`] per active entity, the igloo line, and the scalar
//! progress fields. It owns its data and never borrows the simulation.

use bitflags::bitflags;
use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::arena::SlotId;
use crate::entity::{BonusKind, EnemyClass, MissileKind, PlayerId, Side};
use crate::state::SimulationState;

bitflags! {
    /// Per-sprite visual state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct VisualFlags: u8 {
        /// Large enemy flashing after damage.
        const HURT = 1 << 0;
        /// Truck whose reward has been taken.
        const COLLECTED = 1 << 1;
        /// Moving right to left.
        const FACING_LEFT = 1 << 2;
        /// Fast-shot missile.
        const FAST = 1 << 3;
    }
}

/// What a sprite depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpriteKind {
    /// Player missile.
    Missile,
    /// Small enemy.
    Enemy,
    /// Large enemy.
    LargeEnemy,
    /// Falling bomb.
    Bomb,
    /// Explosion marker.
    Explosion,
    /// Power-up truck.
    PowerupTruck,
    /// Polar bear.
    PolarBear,
}

/// One active entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteView {
    /// What to draw.
    pub kind: SpriteKind,
    /// Pool slot, stable for the entity's lifetime; `None` for bonus entities.
    pub slot: Option<SlotId>,
    /// Position in pixels.
    pub position: IVec2,
    /// Visual state.
    pub flags: VisualFlags,
}

/// One igloo along the defense line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IglooView {
    /// Position in pixels.
    pub position: IVec2,
    /// Standing or rubble.
    pub alive: bool,
}

/// Per-player HUD fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerHud {
    /// Which player.
    pub player: PlayerId,
    /// Score.
    pub score: u32,
    /// Ammo.
    pub ammo: u32,
    /// Crosshair position in pixels.
    pub crosshair: IVec2,
    /// Ticks of triple-shot left.
    pub triple_shot: u32,
    /// Ticks of fast-shot left.
    pub fast_shot: u32,
}

/// Scalar progress for the HUD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudView {
    /// Current wave number.
    pub wave: u32,
    /// Set once the game has ended.
    pub game_over: bool,
    /// Megabomb charges.
    pub megabombs: u32,
    /// Igloos still standing.
    pub igloos_alive: usize,
    /// One entry per participating player.
    pub players: Vec<PlayerHud>,
}

/// Everything visible after a tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    /// Ticks completed when the snapshot was taken.
    pub tick: u64,
    /// Active entities, grouped by pool in sweep order.
    pub sprites: Vec<SpriteView>,
    /// The igloo line, left to right.
    pub igloos: Vec<IglooView>,
    /// HUD fields.
    pub hud: HudView,
}

fn facing(side: Side) -> VisualFlags {
    match side {
        Side::Left => VisualFlags::empty(),
        Side::Right => VisualFlags::FACING_LEFT,
    }
}

impl WorldSnapshot {
    /// Copies the visible state out of `state`.
    #[must_use]
    pub fn capture(state: &SimulationState) -> Self {
        let mut sprites = Vec::new();

        for (id, missile) in state.missiles.iter() {
            let mut flags = VisualFlags::empty();
            flags.set(VisualFlags::FAST, missile.kind == MissileKind::Fast);
            sprites.push(SpriteView {
                kind: SpriteKind::Missile,
                slot: Some(id),
                position: missile.pixel(),
                flags,
            });
        }

        for class in EnemyClass::ALL {
            let kind = match class {
                EnemyClass::Small => SpriteKind::Enemy,
                EnemyClass::Large => SpriteKind::LargeEnemy,
            };
            for (id, enemy) in state.enemy_pool(class).iter() {
                let mut flags = facing(enemy.entry);
                flags.set(VisualFlags::HURT, enemy.hurt.is_running());
                sprites.push(SpriteView {
                    kind,
                    slot: Some(id),
                    position: enemy.pixel(),
                    flags,
                });
            }
        }

        sprites.extend(state.bombs.iter().map(|(id, bomb)| SpriteView {
            kind: SpriteKind::Bomb,
            slot: Some(id),
            position: bomb.pixel(),
            flags: VisualFlags::empty(),
        }));
        sprites.extend(state.explosions.iter().map(|(id, explosion)| SpriteView {
            kind: SpriteKind::Explosion,
            slot: Some(id),
            position: explosion.position,
            flags: VisualFlags::empty(),
        }));

        for (bonus, kind) in [
            (BonusKind::PowerupTruck, SpriteKind::PowerupTruck),
            (BonusKind::PolarBear, SpriteKind::PolarBear),
        ] {
            if let Some(crosser) = state.bonus(bonus).active() {
                let mut flags = facing(crosser.entry);
                flags.set(VisualFlags::COLLECTED, crosser.collected);
                sprites.push(SpriteView {
                    kind,
                    slot: None,
                    position: crosser.pixel(),
                    flags,
                });
            }
        }

        let igloos = state
            .igloos
            .iter()
            .map(|igloo| IglooView {
                position: igloo.position,
                alive: igloo.alive,
            })
            .collect();

        let players = state
            .mode
            .players()
            .iter()
            .map(|&player| {
                let progress = state.player(player);
                PlayerHud {
                    player,
                    score: progress.score,
                    ammo: progress.ammo,
                    crosshair: progress.crosshair,
                    triple_shot: progress.triple_shot.remaining(),
                    fast_shot: progress.fast_shot.remaining(),
                }
            })
            .collect();

        Self {
            tick: state.tick,
            sprites,
            igloos,
            hud: HudView {
                wave: state.wave.number,
                game_over: state.game_over,
                megabombs: state.megabombs,
                igloos_alive: state.igloos_alive(),
                players,
            },
        }
    }

    /// Sprites of one kind, in slot order.
    pub fn sprites_of(&self, kind: SpriteKind) -> impl Iterator<Item = &SpriteView> {
        self.sprites.iter().filter(move |sprite| sprite.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameMode, Tuning};
    use crate::entity::{Countdown, Enemy, Missile};
    use fixpoint::{Fx, FxVec2};

    #[test]
    fn test_capture_flags() {
        let mut state = SimulationState::new(2, GameMode::SinglePlayer, Tuning::default());
        state.large_enemies.allocate(Enemy {
            class: EnemyClass::Large,
            position: FxVec2::from_pixels(IVec2::new(200, 40)),
            velocity_x: Fx::from_ratio(-3, 10),
            entry: Side::Right,
            hp: 2,
            hurt: Countdown::new(4),
        });
        state.missiles.allocate(Missile {
            position: FxVec2::from_pixels(IVec2::new(50, 100)),
            target: IVec2::new(50, 40),
            velocity: FxVec2::ZERO,
            owner: PlayerId::One,
            kind: MissileKind::Fast,
        });

        let snapshot = WorldSnapshot::capture(&state);
        let large: Vec<_> = snapshot.sprites_of(SpriteKind::LargeEnemy).collect();
        assert_eq!(large.len(), 1);
        assert_eq!(large[0].flags, VisualFlags::HURT | VisualFlags::FACING_LEFT);
        assert_eq!(large[0].position, IVec2::new(200, 40));

        let missile = snapshot.sprites_of(SpriteKind::Missile).next().unwrap();
        assert_eq!(missile.flags, VisualFlags::FAST);
        assert_eq!(missile.slot, Some(SlotId::new(0)));
    }

    #[test]
    fn test_hud_lists_participating_players() {
        let state = SimulationState::new(2, GameMode::TwoPlayer, Tuning::default());
        let snapshot = WorldSnapshot::capture(&state);
        assert_eq!(snapshot.hud.players.len(), 2);
        assert_eq!(snapshot.hud.igloos_alive, 5);
        assert_eq!(snapshot.igloos.len(), 5);

        let single = SimulationState::new(2, GameMode::SinglePlayer, Tuning::default());
        assert_eq!(WorldSnapshot::capture(&single).hud.players.len(), 1);
    }

    #[test]
    fn test_collected_truck_flag() {
        let mut state = SimulationState::new(2, GameMode::SinglePlayer, Tuning::default());
        let tuning = state.tuning;
        state.truck.schedule(0, Side::Left);
        state.truck.update(&tuning);
        state.truck.active_mut().unwrap().collected = true;

        let snapshot = WorldSnapshot::capture(&state);
        let truck = snapshot.sprites_of(SpriteKind::PowerupTruck).next().unwrap();
        assert_eq!(truck.flags, VisualFlags::COLLECTED);
        assert_eq!(truck.slot, None);
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = SimulationState::new(2, GameMode::SinglePlayer, Tuning::default());
        let json = serde_json::to_string(&WorldSnapshot::capture(&state)).unwrap();
        assert!(json.contains("\"igloos_alive\":5"));
    }
}
