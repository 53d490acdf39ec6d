//! Player input and weapons.
//!
//! Input arrives once per tick as a [`TickInput`]. The [`InputResolver`]
//! applies it first in the tick, for each participating player in order:
//!
//! 1. Move and clamp the crosshair
//! 2. On a fire press: click the polar bear, click the truck, then fire
//! 3. On a megabomb press: detonate every falling bomb
//!
//! `fire` and `megabomb` are presses, not held buttons: the caller sets them
//! only on the tick the button goes down.

use fixpoint::FxVec2;
use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{GameMode, ScreenTuning};
use crate::entity::{Missile, MissileKind, PlayerId};
use crate::events::{Attribution, DetonationCause, GameEvent, PowerupReward};
use crate::resolver::{detonate, within, Resolver};
use crate::state::SimulationState;

// =============================================================================
// Input
// =============================================================================

/// How the crosshair moves this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aim {
    /// Stay put.
    #[default]
    Hold,
    /// Move by the crosshair speed along the sign of each component.
    Nudge(IVec2),
    /// Jump to an absolute position (pointer input).
    Point(IVec2),
}

/// One player's input for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Crosshair movement.
    pub aim: Aim,
    /// Faster crosshair movement while held.
    pub boost: bool,
    /// Fire button pressed this tick.
    pub fire: bool,
    /// Megabomb button pressed this tick.
    pub megabomb: bool,
}

impl PlayerInput {
    /// Moves the crosshair to `point` and fires.
    #[must_use]
    pub const fn fire_at(point: IVec2) -> Self {
        Self {
            aim: Aim::Point(point),
            boost: false,
            fire: true,
            megabomb: false,
        }
    }

    /// Nudges the crosshair in `direction`.
    #[must_use]
    pub const fn nudge(direction: IVec2) -> Self {
        Self {
            aim: Aim::Nudge(direction),
            boost: false,
            fire: false,
            megabomb: false,
        }
    }

    /// Presses the megabomb button.
    #[must_use]
    pub const fn megabomb() -> Self {
        Self {
            aim: Aim::Hold,
            boost: false,
            fire: false,
            megabomb: true,
        }
    }
}

/// Input for both players for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Indexed by [`PlayerId::index`]; player two is ignored in single-player.
    pub players: [PlayerInput; 2],
}

impl TickInput {
    /// Input for player one only.
    #[must_use]
    pub fn single(input: PlayerInput) -> Self {
        Self {
            players: [input, PlayerInput::default()],
        }
    }

    /// Input for both players.
    #[must_use]
    pub fn two(one: PlayerInput, two: PlayerInput) -> Self {
        Self {
            players: [one, two],
        }
    }

    /// Input of `player`.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerInput {
        &self.players[player.index()]
    }
}

// =============================================================================
// Input Resolver
// =============================================================================

/// Applies crosshair movement, clicks, firing and megabombs.
#[derive(Debug, Default)]
pub struct InputResolver;

impl InputResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for InputResolver {
    fn name(&self) -> &'static str {
        "input"
    }

    fn resolve(&self, state: &mut SimulationState, input: &TickInput) {
        for &player in state.mode.players() {
            let input = input.player(player);
            move_crosshair(state, player, input);

            if input.fire {
                click_polar_bear(state, player);
                click_powerup_truck(state, player);
                fire(state, player);
            }
            if input.megabomb {
                detonate_megabomb(state, player);
            }
        }
    }
}

fn move_crosshair(state: &mut SimulationState, player: PlayerId, input: &PlayerInput) {
    let screen = state.tuning.screen;
    let speed = if input.boost {
        screen.crosshair_boost_speed
    } else {
        screen.crosshair_speed
    };

    let progress = state.player_mut(player);
    let next = match input.aim {
        Aim::Hold => progress.crosshair,
        Aim::Nudge(direction) => progress.crosshair + direction.signum() * speed,
        Aim::Point(point) => point,
    };
    progress.crosshair = screen.clamp_crosshair(next);
}

// =============================================================================
// Weapons
// =============================================================================

/// The cannon `player` fires from.
///
/// In single-player the cannon horizontally nearest the crosshair (ties go
/// left); in two-player each player owns one side.
#[must_use]
pub fn cannon_for(mode: GameMode, player: PlayerId, crosshair: IVec2, screen: &ScreenTuning) -> IVec2 {
    match (mode, player) {
        (GameMode::SinglePlayer, _) => {
            let left = (crosshair.x - screen.cannon_left_x).abs();
            let right = (crosshair.x - screen.cannon_right_x).abs();
            if left <= right {
                screen.cannon_left()
            } else {
                screen.cannon_right()
            }
        }
        (GameMode::TwoPlayer, PlayerId::One) => screen.cannon_left(),
        (GameMode::TwoPlayer, PlayerId::Two) => screen.cannon_right(),
    }
}

/// Pulls `player`'s trigger; returns the number of missiles launched.
///
/// Nothing happens without ammo or with the crosshair at or below the cannon
/// line. Triple-shot fans out to three targets; one ammo unit is spent if at
/// least one missile found a free slot.
pub fn fire(state: &mut SimulationState, player: PlayerId) -> u32 {
    let tuning = state.tuning;
    let shooter = *state.player(player);
    if shooter.ammo == 0 || shooter.crosshair.y >= tuning.screen.cannon_y {
        return 0;
    }

    let cannon = cannon_for(state.mode, player, shooter.crosshair, &tuning.screen);
    let (kind, speed) = if shooter.fast_shot.is_running() {
        (MissileKind::Fast, tuning.missile.fast_speed)
    } else {
        (MissileKind::Normal, tuning.missile.speed)
    };
    let target = shooter.crosshair;
    let spread = IVec2::new(tuning.missile.triple_spread, 0);
    let fan = [target, target - spread, target + spread];
    let count = if shooter.triple_shot.is_running() { 3 } else { 1 };

    let mut launched = 0;
    for &aim_point in &fan[..count] {
        let Some(velocity) = FxVec2::aim(cannon, aim_point, speed) else {
            continue;
        };
        let missile = Missile {
            position: FxVec2::from_pixels(cannon),
            target: aim_point,
            velocity,
            owner: player,
            kind,
        };
        if state.missiles.allocate(missile).is_none() {
            debug!(%player, "missile pool full");
            break;
        }
        launched += 1;
    }

    if launched > 0 {
        state.player_mut(player).ammo -= 1;
        state.emit(GameEvent::MissileFired {
            player,
            count: launched,
            kind,
        });
    }
    launched
}

/// Clicks the polar bear if the crosshair is on it.
///
/// Returns the points awarded.
pub fn click_polar_bear(state: &mut SimulationState, player: PlayerId) -> Option<u32> {
    let bonus = state.tuning.bonus;
    let half = state.tuning.collision.bonus_click;
    let point = state.player(player).crosshair;

    let bear = state.bear.active_mut()?;
    if !within(point, bear.pixel(), half) {
        return None;
    }
    let click = bear.register_click(bonus.bear_click_boost, bonus.bear_boosted_clicks);
    let points = bonus
        .bear_base_score
        .saturating_add(bonus.bear_score_step.saturating_mul(click - 1));

    state.award_points(player, points);
    state.emit(GameEvent::BearClicked {
        player,
        click,
        points,
    });
    Some(points)
}

/// Collects the truck's reward if the crosshair is on it.
///
/// Each appearance pays out once.
pub fn click_powerup_truck(state: &mut SimulationState, player: PlayerId) -> Option<PowerupReward> {
    let half = state.tuning.collision.bonus_click;
    let point = state.player(player).crosshair;

    let truck = state.truck.active_mut()?;
    if truck.collected || !within(point, truck.pixel(), half) {
        return None;
    }
    truck.collected = true;

    let reward = PowerupReward::ALL[state.rng.gen_range(0..PowerupReward::ALL.len())];
    state.grant_powerup(player, reward);
    debug!(%player, ?reward, "power-up collected");
    state.emit(GameEvent::PowerupCollected { player, reward });
    Some(reward)
}

/// Spends a megabomb charge to detonate every falling bomb.
///
/// Each bomb scores like a shot bomb and its blast is credited to `player`.
/// Without a charge, or with no bomb to hit, the charge is kept and nothing
/// happens. Returns the bombs detonated directly (chain reactions not
/// included).
pub fn detonate_megabomb(state: &mut SimulationState, player: PlayerId) -> u32 {
    if state.megabombs == 0 || state.bombs.is_empty() {
        return 0;
    }
    state.megabombs -= 1;
    let points = state.tuning.scoring.bomb_points;

    let mut bombs = 0;
    for id in state.bombs.slot_ids() {
        let Some(bomb) = state.bombs.free(id) else {
            continue;
        };
        bombs += 1;
        state.award_points(player, points);
        detonate(
            state,
            bomb.pixel(),
            DetonationCause::Megabomb,
            Attribution::Player(player),
        );
    }

    debug!(%player, bombs, charges_left = state.megabombs, "megabomb");
    state.emit(GameEvent::MegabombDetonated { player, bombs });
    bombs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::entity::{Bomb, Side};
    use fixpoint::Fx;

    fn fresh(mode: GameMode) -> SimulationState {
        SimulationState::new(8, mode, Tuning::default())
    }

    fn apply(state: &mut SimulationState, input: TickInput) {
        InputResolver::new().resolve(state, &input);
    }

    mod crosshair_tests {
        use super::*;

        #[test]
        fn test_nudge_and_boost() {
            let mut state = fresh(GameMode::SinglePlayer);
            apply(&mut state, TickInput::single(PlayerInput::nudge(IVec2::new(1, -5))));
            assert_eq!(state.player(PlayerId::One).crosshair, IVec2::new(162, 110));

            let boosted = PlayerInput {
                boost: true,
                ..PlayerInput::nudge(IVec2::new(-1, 0))
            };
            apply(&mut state, TickInput::single(boosted));
            assert_eq!(state.player(PlayerId::One).crosshair, IVec2::new(158, 110));
        }

        #[test]
        fn test_point_is_clamped() {
            let mut state = fresh(GameMode::SinglePlayer);
            let input = PlayerInput {
                aim: Aim::Point(IVec2::new(-40, 500)),
                ..PlayerInput::default()
            };
            apply(&mut state, TickInput::single(input));
            assert_eq!(state.player(PlayerId::One).crosshair, IVec2::new(16, 208));
        }

        #[test]
        fn test_second_player_ignored_in_single_player() {
            let mut state = fresh(GameMode::SinglePlayer);
            let input = TickInput::two(
                PlayerInput::default(),
                PlayerInput::fire_at(IVec2::new(100, 60)),
            );
            apply(&mut state, input);
            assert_eq!(state.player(PlayerId::Two).crosshair, IVec2::new(160, 112));
            assert!(state.missiles.is_empty());
        }
    }

    mod fire_tests {
        use super::*;

        #[test]
        fn test_fire_from_nearest_cannon() {
            let mut state = fresh(GameMode::SinglePlayer);
            apply(&mut state, TickInput::single(PlayerInput::fire_at(IVec2::new(250, 60))));

            assert_eq!(state.player(PlayerId::One).ammo, 49);
            let (_, missile) = state.missiles.iter().next().unwrap();
            assert_eq!(missile.pixel(), IVec2::new(288, 176));
            assert_eq!(missile.target, IVec2::new(250, 60));
            assert!(missile.velocity.x < Fx::ZERO);
            assert!(missile.velocity.y < Fx::ZERO);
            assert_eq!(
                state.events(),
                &[GameEvent::MissileFired {
                    player: PlayerId::One,
                    count: 1,
                    kind: MissileKind::Normal
                }]
            );
        }

        #[test]
        fn test_tie_goes_to_left_cannon() {
            let screen = ScreenTuning::default();
            let cannon = cannon_for(GameMode::SinglePlayer, PlayerId::One, IVec2::new(160, 50), &screen);
            assert_eq!(cannon, screen.cannon_left());
        }

        #[test]
        fn test_two_player_cannons_are_fixed() {
            let screen = ScreenTuning::default();
            let near_left = IVec2::new(20, 50);
            assert_eq!(
                cannon_for(GameMode::TwoPlayer, PlayerId::Two, near_left, &screen),
                screen.cannon_right()
            );
            assert_eq!(
                cannon_for(GameMode::TwoPlayer, PlayerId::One, IVec2::new(300, 50), &screen),
                screen.cannon_left()
            );
        }

        #[test]
        fn test_zero_ammo_never_fires() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.player_mut(PlayerId::One).ammo = 0;
            assert_eq!(fire(&mut state, PlayerId::One), 0);
            assert!(state.missiles.is_empty());
            assert_eq!(state.player(PlayerId::One).ammo, 0);
        }

        #[test]
        fn test_no_fire_below_cannon_line() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.player_mut(PlayerId::One).crosshair = IVec2::new(100, 176);
            assert_eq!(fire(&mut state, PlayerId::One), 0);
            assert_eq!(state.player(PlayerId::One).ammo, 50);
        }

        #[test]
        fn test_triple_shot_costs_one_ammo() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.grant_powerup(PlayerId::One, PowerupReward::TripleShot);
            state.player_mut(PlayerId::One).crosshair = IVec2::new(100, 60);
            assert_eq!(fire(&mut state, PlayerId::One), 3);
            assert_eq!(state.player(PlayerId::One).ammo, 49);

            let targets: Vec<IVec2> = state.missiles.iter().map(|(_, m)| m.target).collect();
            assert_eq!(
                targets,
                vec![IVec2::new(100, 60), IVec2::new(76, 60), IVec2::new(124, 60)]
            );
        }

        #[test]
        fn test_fast_shot_missiles() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.grant_powerup(PlayerId::One, PowerupReward::FastShot);
            state.player_mut(PlayerId::One).crosshair = IVec2::new(32, 76);
            fire(&mut state, PlayerId::One);
            let (_, missile) = state.missiles.iter().next().unwrap();
            assert_eq!(missile.kind, MissileKind::Fast);
            // Straight up from the left cannon at 5 px/tick
            assert_eq!(missile.velocity.x, Fx::ZERO);
            assert_eq!(missile.velocity.y, Fx::from_int(-5));
        }

        #[test]
        fn test_full_missile_pool_keeps_ammo() {
            let mut tuning = Tuning::default();
            tuning.pools.missiles = 1;
            let mut state = SimulationState::new(8, GameMode::SinglePlayer, tuning);
            state.player_mut(PlayerId::One).crosshair = IVec2::new(100, 60);
            assert_eq!(fire(&mut state, PlayerId::One), 1);
            assert_eq!(fire(&mut state, PlayerId::One), 0);
            assert_eq!(state.player(PlayerId::One).ammo, 49);
        }
    }

    mod bonus_click_tests {
        use super::*;

        fn bear_at(state: &mut SimulationState, point: IVec2) {
            let tuning = state.tuning;
            state.bear.schedule(0, Side::Left);
            state.bear.update(&tuning);
            state.bear.active_mut().unwrap().position = FxVec2::from_pixels(point);
        }

        #[test]
        fn test_bear_click_sequence() {
            let mut state = fresh(GameMode::SinglePlayer);
            bear_at(&mut state, IVec2::new(100, 192));
            let click = TickInput::single(PlayerInput::fire_at(IVec2::new(104, 190)));

            let mut speeds = Vec::new();
            for _ in 0..5 {
                apply(&mut state, click);
                speeds.push(state.bear.active().unwrap().velocity_x);
            }

            let awarded: Vec<u32> = state
                .events()
                .iter()
                .filter_map(|event| match event {
                    GameEvent::BearClicked { points, .. } => Some(*points),
                    _ => None,
                })
                .collect();
            assert_eq!(awarded, vec![200, 300, 400, 500, 600]);
            assert_eq!(state.player(PlayerId::One).score, 2_000);

            let step = Fx::from_ratio(3, 5);
            assert_eq!(speeds[0], step.mul_int(2));
            assert_eq!(speeds[2], step.mul_int(4));
            assert_eq!(speeds[3], speeds[2]);
            assert_eq!(speeds[4], speeds[2]);
            // Crosshair below the cannon line: clicks never fire
            assert!(state.missiles.is_empty());
        }

        #[test]
        fn test_bear_missed_click() {
            let mut state = fresh(GameMode::SinglePlayer);
            bear_at(&mut state, IVec2::new(100, 192));
            state.player_mut(PlayerId::One).crosshair = IVec2::new(120, 192);
            assert_eq!(click_polar_bear(&mut state, PlayerId::One), None);
        }

        #[test]
        fn test_truck_pays_once_per_appearance() {
            let mut state = fresh(GameMode::SinglePlayer);
            let tuning = state.tuning;
            state.truck.schedule(0, Side::Right);
            state.truck.update(&tuning);
            state.truck.active_mut().unwrap().position = FxVec2::from_pixels(IVec2::new(200, 197));
            state.player_mut(PlayerId::One).crosshair = IVec2::new(200, 197);

            assert!(click_powerup_truck(&mut state, PlayerId::One).is_some());
            assert!(click_powerup_truck(&mut state, PlayerId::One).is_none());
            assert!(state.truck.active().unwrap().collected);
            let collected = state
                .events()
                .iter()
                .filter(|event| matches!(event, GameEvent::PowerupCollected { .. }))
                .count();
            assert_eq!(collected, 1);
        }

        #[test]
        fn test_pending_truck_cannot_be_clicked() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.truck.schedule(100, Side::Left);
            assert_eq!(click_powerup_truck(&mut state, PlayerId::One), None);
        }
    }

    mod megabomb_tests {
        use super::*;

        fn bomb_at(state: &mut SimulationState, x: i32, y: i32) {
            state.bombs.allocate(Bomb::released(
                FxVec2::from_pixels(IVec2::new(x, y)),
                Fx::ZERO,
            ));
        }

        #[test]
        fn test_megabomb_clears_every_bomb() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.megabombs = 1;
            bomb_at(&mut state, 40, 50);
            bomb_at(&mut state, 160, 50);
            bomb_at(&mut state, 280, 50);

            apply(&mut state, TickInput::single(PlayerInput::megabomb()));
            assert!(state.bombs.is_empty());
            assert_eq!(state.megabombs, 0);
            assert_eq!(state.player(PlayerId::One).score, 30);
            assert_eq!(
                state.events().last(),
                Some(&GameEvent::MegabombDetonated {
                    player: PlayerId::One,
                    bombs: 3
                })
            );
        }

        #[test]
        fn test_chained_bombs_not_counted_twice() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.megabombs = 1;
            bomb_at(&mut state, 100, 50);
            bomb_at(&mut state, 103, 50);
            assert_eq!(detonate_megabomb(&mut state, PlayerId::One), 1);
            assert!(state.bombs.is_empty());
            assert_eq!(state.player(PlayerId::One).score, 10);
        }

        #[test]
        fn test_megabomb_without_bombs_keeps_charge() {
            let mut state = fresh(GameMode::SinglePlayer);
            state.megabombs = 2;
            assert_eq!(detonate_megabomb(&mut state, PlayerId::One), 0);
            assert_eq!(state.megabombs, 2);
        }
    }
}
