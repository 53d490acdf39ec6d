//! Tuning configuration for the simulation.
//!
//! Every constant the game rules depend on lives in [`Tuning`]: pool
//! capacities, per-entity collision half-extents, speeds, radii, score values
//! and timers. The defaults reproduce the arcade cabinet's behavior at a fixed
//! 60 ticks per second.
//!
//! # Loading
//!
//! Tuning documents are JSON. Missing fields fall back to their defaults, so a
//! document only needs to name what it overrides:
//!
//! ```
//! use snowball_core::config::Tuning;
//!
//! let tuning = Tuning::from_json(r#"{ "pools": { "bombs": 8 } }"#).unwrap();
//! assert_eq!(tuning.pools.bombs, 8);
//! assert_eq!(tuning.pools.missiles, 30);
//! ```
//!
//! Fixed-point fields are written as raw 16.16 integers (`65536` is one pixel).

use fixpoint::Fx;
use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entity::{EnemyClass, PlayerId};

// =============================================================================
// Errors
// =============================================================================

/// Reasons a [`Tuning`] cannot drive a simulation.
#[derive(Debug, Error)]
pub enum TuningError {
    /// A pool was configured with no slots.
    #[error("pool `{pool}` must hold at least one slot")]
    EmptyPool {
        /// Name of the offending pool.
        pool: &'static str,
    },

    /// A quantity that must be strictly positive was not.
    #[error("`{field}` must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value (raw units for fixed-point fields).
        value: i64,
    },

    /// The chain radius must sit strictly inside the blast radius.
    #[error("chain radius {chain} must be smaller than blast radius {blast}")]
    ChainRadiusTooLarge {
        /// Configured chain radius.
        chain: i32,
        /// Configured blast radius.
        blast: i32,
    },

    /// The bomb drop cap is larger than the sampling resolution.
    #[error("bomb drop cap {cap} exceeds sampling resolution {resolution}")]
    DropCapTooHigh {
        /// Configured cap.
        cap: u32,
        /// Configured resolution.
        resolution: u32,
    },

    /// Crosshair minimum lies beyond the maximum on some axis.
    #[error("crosshair bounds are inverted: min {min} max {max}")]
    InvertedCrosshairBounds {
        /// Configured minimum.
        min: IVec2,
        /// Configured maximum.
        max: IVec2,
    },

    /// Speed variance of 100% or more could stop or reverse an enemy.
    #[error("speed variance {0}% must be in 0..100")]
    VarianceOutOfRange(i32),

    /// The JSON document could not be parsed.
    #[error("invalid tuning document: {0}")]
    Parse(#[from] serde_json::Error),
}

fn positive(field: &'static str, value: i64) -> Result<(), TuningError> {
    if value > 0 {
        Ok(())
    } else {
        Err(TuningError::NonPositive { field, value })
    }
}

// =============================================================================
// Game Mode
// =============================================================================

/// Number of participating players, fixed for the lifetime of a simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// One player controls both cannons.
    #[default]
    SinglePlayer,
    /// Player one owns the left cannon, player two the right.
    TwoPlayer,
}

impl GameMode {
    /// Players taking part in this mode, in input order.
    #[must_use]
    pub fn players(self) -> &'static [PlayerId] {
        match self {
            Self::SinglePlayer => &[PlayerId::One],
            Self::TwoPlayer => &[PlayerId::One, PlayerId::Two],
        }
    }

    /// Returns `true` if `player` takes part in this mode.
    #[must_use]
    pub fn includes(self, player: PlayerId) -> bool {
        self.players().contains(&player)
    }
}

// =============================================================================
// Tuning Groups
// =============================================================================

/// Playfield geometry and crosshair movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenTuning {
    /// Playfield width in pixels.
    pub width: i32,
    /// Playfield height in pixels.
    pub height: i32,
    /// X of the left cannon muzzle.
    pub cannon_left_x: i32,
    /// X of the right cannon muzzle.
    pub cannon_right_x: i32,
    /// Y of both cannons; also the defense line.
    pub cannon_y: i32,
    /// Crosshair position at the start of a game.
    pub crosshair_start: IVec2,
    /// Top-left crosshair bound.
    pub crosshair_min: IVec2,
    /// Bottom-right crosshair bound.
    pub crosshair_max: IVec2,
    /// Crosshair pixels per tick.
    pub crosshair_speed: i32,
    /// Crosshair pixels per tick while boosting.
    pub crosshair_boost_speed: i32,
    /// Distance beyond the edge where bonus entities appear and bombs are culled.
    pub offscreen_margin: i32,
}

impl Default for ScreenTuning {
    fn default() -> Self {
        Self {
            width: 320,
            height: 224,
            cannon_left_x: 32,
            cannon_right_x: 288,
            cannon_y: 176,
            crosshair_start: IVec2::new(160, 112),
            crosshair_min: IVec2::new(16, 32),
            crosshair_max: IVec2::new(304, 208),
            crosshair_speed: 2,
            crosshair_boost_speed: 4,
            offscreen_margin: 20,
        }
    }
}

impl ScreenTuning {
    /// Muzzle position of the left cannon.
    #[must_use]
    pub fn cannon_left(&self) -> IVec2 {
        IVec2::new(self.cannon_left_x, self.cannon_y)
    }

    /// Muzzle position of the right cannon.
    #[must_use]
    pub fn cannon_right(&self) -> IVec2 {
        IVec2::new(self.cannon_right_x, self.cannon_y)
    }

    /// Clamps a crosshair position into its allowed rectangle.
    #[must_use]
    pub fn clamp_crosshair(&self, point: IVec2) -> IVec2 {
        point.clamp(self.crosshair_min, self.crosshair_max)
    }
}

/// Fixed pool capacities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolCapacities {
    /// Missile slots.
    pub missiles: usize,
    /// Small enemy slots.
    pub enemies: usize,
    /// Large enemy slots.
    pub large_enemies: usize,
    /// Falling bomb slots.
    pub bombs: usize,
    /// Number of igloos along the defense line.
    pub igloos: usize,
    /// Explosion slots.
    pub explosions: usize,
}

impl Default for PoolCapacities {
    fn default() -> Self {
        Self {
            missiles: 30,
            enemies: 7,
            large_enemies: 5,
            bombs: 20,
            igloos: 5,
            explosions: 10,
        }
    }
}

/// Missile flight and damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissileTuning {
    /// Launch speed of a normal missile.
    pub speed: Fx,
    /// Launch speed while fast-shot is active.
    pub fast_speed: Fx,
    /// Downward bias added to vertical velocity every tick.
    pub gravity: Fx,
    /// Hit points removed by a direct hit.
    pub damage: i32,
    /// Horizontal offset of the outer triple-shot targets.
    pub triple_spread: i32,
}

impl Default for MissileTuning {
    fn default() -> Self {
        Self {
            speed: Fx::from_int(3),
            fast_speed: Fx::from_int(5),
            gravity: Fx::from_ratio(2, 100),
            damage: 2,
            triple_spread: 24,
        }
    }
}

/// Enemy health, placement and bomb-drop margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Starting hit points of a small enemy.
    pub small_hp: i32,
    /// Starting hit points of a large enemy.
    pub large_hp: i32,
    /// Ticks a large enemy shows its hurt visual after taking damage.
    pub hurt_duration: u32,
    /// Minimum Manhattan distance between spawn points in one wave.
    pub min_spacing: i32,
    /// Placement draws before the last draw is accepted regardless.
    pub placement_attempts: u32,
    /// Topmost spawn row.
    pub spawn_y_min: i32,
    /// Number of spawn rows below `spawn_y_min`.
    pub spawn_y_span: i32,
    /// Smallest distance beyond the screen edge at spawn.
    pub entry_offset_min: i32,
    /// Number of possible entry offsets above the minimum.
    pub entry_offset_span: i32,
    /// Maximum random deviation from the wave's base speed, in percent.
    pub speed_variance_percent: i32,
    /// Half-width of a small enemy for the on-screen bomb-drop check.
    pub small_half_width: i32,
    /// Half-width of a large enemy for the on-screen bomb-drop check.
    pub large_half_width: i32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            small_hp: 2,
            large_hp: 4,
            hurt_duration: 10,
            min_spacing: 40,
            placement_attempts: 10,
            spawn_y_min: 16,
            spawn_y_span: 101,
            entry_offset_min: 20,
            entry_offset_span: 40,
            speed_variance_percent: 33,
            small_half_width: 12,
            large_half_width: 20,
        }
    }
}

impl EnemyTuning {
    /// Starting hit points for an enemy class.
    #[must_use]
    pub fn starting_hp(&self, class: EnemyClass) -> i32 {
        match class {
            EnemyClass::Small => self.small_hp,
            EnemyClass::Large => self.large_hp,
        }
    }

    /// Half-width used by the on-screen bomb-drop check.
    #[must_use]
    pub fn half_width(&self, class: EnemyClass) -> i32 {
        match class {
            EnemyClass::Small => self.small_half_width,
            EnemyClass::Large => self.large_half_width,
        }
    }
}

/// Falling bomb physics and drop rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BombTuning {
    /// Vertical velocity at release.
    pub initial_vy: Fx,
    /// Downward acceleration per tick.
    pub gravity: Fx,
    /// Terminal vertical velocity.
    pub terminal_vy: Fx,
    /// Rows below the cannon line at which a bomb detonates on the ground.
    pub ground_offset: i32,
    /// Drop chance added per wave, out of `drop_resolution`.
    pub drop_chance_per_wave: u32,
    /// Upper bound on the drop chance, out of `drop_resolution`.
    pub drop_chance_cap: u32,
    /// Sample space of the per-tick drop roll.
    pub drop_resolution: u32,
}

impl Default for BombTuning {
    fn default() -> Self {
        Self {
            initial_vy: Fx::from_ratio(5, 100),
            gravity: Fx::from_ratio(2, 100),
            terminal_vy: Fx::from_ratio(4, 5),
            ground_offset: 5,
            drop_chance_per_wave: 1,
            drop_chance_cap: 300,
            drop_resolution: 1000,
        }
    }
}

impl BombTuning {
    /// Per-tick drop chance for an on-screen enemy, out of `drop_resolution`.
    #[must_use]
    pub fn drop_chance(&self, wave: u32) -> u32 {
        wave.saturating_mul(self.drop_chance_per_wave)
            .min(self.drop_chance_cap)
    }
}

/// Blast wave geometry and explosion lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlastTuning {
    /// Bombs closer than this to a detonation chain-detonate.
    pub chain_radius: i32,
    /// Bombs and enemies closer than this are affected at all.
    pub blast_radius: i32,
    /// Knockback at zero distance; falls off linearly to zero at the radius.
    pub max_force: Fx,
    /// Ticks an explosion stays visible.
    pub explosion_duration: u32,
}

impl Default for BlastTuning {
    fn default() -> Self {
        Self {
            chain_radius: 5,
            blast_radius: 32,
            max_force: Fx::from_int(3),
            explosion_duration: 15,
        }
    }
}

/// Axis-aligned half-extents for each colliding pair.
///
/// Two points collide when both `|dx| < half.x` and `|dy| < half.y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionTuning {
    /// Missile against small enemy.
    pub missile_enemy: IVec2,
    /// Missile against large enemy.
    pub missile_large_enemy: IVec2,
    /// Missile against falling bomb.
    pub missile_bomb: IVec2,
    /// Falling bomb against igloo.
    pub bomb_igloo: IVec2,
    /// Crosshair click against a bonus entity.
    pub bonus_click: IVec2,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            missile_enemy: IVec2::new(12, 12),
            missile_large_enemy: IVec2::new(20, 14),
            missile_bomb: IVec2::new(8, 8),
            bomb_igloo: IVec2::new(12, 12),
            bonus_click: IVec2::new(12, 12),
        }
    }
}

impl CollisionTuning {
    /// Missile half-extents for an enemy class.
    #[must_use]
    pub fn missile_against(&self, class: EnemyClass) -> IVec2 {
        match class {
            EnemyClass::Small => self.missile_enemy,
            EnemyClass::Large => self.missile_large_enemy,
        }
    }
}

/// Power-up truck and polar bear crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BonusTuning {
    /// Horizontal speed of the truck.
    pub truck_speed: Fx,
    /// Row the truck drives along.
    pub truck_y: i32,
    /// Initial horizontal speed of the polar bear.
    pub bear_speed: Fx,
    /// Speed added per boosted click.
    pub bear_click_boost: Fx,
    /// Number of clicks that add speed.
    pub bear_boosted_clicks: u32,
    /// Row the polar bear walks along.
    pub bear_y: i32,
    /// Points for the first click.
    pub bear_base_score: u32,
    /// Points added per subsequent click.
    pub bear_score_step: u32,
    /// Longest delay between scheduling and appearance.
    pub max_spawn_delay: u32,
}

impl Default for BonusTuning {
    fn default() -> Self {
        Self {
            truck_speed: Fx::from_ratio(9, 8),
            truck_y: 197,
            bear_speed: Fx::from_ratio(3, 5),
            bear_click_boost: Fx::from_ratio(3, 5),
            bear_boosted_clicks: 3,
            bear_y: 192,
            bear_base_score: 200,
            bear_score_step: 100,
            max_spawn_delay: 300,
        }
    }
}

/// Points and the ammo economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Direct kill of a small enemy.
    pub enemy_points: u32,
    /// Direct kill of a large enemy.
    pub large_enemy_points: u32,
    /// Shooting down a bomb.
    pub bomb_points: u32,
    /// Score at which the first igloo restoration is queued.
    pub first_milestone: u32,
    /// Ammo at the start of a single-player game.
    pub starting_ammo_single: u32,
    /// Ammo per player at the start of a two-player game.
    pub starting_ammo_shared: u32,
    /// Base ammo reward per wave in single-player.
    pub wave_ammo_single: u32,
    /// Base ammo reward per player per wave in two-player.
    pub wave_ammo_shared: u32,
    /// Single-player reward increase per interval.
    pub wave_ammo_step_single: u32,
    /// Two-player reward increase per interval.
    pub wave_ammo_step_shared: u32,
    /// Waves per reward increase.
    pub wave_ammo_interval: u32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            enemy_points: 100,
            large_enemy_points: 200,
            bomb_points: 10,
            first_milestone: 5000,
            starting_ammo_single: 50,
            starting_ammo_shared: 25,
            wave_ammo_single: 15,
            wave_ammo_shared: 7,
            wave_ammo_step_single: 2,
            wave_ammo_step_shared: 1,
            wave_ammo_interval: 10,
        }
    }
}

impl ScoringTuning {
    /// Points for a direct kill of an enemy class.
    #[must_use]
    pub fn kill_points(&self, class: EnemyClass) -> u32 {
        match class {
            EnemyClass::Small => self.enemy_points,
            EnemyClass::Large => self.large_enemy_points,
        }
    }

    /// Starting ammo for each player in `mode`.
    #[must_use]
    pub fn starting_ammo(&self, mode: GameMode) -> u32 {
        match mode {
            GameMode::SinglePlayer => self.starting_ammo_single,
            GameMode::TwoPlayer => self.starting_ammo_shared,
        }
    }
}

/// Power-up durations and rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerupTuning {
    /// Ticks of triple-shot granted by the truck.
    pub triple_shot_duration: u32,
    /// Ticks of fast-shot granted by the truck.
    pub fast_shot_duration: u32,
    /// Ammo granted by the truck's ammo crate.
    pub ammo_bonus: u32,
    /// Megabomb charges at the start of a game.
    pub starting_megabombs: u32,
}

impl Default for PowerupTuning {
    fn default() -> Self {
        Self {
            triple_shot_duration: 600,
            fast_shot_duration: 600,
            ammo_bonus: 10,
            starting_megabombs: 0,
        }
    }
}

// =============================================================================
// Tuning
// =============================================================================

/// Complete rule set for one simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield and crosshair.
    pub screen: ScreenTuning,
    /// Pool capacities.
    pub pools: PoolCapacities,
    /// Missiles.
    pub missile: MissileTuning,
    /// Enemies.
    pub enemy: EnemyTuning,
    /// Falling bombs.
    pub bomb: BombTuning,
    /// Blast waves.
    pub blast: BlastTuning,
    /// Collision half-extents.
    pub collision: CollisionTuning,
    /// Bonus entities.
    pub bonus: BonusTuning,
    /// Scoring and ammo.
    pub scoring: ScoringTuning,
    /// Power-ups.
    pub powerups: PowerupTuning,
}

impl Tuning {
    /// Parses a JSON document over the defaults and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`TuningError::Parse`] for malformed JSON and any validation
    /// error from [`Tuning::validate`].
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serializes the tuning as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TuningError::Parse`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that the tuning can drive a simulation without panicking or
    /// degenerating.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), TuningError> {
        let pools = [
            ("missiles", self.pools.missiles),
            ("enemies", self.pools.enemies),
            ("large_enemies", self.pools.large_enemies),
            ("bombs", self.pools.bombs),
            ("igloos", self.pools.igloos),
            ("explosions", self.pools.explosions),
        ];
        if let Some((pool, _)) = pools.iter().find(|(_, capacity)| *capacity == 0) {
            return Err(TuningError::EmptyPool { pool: *pool });
        }

        positive("screen.width", i64::from(self.screen.width))?;
        positive("screen.height", i64::from(self.screen.height))?;
        let (min, max) = (self.screen.crosshair_min, self.screen.crosshair_max);
        if min.x > max.x || min.y > max.y {
            return Err(TuningError::InvertedCrosshairBounds { min, max });
        }

        positive("missile.speed", i64::from(self.missile.speed.raw()))?;
        positive("missile.fast_speed", i64::from(self.missile.fast_speed.raw()))?;
        positive("missile.damage", i64::from(self.missile.damage))?;

        positive("enemy.small_hp", i64::from(self.enemy.small_hp))?;
        positive("enemy.large_hp", i64::from(self.enemy.large_hp))?;
        positive(
            "enemy.placement_attempts",
            i64::from(self.enemy.placement_attempts),
        )?;
        positive("enemy.spawn_y_span", i64::from(self.enemy.spawn_y_span))?;
        positive(
            "enemy.entry_offset_span",
            i64::from(self.enemy.entry_offset_span),
        )?;
        if !(0..100).contains(&self.enemy.speed_variance_percent) {
            return Err(TuningError::VarianceOutOfRange(
                self.enemy.speed_variance_percent,
            ));
        }

        positive("bomb.drop_resolution", i64::from(self.bomb.drop_resolution))?;
        if self.bomb.drop_chance_cap > self.bomb.drop_resolution {
            return Err(TuningError::DropCapTooHigh {
                cap: self.bomb.drop_chance_cap,
                resolution: self.bomb.drop_resolution,
            });
        }

        positive("blast.blast_radius", i64::from(self.blast.blast_radius))?;
        positive(
            "blast.explosion_duration",
            i64::from(self.blast.explosion_duration),
        )?;
        if self.blast.chain_radius < 0 || self.blast.chain_radius >= self.blast.blast_radius {
            return Err(TuningError::ChainRadiusTooLarge {
                chain: self.blast.chain_radius,
                blast: self.blast.blast_radius,
            });
        }

        positive("bonus.truck_speed", i64::from(self.bonus.truck_speed.raw()))?;
        positive("bonus.bear_speed", i64::from(self.bonus.bear_speed.raw()))?;
        positive(
            "scoring.wave_ammo_interval",
            i64::from(self.scoring.wave_ammo_interval),
        )?;
        positive(
            "scoring.first_milestone",
            i64::from(self.scoring.first_milestone),
        )?;

        Ok(())
    }

    /// Igloo positions, evenly spaced along the defense line.
    #[must_use]
    pub fn igloo_positions(&self) -> Vec<IVec2> {
        let count = i32::try_from(self.pools.igloos).unwrap_or(i32::MAX);
        let spacing = self.screen.width / count.saturating_add(1);
        (1..=count)
            .map(|i| IVec2::new(spacing * i, self.screen.cannon_y))
            .collect()
    }

    /// Row at which falling bombs hit the ground.
    #[must_use]
    pub fn ground_y(&self) -> i32 {
        self.screen.cannon_y + self.bomb.ground_offset
    }
}
