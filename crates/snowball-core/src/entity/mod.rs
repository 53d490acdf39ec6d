//! Entity types stored in the simulation's pools.
//!
//! Each pooled entity is a plain value: a slot either holds a complete entity
//! or nothing at all (see [`crate::arena::Pool`]), so there is no separate
//! `active` flag to keep in sync with the fields.
//!
//! # Entity Types
//!
//! - [`Missile`]: player projectile launched from a cannon
//! - [`Enemy`]: small or large flyer crossing the sky ([`EnemyClass`])
//! - [`Bomb`]: falling bomb dropped by an enemy
//! - [`Igloo`]: static defense on the ground line
//! - [`Explosion`]: timed visual marker
//! - [`BonusEntity`]: power-up truck or polar bear with a pending/active lifecycle

mod bonus;

pub use bonus::{BonusEntity, BonusKind, BonusPhase, BonusUpdate, Crosser};

use std::fmt;

use fixpoint::{Fx, FxVec2};
use glam::IVec2;
use serde::{Deserialize, Serialize};

// =============================================================================
// Identifiers
// =============================================================================

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    /// Player one; owns the left cannon in two-player mode.
    One,
    /// Player two; owns the right cannon.
    Two,
}

impl PlayerId {
    /// Zero-based index into per-player arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "P1"),
            Self::Two => write!(f, "P2"),
        }
    }
}

/// Screen edge an entity entered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Entered past the left edge, travels right.
    Left,
    /// Entered past the right edge, travels left.
    Right,
}

impl Side {
    /// Applies the travel direction to an unsigned speed.
    #[must_use]
    pub fn orient(self, speed: Fx) -> Fx {
        match self {
            Self::Left => speed,
            Self::Right => -speed,
        }
    }

    /// Picks a side from a coin flip.
    #[must_use]
    pub const fn from_coin(left: bool) -> Self {
        if left {
            Self::Left
        } else {
            Self::Right
        }
    }
}

// =============================================================================
// Countdown
// =============================================================================

/// A tick counter decremented once per tick and acted upon at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Countdown(u32);

impl Countdown {
    /// A countdown that is not running.
    pub const IDLE: Self = Self(0);

    /// Starts a countdown of `ticks`.
    #[must_use]
    pub const fn new(ticks: u32) -> Self {
        Self(ticks)
    }

    /// Ticks left before expiry.
    #[must_use]
    pub const fn remaining(self) -> u32 {
        self.0
    }

    /// Returns `true` while ticks remain.
    #[must_use]
    pub const fn is_running(self) -> bool {
        self.0 > 0
    }

    /// Restarts at `ticks`, replacing whatever was left.
    pub fn restart(&mut self, ticks: u32) {
        self.0 = ticks;
    }

    /// Advances one tick. Returns `true` on the tick the countdown expires.
    pub fn tick(&mut self) -> bool {
        if self.0 == 0 {
            return false;
        }
        self.0 -= 1;
        self.0 == 0
    }
}

// =============================================================================
// Pooled Entities
// =============================================================================

/// Missile flavor, fixed at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MissileKind {
    /// Standard speed.
    Normal,
    /// Fired while fast-shot is active.
    Fast,
}

/// A player missile in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Missile {
    /// Current position.
    pub position: FxVec2,
    /// Crosshair position at launch (informational).
    pub target: IVec2,
    /// Current velocity; gravity bends it downward every tick.
    pub velocity: FxVec2,
    /// Player credited with anything this missile destroys.
    pub owner: PlayerId,
    /// Launch flavor.
    pub kind: MissileKind,
}

impl Missile {
    /// Whole-pixel position.
    #[must_use]
    pub fn pixel(&self) -> IVec2 {
        self.position.to_pixels()
    }
}

/// Size class of an enemy; each class has its own pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyClass {
    /// Small flyer: 2 hp, no hurt visual.
    Small,
    /// Large flyer: 4 hp, flashes when hurt.
    Large,
}

impl EnemyClass {
    /// Both classes in sweep order.
    pub const ALL: [Self; 2] = [Self::Small, Self::Large];
}

/// A small or large enemy crossing the screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Enemy {
    /// Size class.
    pub class: EnemyClass,
    /// Current position.
    pub position: FxVec2,
    /// Signed horizontal velocity.
    pub velocity_x: Fx,
    /// Entry edge; the enemy escapes past the opposite one.
    pub entry: Side,
    /// Remaining hit points.
    pub hp: i32,
    /// Hurt visual timer (large enemies only).
    pub hurt: Countdown,
}

impl Enemy {
    /// Whole-pixel position.
    #[must_use]
    pub fn pixel(&self) -> IVec2 {
        self.position.to_pixels()
    }

    /// Returns `true` once the enemy has crossed the edge opposite its entry.
    ///
    /// Being past the entry edge does not count: freshly spawned enemies start
    /// there.
    #[must_use]
    pub fn has_escaped(&self, screen_width: i32) -> bool {
        let x = self.position.x.to_int();
        match self.entry {
            Side::Left => x > screen_width,
            Side::Right => x < 0,
        }
    }

    /// Returns `true` if the whole sprite is within the screen horizontally.
    #[must_use]
    pub fn is_fully_on_screen(&self, screen_width: i32, half_width: i32) -> bool {
        let x = self.position.x.to_int();
        x >= half_width && x <= screen_width - half_width
    }

    /// Applies damage and returns `true` if it was lethal.
    ///
    /// Large enemies restart their hurt visual on every hit, lethal or not.
    pub fn take_damage(&mut self, amount: i32, hurt_duration: u32) -> bool {
        self.hp -= amount;
        if self.class == EnemyClass::Large {
            self.hurt.restart(hurt_duration);
        }
        self.hp <= 0
    }
}

/// A bomb falling toward the igloos.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bomb {
    /// Current position.
    pub position: FxVec2,
    /// Current velocity; the horizontal part only ever comes from knockback.
    pub velocity: FxVec2,
}

impl Bomb {
    /// A bomb released at `position` with the configured initial fall speed.
    #[must_use]
    pub fn released(position: FxVec2, initial_vy: Fx) -> Self {
        Self {
            position,
            velocity: FxVec2::new(Fx::ZERO, initial_vy),
        }
    }

    /// Whole-pixel position.
    #[must_use]
    pub fn pixel(&self) -> IVec2 {
        self.position.to_pixels()
    }
}

/// A static defense on the ground line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Igloo {
    /// Fixed position.
    pub position: IVec2,
    /// `false` once a bomb has landed on it.
    pub alive: bool,
}

/// A purely visual explosion marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Explosion {
    /// Where it is drawn.
    pub position: IVec2,
    /// Ticks until it disappears.
    pub lifetime: Countdown,
}
