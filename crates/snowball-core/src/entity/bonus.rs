//! Bonus entities: the power-up truck and the polar bear.
//!
//! Both share a two-phase lifecycle. Scheduling puts the entity into
//! [`BonusPhase::Pending`] with a random delay and entry side; when the delay
//! runs out it materializes just past its entry edge and crosses the screen as
//! a [`Crosser`] until it leaves past the opposite edge.

use fixpoint::{Fx, FxVec2};
use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::Side;
use crate::config::Tuning;

/// Which bonus entity this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusKind {
    /// Clicking it once grants a random power-up.
    PowerupTruck,
    /// Clicking it scores escalating points and speeds it up.
    PolarBear,
}

/// A bonus entity that has materialized and is crossing the screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crosser {
    /// Current position.
    pub position: FxVec2,
    /// Signed horizontal velocity.
    pub velocity_x: Fx,
    /// Entry edge.
    pub entry: Side,
    /// Clicks received during this appearance.
    pub clicks: u32,
    /// Set once the truck's reward has been taken.
    pub collected: bool,
}

impl Crosser {
    /// Whole-pixel position.
    #[must_use]
    pub fn pixel(&self) -> IVec2 {
        self.position.to_pixels()
    }

    /// Counts a click and returns its 1-based ordinal.
    ///
    /// The first `boosted_clicks` clicks also add `boost` in the direction of
    /// travel.
    pub fn register_click(&mut self, boost: Fx, boosted_clicks: u32) -> u32 {
        self.clicks += 1;
        if self.clicks <= boosted_clicks {
            self.velocity_x += self.entry.orient(boost);
        }
        self.clicks
    }
}

/// Lifecycle phase of a bonus entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BonusPhase {
    /// Not scheduled.
    Idle,
    /// Scheduled; appears once `remaining` has counted down.
    Pending {
        /// Ticks left before materializing.
        remaining: u32,
        /// Edge it will enter from.
        entry: Side,
    },
    /// Crossing the screen.
    Active(Crosser),
}

/// Lifecycle transitions reported by [`BonusEntity::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BonusUpdate {
    /// Materialized at its entry edge this tick.
    Appeared,
    /// Left past the far edge this tick.
    Departed,
}

/// A truck or bear slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BonusEntity {
    kind: BonusKind,
    phase: BonusPhase,
}

impl BonusEntity {
    /// Creates an idle entity of `kind`.
    #[must_use]
    pub const fn new(kind: BonusKind) -> Self {
        Self {
            kind,
            phase: BonusPhase::Idle,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> &BonusPhase {
        &self.phase
    }

    /// Returns `true` if neither pending nor active.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self.phase, BonusPhase::Idle)
    }

    /// The crossing entity, if it has materialized.
    #[must_use]
    pub fn active(&self) -> Option<&Crosser> {
        match &self.phase {
            BonusPhase::Active(crosser) => Some(crosser),
            _ => None,
        }
    }

    /// Mutable access to the crossing entity.
    pub fn active_mut(&mut self) -> Option<&mut Crosser> {
        match &mut self.phase {
            BonusPhase::Active(crosser) => Some(crosser),
            _ => None,
        }
    }

    /// Schedules an appearance after `delay` ticks from `entry`.
    ///
    /// Returns `false` and changes nothing if already pending or active.
    pub fn schedule(&mut self, delay: u32, entry: Side) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.phase = BonusPhase::Pending {
            remaining: delay,
            entry,
        };
        true
    }

    /// Advances the lifecycle by one tick.
    ///
    /// An entity that materializes this tick stays at its entry point until
    /// the next one.
    pub fn update(&mut self, tuning: &Tuning) -> Option<BonusUpdate> {
        if let BonusPhase::Pending { remaining, entry } = &mut self.phase {
            if *remaining > 0 {
                *remaining -= 1;
                return None;
            }
            let entry = *entry;
            self.phase = BonusPhase::Active(Self::materialize(self.kind, entry, tuning));
            return Some(BonusUpdate::Appeared);
        }

        let BonusPhase::Active(crosser) = &mut self.phase else {
            return None;
        };
        crosser.position.x += crosser.velocity_x;

        let x = crosser.position.x.to_int();
        let margin = tuning.screen.offscreen_margin;
        let departed = match crosser.entry {
            Side::Left => x > tuning.screen.width + margin,
            Side::Right => x < -margin,
        };
        if departed {
            self.phase = BonusPhase::Idle;
            return Some(BonusUpdate::Departed);
        }
        None
    }

    fn materialize(kind: BonusKind, entry: Side, tuning: &Tuning) -> Crosser {
        let (speed, row) = match kind {
            BonusKind::PowerupTruck => (tuning.bonus.truck_speed, tuning.bonus.truck_y),
            BonusKind::PolarBear => (tuning.bonus.bear_speed, tuning.bonus.bear_y),
        };
        let margin = tuning.screen.offscreen_margin;
        let x = match entry {
            Side::Left => -margin,
            Side::Right => tuning.screen.width + margin,
        };
        Crosser {
            position: FxVec2::from_pixels(IVec2::new(x, row)),
            velocity_x: entry.orient(speed),
            entry,
            clicks: 0,
            collected: false,
        }
    }
}
