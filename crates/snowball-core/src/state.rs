//! The mutable world state handed to every resolver.
//!
//! [`SimulationState`] gathers the pools, per-player progress, wave progress
//! and the deterministic RNG into one record. Each resolver receives it by
//! mutable reference for its phase of the tick; nothing else writes to it.

use glam::IVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::arena::{Pool, SlotId};
use crate::config::{GameMode, Tuning};
use crate::entity::{
    BonusEntity, BonusKind, Bomb, Countdown, Enemy, EnemyClass, Explosion, Igloo, Missile,
    PlayerId,
};
use crate::events::GameEvent;
use crate::scoring::MilestoneTracker;
use crate::wave::WaveProgress;

/// Per-player progress and aim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerState {
    /// Cumulative score.
    pub score: u32,
    /// Remaining ammo; one unit per trigger pull.
    pub ammo: u32,
    /// Crosshair position in pixels.
    pub crosshair: IVec2,
    /// Triple-shot power-up timer.
    pub triple_shot: Countdown,
    /// Fast-shot power-up timer.
    pub fast_shot: Countdown,
}

impl PlayerState {
    /// A player at the start of a game.
    #[must_use]
    pub const fn new(ammo: u32, crosshair: IVec2) -> Self {
        Self {
            score: 0,
            ammo,
            crosshair,
            triple_shot: Countdown::IDLE,
            fast_shot: Countdown::IDLE,
        }
    }
}

/// Everything the simulation mutates during a tick.
///
/// Only [`Simulation`](crate::simulation::Simulation) builds one, after the
/// tuning has passed [`Tuning::validate`]:
///
/// ```compile_fail
/// use snowball_core::config::{GameMode, Tuning};
/// use snowball_core::state::SimulationState;
///
/// let state = SimulationState::new(1, GameMode::SinglePlayer, Tuning::default());
/// ```
///
/// The tuning is read-only once the state exists:
///
/// ```compile_fail
/// use snowball_core::config::GameMode;
/// use snowball_core::simulation::Simulation;
///
/// let mut sim = Simulation::new(1, GameMode::SinglePlayer);
/// sim.state_mut().tuning.bomb.drop_resolution = 0;
/// ```
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) tuning: Tuning,
    /// One or two players.
    pub mode: GameMode,
    /// Ticks completed so far.
    pub tick: u64,
    /// Missiles in flight.
    pub missiles: Pool<Missile>,
    /// Small enemies.
    pub enemies: Pool<Enemy>,
    /// Large enemies.
    pub large_enemies: Pool<Enemy>,
    /// Falling bombs.
    pub bombs: Pool<Bomb>,
    /// Igloos along the defense line, left to right.
    pub igloos: Vec<Igloo>,
    /// Visual explosions.
    pub explosions: Pool<Explosion>,
    /// The power-up truck.
    pub truck: BonusEntity,
    /// The polar bear.
    pub bear: BonusEntity,
    /// Per-player progress, indexed by [`PlayerId::index`].
    pub players: [PlayerState; 2],
    /// Current wave and its completion state.
    pub wave: WaveProgress,
    /// Score milestones and queued igloo restorations.
    pub milestones: MilestoneTracker,
    /// Megabomb charges shared by all players.
    pub megabombs: u32,
    /// Set once every igloo is gone; stepping stops.
    pub game_over: bool,
    pub(crate) rng: ChaCha8Rng,
    seed: u64,
    events: Vec<GameEvent>,
}

impl SimulationState {
    /// Builds the opening state: full igloo line, starting ammo, empty pools.
    ///
    /// No wave is spawned yet; see [`crate::wave::start_wave`]. The tuning
    /// is taken as already validated.
    #[must_use]
    pub(crate) fn new(seed: u64, mode: GameMode, tuning: Tuning) -> Self {
        let pools = tuning.pools;
        let ammo = tuning.scoring.starting_ammo(mode);
        let crosshair = tuning.screen.crosshair_start;
        let second_ammo = match mode {
            GameMode::SinglePlayer => 0,
            GameMode::TwoPlayer => ammo,
        };

        Self {
            mode,
            tick: 0,
            missiles: Pool::with_capacity(pools.missiles),
            enemies: Pool::with_capacity(pools.enemies),
            large_enemies: Pool::with_capacity(pools.large_enemies),
            bombs: Pool::with_capacity(pools.bombs),
            igloos: tuning
                .igloo_positions()
                .into_iter()
                .map(|position| Igloo {
                    position,
                    alive: true,
                })
                .collect(),
            explosions: Pool::with_capacity(pools.explosions),
            truck: BonusEntity::new(BonusKind::PowerupTruck),
            bear: BonusEntity::new(BonusKind::PolarBear),
            players: [
                PlayerState::new(ammo, crosshair),
                PlayerState::new(second_ammo, crosshair),
            ],
            wave: WaveProgress::default(),
            milestones: MilestoneTracker::new(tuning.scoring.first_milestone),
            megabombs: tuning.powerups.starting_megabombs,
            game_over: false,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            events: Vec::new(),
            tuning,
        }
    }

    /// Rule set; fixed for the lifetime of the simulation.
    #[must_use]
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Seed the RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The RNG driving every random draw, for scripted setups.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    // -------------------------------------------------------------------------
    // Pools
    // -------------------------------------------------------------------------

    /// The pool holding enemies of `class`.
    #[must_use]
    pub fn enemy_pool(&self, class: EnemyClass) -> &Pool<Enemy> {
        match class {
            EnemyClass::Small => &self.enemies,
            EnemyClass::Large => &self.large_enemies,
        }
    }

    /// Mutable access to the pool holding enemies of `class`.
    pub fn enemy_pool_mut(&mut self, class: EnemyClass) -> &mut Pool<Enemy> {
        match class {
            EnemyClass::Small => &mut self.enemies,
            EnemyClass::Large => &mut self.large_enemies,
        }
    }

    /// Active enemies across both pools.
    #[must_use]
    pub fn enemies_remaining(&self) -> usize {
        self.enemies.active_count() + self.large_enemies.active_count()
    }

    /// The truck or the bear.
    #[must_use]
    pub fn bonus(&self, kind: BonusKind) -> &BonusEntity {
        match kind {
            BonusKind::PowerupTruck => &self.truck,
            BonusKind::PolarBear => &self.bear,
        }
    }

    /// Mutable access to the truck or the bear.
    pub fn bonus_mut(&mut self, kind: BonusKind) -> &mut BonusEntity {
        match kind {
            BonusKind::PowerupTruck => &mut self.truck,
            BonusKind::PolarBear => &mut self.bear,
        }
    }

    /// Spawns an explosion at `position` if a slot is free.
    pub fn spawn_explosion(&mut self, position: IVec2) -> Option<SlotId> {
        let lifetime = Countdown::new(self.tuning.blast.explosion_duration);
        let slot = self.explosions.allocate(Explosion { position, lifetime });
        if slot.is_none() {
            debug!(?position, "explosion pool full, skipping");
        }
        slot
    }

    /// Number of igloos still standing.
    #[must_use]
    pub fn igloos_alive(&self) -> usize {
        self.igloos.iter().filter(|igloo| igloo.alive).count()
    }

    // -------------------------------------------------------------------------
    // Players
    // -------------------------------------------------------------------------

    /// Progress of `player`.
    #[must_use]
    pub fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player.index()]
    }

    /// Mutable progress of `player`.
    pub fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player.index()]
    }

    /// Highest score among participating players.
    #[must_use]
    pub fn leading_score(&self) -> u32 {
        self.mode
            .players()
            .iter()
            .map(|&player| self.player(player).score)
            .max()
            .unwrap_or(0)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Appends an event to this tick's log.
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events emitted since the last drain.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Drains the event log.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
