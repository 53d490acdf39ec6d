//! Simulation orchestrator with the fixed per-tick phase order.
//!
//! The [`Simulation`] owns a [`SimulationState`] and an ordered list of
//! resolvers. One call to [`Simulation::step`] runs exactly one tick:
//!
//! 1. **INPUT**: crosshairs, bonus clicks, firing, megabombs
//! 2. **PHYSICS**: integrate every pool, cull, drop and ground bombs
//! 3. **COLLISION**: proximity sweeps, including complete blast-wave chains
//! 4. **WAVE**: completion, rewards, game-over check, next spawn
//! 5. **PROGRESS**: power-up timers
//!
//! # Determinism
//!
//! - All randomness comes from one `ChaCha8Rng` seeded from the master seed
//! - Pools are walked in slot order
//! - Given the same seed, tuning and input sequence, every tick yields the
//!   same [`state_hash`](Simulation::state_hash)
//!
//! # Example
//!
//! ```
//! use glam::IVec2;
//! use snowball_core::config::GameMode;
//! use snowball_core::player::{PlayerInput, TickInput};
//! use snowball_core::simulation::Simulation;
//!
//! let mut sim = Simulation::new(42, GameMode::SinglePlayer);
//! assert_eq!(sim.state().enemies_remaining(), 3);
//!
//! sim.step(&TickInput::single(PlayerInput::fire_at(IVec2::new(100, 60))));
//! for _ in 0..9 {
//!     sim.step(&TickInput::default());
//! }
//!
//! assert_eq!(sim.tick(), 10);
//! assert_eq!(sim.state().player(snowball_core::entity::PlayerId::One).ammo, 49);
//! ```

use std::fmt;

use tracing::trace_span;

use crate::config::{GameMode, Tuning, TuningError};
use crate::events::GameEvent;
use crate::hash::hash_state;
use crate::player::{InputResolver, TickInput};
use crate::resolver::{CollisionResolver, PhysicsResolver, Resolver};
use crate::scoring::ProgressResolver;
use crate::snapshot::WorldSnapshot;
use crate::state::SimulationState;
use crate::wave::{start_wave, WaveResolver};

// =============================================================================
// Simulation
// =============================================================================

/// The tick loop around a [`SimulationState`].
pub struct Simulation {
    /// The world.
    state: SimulationState,
    /// Phases, run in order every tick.
    resolvers: Vec<Box<dyn Resolver>>,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("state", &self.state)
            .field("resolvers", &self.resolver_names())
            .finish()
    }
}

impl Simulation {
    /// Creates a simulation with the default tuning and spawns wave 1.
    ///
    /// # Arguments
    ///
    /// * `seed` - Master seed for every random draw
    /// * `mode` - One or two players
    ///
    /// # Example
    ///
    /// ```
    /// use snowball_core::config::GameMode;
    /// use snowball_core::simulation::Simulation;
    ///
    /// let sim = Simulation::new(12345, GameMode::TwoPlayer);
    /// assert_eq!(sim.tick(), 0);
    /// assert_eq!(sim.seed(), 12345);
    /// ```
    #[must_use]
    pub fn new(seed: u64, mode: GameMode) -> Self {
        Self::build(SimulationState::new(seed, mode, Tuning::default()))
    }

    /// Creates a simulation with a custom tuning and spawns wave 1.
    ///
    /// # Errors
    ///
    /// Returns the first constraint the tuning violates.
    pub fn with_tuning(seed: u64, mode: GameMode, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(SimulationState::new(seed, mode, tuning)))
    }

    fn build(mut state: SimulationState) -> Self {
        start_wave(&mut state);
        Self {
            state,
            resolvers: vec![
                Box::new(InputResolver::new()),
                Box::new(PhysicsResolver::new()),
                Box::new(CollisionResolver::new()),
                Box::new(WaveResolver::new()),
                Box::new(ProgressResolver::new()),
            ],
        }
    }

    /// Runs one tick.
    ///
    /// Does nothing once the game is over; the final state stays readable.
    pub fn step(&mut self, input: &TickInput) {
        if self.state.game_over {
            return;
        }
        let span = trace_span!("tick", tick = self.state.tick);
        let _guard = span.enter();

        for resolver in &self.resolvers {
            resolver.resolve(&mut self.state, input);
        }
        self.state.tick += 1;
    }

    /// Appends a resolver that runs after the built-in phases.
    pub fn add_resolver(&mut self, resolver: Box<dyn Resolver>) {
        self.resolvers.push(resolver);
    }

    /// Names of the resolvers in execution order.
    #[must_use]
    pub fn resolver_names(&self) -> Vec<&'static str> {
        self.resolvers.iter().map(|resolver| resolver.name()).collect()
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Ticks completed so far.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.state.tick
    }

    /// Master seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.state.seed()
    }

    /// One or two players.
    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.state.mode
    }

    /// Read-only world state.
    #[must_use]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable world state for scripted setups between steps.
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Returns `true` once every igloo is gone.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state.game_over
    }

    /// Copies out the visible state.
    #[must_use]
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.state)
    }

    /// Drains events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    /// Deterministic hash of the current state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        hash_state(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::PlayerId;

    #[test]
    fn test_new_spawns_first_wave() {
        let mut sim = Simulation::new(1, GameMode::SinglePlayer);
        assert_eq!(sim.state().enemies_remaining(), 3);
        assert!(matches!(
            sim.take_events().as_slice(),
            [GameEvent::WaveStarted { wave: 1, enemies: 3, large_enemies: 0 }]
        ));
    }

    #[test]
    fn test_resolver_order() {
        let sim = Simulation::new(1, GameMode::SinglePlayer);
        assert_eq!(
            sim.resolver_names(),
            vec!["input", "physics", "collision", "wave", "progress"]
        );
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let mut tuning = Tuning::default();
        tuning.pools.missiles = 0;
        let result = Simulation::with_tuning(1, GameMode::SinglePlayer, tuning);
        assert!(matches!(result, Err(TuningError::EmptyPool { pool: "missiles" })));
    }

    #[test]
    fn test_degenerate_tunings_never_reach_the_state() {
        let mut no_resolution = Tuning::default();
        no_resolution.bomb.drop_resolution = 0;
        no_resolution.bomb.drop_chance_cap = 0;
        let mut no_igloos = Tuning::default();
        no_igloos.pools.igloos = 0;
        let mut no_lifetime = Tuning::default();
        no_lifetime.blast.explosion_duration = 0;

        for tuning in [no_resolution, no_igloos, no_lifetime] {
            assert!(Simulation::with_tuning(1, GameMode::SinglePlayer, tuning).is_err());
        }
    }

    #[test]
    fn test_explosions_free_their_slots() {
        let mut tuning = Tuning::default();
        tuning.bomb.drop_chance_per_wave = 0;
        tuning.blast.explosion_duration = 1;
        let mut sim = Simulation::with_tuning(1, GameMode::SinglePlayer, tuning).expect("valid tuning");
        assert_eq!(sim.state().tuning().blast.explosion_duration, 1);

        let capacity = sim.state().explosions.capacity();
        for x in 0..capacity {
            let x = i32::try_from(x).unwrap_or(0);
            sim.state_mut().spawn_explosion(glam::IVec2::new(10 * x, 20));
        }
        assert!(sim.state().explosions.is_full());

        sim.step(&TickInput::default());
        assert!(sim.state().explosions.is_empty());
    }

    #[test]
    fn test_step_advances_tick() {
        let mut sim = Simulation::new(1, GameMode::SinglePlayer);
        sim.step(&TickInput::default());
        sim.step(&TickInput::default());
        assert_eq!(sim.tick(), 2);
    }

    #[test]
    fn test_game_over_halts_stepping() {
        let mut sim = Simulation::new(1, GameMode::SinglePlayer);
        sim.state_mut().game_over = true;
        let before = sim.state_hash();
        sim.step(&TickInput::single(
            crate::player::PlayerInput::fire_at(glam::IVec2::new(100, 50)),
        ));
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.state_hash(), before);
        assert_eq!(sim.state().player(PlayerId::One).ammo, 50);
    }

    #[test]
    fn test_custom_resolver_runs_last() {
        struct Ammo;
        impl Resolver for Ammo {
            fn name(&self) -> &'static str {
                "ammo"
            }
            fn resolve(&self, state: &mut SimulationState, _input: &TickInput) {
                state.player_mut(PlayerId::One).ammo = 7;
            }
        }

        let mut sim = Simulation::new(1, GameMode::SinglePlayer);
        sim.add_resolver(Box::new(Ammo));
        sim.step(&TickInput::default());
        assert_eq!(sim.state().player(PlayerId::One).ammo, 7);
    }
}
