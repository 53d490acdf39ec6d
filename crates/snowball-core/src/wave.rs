//! Wave progression: completion, rewards, the terminal check and the next
//! spawn.
//!
//! # State Machine
//!
//! ```text
//! Complete --start_wave--> InProgress --(no enemies left)--> Complete
//! ```
//!
//! On completion, in order: ammo for every participating player, one queued
//! igloo restoration, the game-over check, then the next wave is spawned and
//! the bonus entities are scheduled when their wave comes up.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{GameMode, ScoringTuning};
use crate::entity::{BonusKind, Side};
use crate::events::GameEvent;
use crate::player::TickInput;
use crate::resolver::Resolver;
use crate::spawn::spawn_wave;
use crate::state::SimulationState;

/// Whether the current wave still has enemies to clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WavePhase {
    /// Enemies of the current wave are still around.
    InProgress,
    /// Cleared; the next wave has not been spawned yet.
    Complete,
}

/// Current wave number and phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaveProgress {
    /// Wave number, starting at 1.
    pub number: u32,
    /// Current phase.
    pub phase: WavePhase,
    /// Enemies placed when this wave started.
    pub spawned: u32,
}

impl Default for WaveProgress {
    fn default() -> Self {
        Self {
            number: 1,
            phase: WavePhase::Complete,
            spawned: 0,
        }
    }
}

// =============================================================================
// Schedules
// =============================================================================

/// Ammo granted to each participating player for completing `completed`.
#[must_use]
pub fn ammo_reward(completed: u32, mode: GameMode, scoring: &ScoringTuning) -> u32 {
    let steps = completed / scoring.wave_ammo_interval.max(1);
    let (base, step) = match mode {
        GameMode::SinglePlayer => (scoring.wave_ammo_single, scoring.wave_ammo_step_single),
        GameMode::TwoPlayer => (scoring.wave_ammo_shared, scoring.wave_ammo_step_shared),
    };
    base.saturating_add(step.saturating_mul(steps))
}

/// Returns `true` if the power-up truck visits during `wave`.
///
/// Every 3rd wave from 3 through 11, every 4th after that.
#[must_use]
pub const fn truck_due(wave: u32) -> bool {
    if wave < 3 {
        false
    } else if wave <= 11 {
        wave % 3 == 0
    } else {
        wave % 4 == 0
    }
}

/// Returns `true` if the polar bear visits during `wave`.
///
/// Every 4th wave from 4 through 20, every 5th after that.
#[must_use]
pub const fn bear_due(wave: u32) -> bool {
    if wave < 4 {
        false
    } else if wave <= 20 {
        wave % 4 == 0
    } else {
        wave % 5 == 0
    }
}

// =============================================================================
// Transitions
// =============================================================================

/// Spawns the current wave number and marks it in progress.
pub fn start_wave(state: &mut SimulationState) {
    let (enemies, large_enemies) = spawn_wave(state);
    state.wave.phase = WavePhase::InProgress;
    state.wave.spawned = enemies + large_enemies;

    let wave = state.wave.number;
    debug!(wave, enemies, large_enemies, "wave spawned");
    state.emit(GameEvent::WaveStarted {
        wave,
        enemies,
        large_enemies,
    });
}

/// Schedules the truck and the bear if the current wave calls for them.
///
/// An entity that is still pending or crossing from an earlier wave is left
/// alone and draws nothing from the RNG.
pub fn schedule_bonuses(state: &mut SimulationState) {
    let wave = state.wave.number;
    let max_delay = state.tuning.bonus.max_spawn_delay;

    for (kind, due) in [
        (BonusKind::PowerupTruck, truck_due(wave)),
        (BonusKind::PolarBear, bear_due(wave)),
    ] {
        if !due || !state.bonus(kind).is_idle() {
            continue;
        }
        let delay = state.rng.gen_range(0..=max_delay);
        let entry = Side::from_coin(state.rng.gen::<bool>());
        state.bonus_mut(kind).schedule(delay, entry);
        debug!(?kind, delay, ?entry, wave, "bonus scheduled");
        state.emit(GameEvent::BonusScheduled { kind, delay });
    }
}

/// Closes out the current wave and opens the next one.
///
/// Stops after the game-over check if every igloo is gone; the next wave is
/// never spawned in that case.
pub fn complete_wave(state: &mut SimulationState) {
    let completed = state.wave.number;
    state.wave.phase = WavePhase::Complete;

    let reward = ammo_reward(completed, state.mode, &state.tuning.scoring);
    for &player in state.mode.players() {
        let progress = state.player_mut(player);
        progress.ammo = progress.ammo.saturating_add(reward);
    }
    info!(wave = completed, ammo_reward = reward, "wave complete");
    state.emit(GameEvent::WaveCompleted {
        wave: completed,
        ammo_reward: reward,
    });

    state.restore_igloo();

    if state.all_defenses_destroyed() {
        state.game_over = true;
        info!(wave = completed, "all igloos destroyed, game over");
        state.emit(GameEvent::GameOver { wave: completed });
        return;
    }

    state.wave.number = completed.saturating_add(1);
    start_wave(state);
    schedule_bonuses(state);
}

// =============================================================================
// Wave Resolver
// =============================================================================

/// Detects wave completion at the end of each tick.
#[derive(Debug, Default)]
pub struct WaveResolver;

impl WaveResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for WaveResolver {
    fn name(&self) -> &'static str {
        "wave"
    }

    fn resolve(&self, state: &mut SimulationState, _input: &TickInput) {
        if state.game_over || state.wave.phase != WavePhase::InProgress {
            return;
        }
        if state.wave.spawned > 0 && state.enemies_remaining() == 0 {
            complete_wave(state);
        }
    }
}
