//! Score, milestones, power-up timers and the terminal condition.
//!
//! # Milestones
//!
//! Whenever the leading player's score reaches the next threshold, one igloo
//! restoration is queued and the threshold advances: by 5000 below 20000, by
//! 7500 below 50000, and by 10000 from there on. Restorations are consumed at
//! most one per wave transition (see [`crate::wave`]).

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::PlayerId;
use crate::events::{GameEvent, PowerupReward};
use crate::player::TickInput;
use crate::resolver::Resolver;
use crate::state::SimulationState;

// =============================================================================
// Milestones
// =============================================================================

/// Next score threshold and the restorations earned so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MilestoneTracker {
    next_threshold: u32,
    queued: u32,
}

impl MilestoneTracker {
    /// Starts tracking with `first` as the first threshold.
    #[must_use]
    pub const fn new(first: u32) -> Self {
        Self {
            next_threshold: first,
            queued: 0,
        }
    }

    /// Score that queues the next restoration.
    #[must_use]
    pub const fn next_threshold(&self) -> u32 {
        self.next_threshold
    }

    /// Restorations earned but not yet applied.
    #[must_use]
    pub const fn queued(&self) -> u32 {
        self.queued
    }

    /// Distance from `threshold` to the one after it.
    #[must_use]
    pub const fn step_after(threshold: u32) -> u32 {
        if threshold < 20_000 {
            5_000
        } else if threshold < 50_000 {
            7_500
        } else {
            10_000
        }
    }

    /// Queues one restoration per threshold `leading_score` has reached.
    ///
    /// Returns the thresholds crossed, lowest first.
    pub fn record(&mut self, leading_score: u32) -> Vec<u32> {
        let mut crossed = Vec::new();
        while leading_score >= self.next_threshold {
            crossed.push(self.next_threshold);
            self.queued += 1;
            let next = self
                .next_threshold
                .saturating_add(Self::step_after(self.next_threshold));
            if next == self.next_threshold {
                break;
            }
            self.next_threshold = next;
        }
        crossed
    }

    /// Consumes one queued restoration, if any.
    pub fn take_restoration(&mut self) -> bool {
        if self.queued == 0 {
            return false;
        }
        self.queued -= 1;
        true
    }
}

// =============================================================================
// Score and Rewards
// =============================================================================

impl SimulationState {
    /// Credits `points` to `player` and runs the milestone check.
    ///
    /// Players not taking part in the current mode never score.
    pub fn award_points(&mut self, player: PlayerId, points: u32) {
        if points == 0 || !self.mode.includes(player) {
            return;
        }
        let state = self.player_mut(player);
        state.score = state.score.saturating_add(points);
        self.check_milestones();
    }

    /// Queues restorations for any milestone the leading score has reached.
    pub fn check_milestones(&mut self) {
        let leading = self.leading_score();
        for threshold in self.milestones.record(leading) {
            info!(threshold, leading, "score milestone reached");
            self.emit(GameEvent::MilestoneReached { threshold });
        }
    }

    /// Rebuilds the leftmost destroyed igloo if a restoration is queued.
    ///
    /// A queued restoration is kept for later when every igloo is standing.
    pub fn restore_igloo(&mut self) -> Option<usize> {
        if self.milestones.queued() == 0 {
            return None;
        }
        let index = self.igloos.iter().position(|igloo| !igloo.alive)?;
        self.milestones.take_restoration();
        self.igloos[index].alive = true;
        info!(index, "igloo restored");
        self.emit(GameEvent::IglooRestored { index });
        Some(index)
    }

    /// Returns `true` once no igloo is standing.
    #[must_use]
    pub fn all_defenses_destroyed(&self) -> bool {
        self.igloos.iter().all(|igloo| !igloo.alive)
    }

    /// Applies a power-up truck reward to `player`.
    pub fn grant_powerup(&mut self, player: PlayerId, reward: PowerupReward) {
        let powerups = self.tuning.powerups;
        match reward {
            PowerupReward::TripleShot => self
                .player_mut(player)
                .triple_shot
                .restart(powerups.triple_shot_duration),
            PowerupReward::FastShot => self
                .player_mut(player)
                .fast_shot
                .restart(powerups.fast_shot_duration),
            PowerupReward::Megabomb => self.megabombs += 1,
            PowerupReward::Ammo => {
                let shooter = self.player_mut(player);
                shooter.ammo = shooter.ammo.saturating_add(powerups.ammo_bonus);
            }
        }
    }
}

// =============================================================================
// Progress Resolver
// =============================================================================

/// Counts down every player's power-up timers once per tick.
#[derive(Debug, Default)]
pub struct ProgressResolver;

impl ProgressResolver {
    /// Creates the resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Resolver for ProgressResolver {
    fn name(&self) -> &'static str {
        "progress"
    }

    fn resolve(&self, state: &mut SimulationState, _input: &TickInput) {
        for &player in state.mode.players() {
            let progress = state.player_mut(player);
            progress.triple_shot.tick();
            progress.fast_shot.tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GameMode, Tuning};

    fn state(mode: GameMode) -> SimulationState {
        SimulationState::new(3, mode, Tuning::default())
    }

    mod milestone_tests {
        use super::*;

        #[test]
        fn test_threshold_sequence() {
            let mut tracker = MilestoneTracker::new(5_000);
            let mut seen = Vec::new();
            for score in (0..=75_000).step_by(500) {
                tracker.record(score);
                seen.push(tracker.next_threshold());
            }
            seen.dedup();
            assert_eq!(
                seen,
                vec![5_000, 10_000, 15_000, 20_000, 27_500, 35_000, 42_500, 50_000, 60_000, 70_000, 80_000]
            );
            assert_eq!(tracker.queued(), 10);
        }

        #[test]
        fn test_large_jump_queues_each_threshold() {
            let mut tracker = MilestoneTracker::new(5_000);
            assert_eq!(tracker.record(16_000), vec![5_000, 10_000, 15_000]);
            assert_eq!(tracker.queued(), 3);
            assert_eq!(tracker.next_threshold(), 20_000);
        }

        #[test]
        fn test_saturated_threshold_terminates() {
            let mut tracker = MilestoneTracker::new(u32::MAX - 1);
            assert_eq!(tracker.record(u32::MAX).len(), 2);
            assert_eq!(tracker.next_threshold(), u32::MAX);
        }

        #[test]
        fn test_take_restoration() {
            let mut tracker = MilestoneTracker::new(100);
            assert!(!tracker.take_restoration());
            tracker.record(100);
            assert!(tracker.take_restoration());
            assert!(!tracker.take_restoration());
        }
    }

    mod award_tests {
        use super::*;

        #[test]
        fn test_award_triggers_milestone_event() {
            let mut state = state(GameMode::SinglePlayer);
            state.award_points(PlayerId::One, 4_900);
            assert!(state.events().is_empty());
            state.award_points(PlayerId::One, 100);
            assert_eq!(state.milestones.queued(), 1);
            assert_eq!(
                state.events(),
                &[GameEvent::MilestoneReached { threshold: 5_000 }]
            );
        }

        #[test]
        fn test_two_player_milestones_follow_leader() {
            let mut state = state(GameMode::TwoPlayer);
            state.award_points(PlayerId::One, 3_000);
            state.award_points(PlayerId::Two, 3_000);
            assert_eq!(state.milestones.queued(), 0);
            state.award_points(PlayerId::Two, 2_000);
            assert_eq!(state.milestones.queued(), 1);
        }

        #[test]
        fn test_absent_player_never_scores() {
            let mut state = state(GameMode::SinglePlayer);
            state.award_points(PlayerId::Two, 500);
            assert_eq!(state.player(PlayerId::Two).score, 0);
        }
    }

    mod restoration_tests {
        use super::*;

        #[test]
        fn test_restores_leftmost_destroyed_igloo() {
            let mut state = state(GameMode::SinglePlayer);
            state.igloos[1].alive = false;
            state.igloos[3].alive = false;
            state.award_points(PlayerId::One, 10_000);
            assert_eq!(state.milestones.queued(), 2);

            assert_eq!(state.restore_igloo(), Some(1));
            assert_eq!(state.milestones.queued(), 1);
            assert!(state.igloos[1].alive);
        }

        #[test]
        fn test_restoration_kept_when_nothing_to_restore() {
            let mut state = state(GameMode::SinglePlayer);
            state.award_points(PlayerId::One, 5_000);
            assert_eq!(state.restore_igloo(), None);
            assert_eq!(state.milestones.queued(), 1);
        }

        #[test]
        fn test_all_defenses_destroyed() {
            let mut state = state(GameMode::SinglePlayer);
            assert!(!state.all_defenses_destroyed());
            for igloo in &mut state.igloos {
                igloo.alive = false;
            }
            assert!(state.all_defenses_destroyed());
        }
    }

    mod powerup_tests {
        use super::*;

        #[test]
        fn test_grant_and_expire_triple_shot() {
            let mut state = state(GameMode::SinglePlayer);
            state.grant_powerup(PlayerId::One, PowerupReward::TripleShot);
            assert_eq!(state.player(PlayerId::One).triple_shot.remaining(), 600);

            let resolver = ProgressResolver::new();
            for _ in 0..600 {
                resolver.resolve(&mut state, &TickInput::default());
            }
            assert!(!state.player(PlayerId::One).triple_shot.is_running());
        }

        #[test]
        fn test_timers_are_independent() {
            let mut state = state(GameMode::SinglePlayer);
            state.grant_powerup(PlayerId::One, PowerupReward::FastShot);
            ProgressResolver::new().resolve(&mut state, &TickInput::default());
            state.grant_powerup(PlayerId::One, PowerupReward::TripleShot);
            let player = state.player(PlayerId::One);
            assert_eq!(player.fast_shot.remaining(), 599);
            assert_eq!(player.triple_shot.remaining(), 600);
        }

        #[test]
        fn test_ammo_and_megabomb_rewards() {
            let mut state = state(GameMode::SinglePlayer);
            state.grant_powerup(PlayerId::One, PowerupReward::Ammo);
            state.grant_powerup(PlayerId::One, PowerupReward::Megabomb);
            assert_eq!(state.player(PlayerId::One).ammo, 60);
            assert_eq!(state.megabombs, 1);
        }
    }
}
