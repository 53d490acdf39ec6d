//! Property tests over random seeds and input sequences.

use fixpoint::manhattan;
use glam::IVec2;
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::helpers::*;
use crate::config::{GameMode, Tuning};
use crate::entity::PlayerId;
use crate::events::{Attribution, DetonationCause, GameEvent};
use crate::player::{Aim, PlayerInput, TickInput};
use crate::resolver::apply_blast_wave;
use crate::scoring::MilestoneTracker;
use crate::simulation::Simulation;
use crate::spawn::plan_wave;
use crate::state::SimulationState;

fn arb_input() -> impl Strategy<Value = PlayerInput> {
    (0..320i32, 0..224i32, any::<bool>(), any::<bool>(), 0..20u8).prop_map(
        |(x, y, boost, fire, roll)| PlayerInput {
            aim: Aim::Point(IVec2::new(x, y)),
            boost,
            fire,
            megabomb: roll == 0,
        },
    )
}

fn assert_within_capacity(state: &SimulationState) -> Result<(), TestCaseError> {
    let pools = state.tuning.pools;
    prop_assert!(state.missiles.active_count() <= pools.missiles);
    prop_assert!(state.enemies.active_count() <= pools.enemies);
    prop_assert!(state.large_enemies.active_count() <= pools.large_enemies);
    prop_assert!(state.bombs.active_count() <= pools.bombs);
    prop_assert!(state.explosions.active_count() <= pools.explosions);
    prop_assert_eq!(state.igloos.len(), pools.igloos);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pools_never_exceed_capacity(
        seed in any::<u64>(),
        inputs in prop::collection::vec((arb_input(), arb_input()), 1..300),
    ) {
        let mut tuning = Tuning::default();
        tuning.bomb.drop_chance_per_wave = 300;
        tuning.powerups.starting_megabombs = 3;
        let mut sim = Simulation::with_tuning(seed, GameMode::TwoPlayer, tuning).expect("valid tuning");

        for (one, two) in inputs {
            sim.step(&TickInput::two(one, two));
            assert_within_capacity(sim.state())?;
        }
    }

    #[test]
    fn zero_ammo_never_fires(seed in any::<u64>(), x in 16..304i32, y in 32..170i32) {
        let mut sim = simulation_with(seed, no_drop_tuning());
        sim.state_mut().player_mut(PlayerId::One).ammo = 0;
        sim.take_events();

        sim.step(&TickInput::single(PlayerInput::fire_at(IVec2::new(x, y))));
        prop_assert!(sim.state().missiles.is_empty());
        prop_assert_eq!(sim.state().player(PlayerId::One).ammo, 0);
        let fired = sim
            .take_events()
            .iter()
            .any(|event| matches!(event, GameEvent::MissileFired { .. }));
        prop_assert!(!fired);
    }

    #[test]
    fn bomb_chain_detonates_each_bomb_once(count in 1usize..=20, spacing in 1i32..5, y in 40..150i32) {
        let mut state = SimulationState::new(0, GameMode::SinglePlayer, Tuning::default());
        let origin = IVec2::new(20, y);
        for i in 1..=count {
            let offset = spacing * i32::try_from(i).unwrap_or(0);
            place_bomb(&mut state, origin + IVec2::new(offset, 0));
        }

        let report = apply_blast_wave(&mut state, origin, Attribution::Player(PlayerId::One));
        prop_assert_eq!(report.chained as usize, count);
        prop_assert!(state.bombs.is_empty());
        prop_assert_eq!(state.player(PlayerId::One).score, 0);

        let chained = state
            .events()
            .iter()
            .filter(|event| matches!(event, GameEvent::BombDetonated { cause: DetonationCause::Chain, .. }))
            .count();
        prop_assert_eq!(chained, count);
    }

    #[test]
    fn sparse_waves_keep_minimum_spacing(seed in any::<u64>(), wave in 1u32..=4) {
        // Three or four small enemies across two 40x101 entry strips: with
        // enough draws a clear spot always exists
        let mut tuning = Tuning::default();
        tuning.enemy.placement_attempts = 400;
        let spacing = tuning.enemy.min_spacing;
        let plan = plan_wave(wave, &tuning, &mut ChaCha8Rng::seed_from_u64(seed));
        prop_assert!(plan.spawns.len() >= 3);

        for (i, a) in plan.spawns.iter().enumerate() {
            for b in &plan.spawns[i + 1..] {
                let distance = manhattan(a.position, b.position);
                prop_assert!(
                    distance >= spacing,
                    "{:?} and {:?} only {} apart", a.position, b.position, distance
                );
            }
        }
    }

    #[test]
    fn milestones_follow_threshold_sequence(steps in prop::collection::vec(1u32..4_000, 1..60)) {
        let mut tracker = MilestoneTracker::new(5_000);
        let mut score = 0u32;
        let mut crossed = Vec::new();
        for step in steps {
            score += step;
            crossed.extend(tracker.record(score));
        }

        let mut expected = Vec::new();
        let mut threshold = 5_000u32;
        while threshold <= score {
            expected.push(threshold);
            threshold += MilestoneTracker::step_after(threshold);
        }
        prop_assert_eq!(&crossed, &expected);
        prop_assert_eq!(tracker.queued() as usize, expected.len());
        prop_assert_eq!(tracker.next_threshold(), threshold);
    }
}
