//! # Snowball Core
//!
//! Deterministic frame-stepped simulation core for Snowball Defense.
//!
//! Enemies cross the sky and drop bombs on a row of igloos; players aim
//! crosshairs and fire missiles from two ground cannons. Shot bombs explode
//! in blast waves that chain through nearby bombs, knock others away and
//! damage enemies. Clearing a wave pays out ammo and brings a harder one.
//!
//! ## Architecture
//!
//! - **State**: one [`SimulationState`] holding fixed-capacity pools
//!   ([`arena::Pool`]), per-player progress and the seeded RNG
//! - **Resolvers**: the ordered phases of a tick (input, physics, collision,
//!   wave, progress), each mutating the state in place
//! - **Outputs**: a drained [`events::GameEvent`] log and read-only
//!   [`snapshot::WorldSnapshot`]s for the presentation layer
//!
//! All arithmetic on positions and velocities is 16.16 fixed point from the
//! [`fixpoint`] crate, so runs are bit-identical across platforms.
//!
//! ## Usage
//!
//! ```
//! use snowball_core::config::GameMode;
//! use snowball_core::player::TickInput;
//! use snowball_core::Simulation;
//!
//! let mut sim = Simulation::new(7, GameMode::SinglePlayer);
//! for _ in 0..60 {
//!     sim.step(&TickInput::default());
//! }
//! let snapshot = sim.snapshot();
//! assert_eq!(snapshot.tick, 60);
//! assert_eq!(snapshot.hud.wave, 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use fixpoint;

pub mod arena;
pub mod config;
pub mod entity;
pub mod events;
pub mod hash;
pub mod player;
pub mod resolver;
pub mod scoring;
pub mod simulation;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod wave;

pub use config::{GameMode, Tuning, TuningError};
pub use events::GameEvent;
pub use player::{PlayerInput, TickInput};
pub use simulation::Simulation;
pub use snapshot::WorldSnapshot;
pub use state::SimulationState;

#[cfg(test)]
mod tests;
