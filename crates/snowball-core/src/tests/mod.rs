//! Crate-level tests that drive the whole tick loop.
//!
//! # Test Structure
//!
//! - `determinism.rs`: same seed and input sequence, same states and events
//! - `integration.rs`: end-to-end scenarios through [`crate::Simulation`]
//! - `properties.rs`: property tests over random seeds and inputs
//! - `helpers.rs`: tuning presets and entity placement

mod helpers;
mod properties;

pub use helpers::*;
