//! # Fixpoint
//!
//! Deterministic 16.16 fixed-point arithmetic for frame-stepped simulations.
//!
//! Every spatial quantity in the game core (positions, velocities, gravity,
//! knockback) is carried as a [`Fx`] value: an `i32` where one integer unit is
//! 1/65536 of a pixel. Integer-only math makes the simulation bit-identical
//! across runs and platforms, which floating point cannot promise.
//!
//! ## Architecture
//!
//! - [`Fx`]: the scalar type with saturating arithmetic and explicit
//!   division-by-zero handling
//! - [`isqrt`]: digit-by-digit integer square root used for normalization
//! - [`FxVec2`]: a fixed-point vector that converts to and from pixel-space
//!   [`glam::IVec2`] points
//!
//! ## Usage
//!
//! ```
//! use fixpoint::{Fx, FxVec2};
//! use glam::IVec2;
//!
//! let gravity = Fx::from_ratio(2, 100);
//! let mut velocity = FxVec2::new(Fx::ZERO, Fx::from_ratio(5, 100));
//! velocity.y += gravity;
//!
//! let position = FxVec2::from_pixels(IVec2::new(100, 40)) + velocity;
//! assert_eq!(position.to_pixels(), IVec2::new(100, 40));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod fx;
pub mod sqrt;
pub mod vec;

pub use fx::{Fx, FRAC_BITS};
pub use sqrt::{isqrt, length};
pub use vec::{manhattan, FxVec2};
