//! The 16.16 fixed-point scalar.
//!
//! # Dynamic Range
//!
//! The integer part spans `[-32768, 32767]`, comfortably more than the two to
//! three screen widths a simulation ever needs. Every operation widens to
//! `i64` internally and saturates back into `i32`, so overflow can only clamp,
//! never wrap or panic.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Number of fractional bits in an [`Fx`] value.
pub const FRAC_BITS: u32 = 16;

/// Clamps a widened intermediate back into the `i32` range.
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn saturate(value: i64) -> i32 {
    if value > i32::MAX as i64 {
        i32::MAX
    } else if value < i32::MIN as i64 {
        i32::MIN
    } else {
        value as i32
    }
}

// =============================================================================
// Fx
// =============================================================================

/// A signed 16.16 fixed-point number.
///
/// Serialized as its raw `i32` representation.
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fx(i32);

impl Fx {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One whole unit (one pixel).
    pub const ONE: Self = Self(1 << FRAC_BITS);

    /// Largest representable value.
    pub const MAX: Self = Self(i32::MAX);

    /// Smallest representable value.
    pub const MIN: Self = Self(i32::MIN);

    /// Wraps a raw 16.16 bit pattern.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw 16.16 bit pattern.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Converts a whole number, saturating outside the representable range.
    #[must_use]
    pub const fn from_int(value: i32) -> Self {
        Self(saturate((value as i64) << FRAC_BITS))
    }

    /// Builds the value `num / den`, truncated toward zero.
    ///
    /// Intended for constants: `Fx::from_ratio(3, 10)` is `0.3`.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero. In a `const` context this is a compile error.
    #[must_use]
    pub const fn from_ratio(num: i32, den: i32) -> Self {
        assert!(den != 0, "fixed-point ratio with zero denominator");
        Self(saturate(((num as i64) << FRAC_BITS) / den as i64))
    }

    /// Whole-pixel part, rounded toward negative infinity.
    ///
    /// This is an arithmetic shift, so `-0.5` maps to `-1`.
    #[must_use]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    /// Absolute value, saturating `MIN` to `MAX`.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Saturating addition.
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }

    /// Multiplies by a whole number.
    #[must_use]
    pub const fn mul_int(self, factor: i32) -> Self {
        Self(saturate(self.0 as i64 * factor as i64))
    }

    /// Divides by a whole number, truncating toward zero.
    ///
    /// Returns `None` when `divisor` is zero.
    #[must_use]
    pub const fn div_int(self, divisor: i32) -> Option<Self> {
        if divisor == 0 {
            return None;
        }
        Some(Self(saturate(self.0 as i64 / divisor as i64)))
    }

    /// Fixed-point division.
    ///
    /// Returns `None` when `rhs` is zero.
    #[must_use]
    pub const fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.0 == 0 {
            return None;
        }
        Some(Self(saturate(((self.0 as i64) << FRAC_BITS) / rhs.0 as i64)))
    }

    /// Scales by `percent / 100`, truncating toward zero.
    ///
    /// # Example
    ///
    /// ```
    /// use fixpoint::Fx;
    ///
    /// let base = Fx::from_int(2);
    /// assert_eq!(base.scale_percent(-50), Fx::from_int(-1));
    /// ```
    #[must_use]
    pub const fn scale_percent(self, percent: i32) -> Self {
        Self(saturate(self.0 as i64 * percent as i64 / 100))
    }
}

impl Add for Fx {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Fx {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Fx {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.saturating_sub(rhs)
    }
}

impl SubAssign for Fx {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Neg for Fx {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Mul for Fx {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(saturate(
            (i64::from(self.0) * i64::from(rhs.0)) >> FRAC_BITS,
        ))
    }
}

impl fmt::Debug for Fx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fx({self})")
    }
}

impl fmt::Display for Fx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = f64::from(self.0) / f64::from(1_i32 << FRAC_BITS);
        write!(f, "{value:.4}")
    }
}

impl From<i32> for Fx {
    fn from(value: i32) -> Self {
        Self::from_int(value)
    }
}
