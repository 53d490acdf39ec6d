//! Integer square root.

/// Floor of the square root of `value`, computed digit by digit.
///
/// Works two bits at a time from the highest power of four that fits, using
/// only shifts, additions and comparisons.
///
/// # Example
///
/// ```
/// use fixpoint::isqrt;
///
/// assert_eq!(isqrt(0), 0);
/// assert_eq!(isqrt(99), 9);
/// assert_eq!(isqrt(100), 10);
/// ```
#[must_use]
pub fn isqrt(value: u32) -> u32 {
    let mut remainder = value;
    let mut root = 0_u32;
    let mut bit = 1_u32 << 30;

    while bit > remainder {
        bit >>= 2;
    }

    while bit != 0 {
        if remainder >= root + bit {
            remainder -= root + bit;
            root = (root >> 1) + bit;
        } else {
            root >>= 1;
        }
        bit >>= 2;
    }

    root
}

/// Euclidean length of a pixel offset, floored.
///
/// Squared lengths beyond `u32` saturate, which only happens for offsets far
/// outside any playfield.
#[must_use]
pub fn length(dx: i32, dy: i32) -> u32 {
    let dx = u64::from(dx.unsigned_abs());
    let dy = u64::from(dy.unsigned_abs());
    let squared = u32::try_from(dx * dx + dy * dy).unwrap_or(u32::MAX);
    isqrt(squared)
}
