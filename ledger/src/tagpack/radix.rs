//! Base conversion over the hex digit set.

use super::HEX_DIGITS;

/// Errors that can occur when constructing a [`Radix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RadixError {
    /// The digit set only covers bases 2 through 16.
    #[error("base {0} is out of range; must be between 2 and 16")]
    OutOfRange(u32),
}

/// A numeric base supported by the hex digit set, between 2 and 16
/// inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Radix(u32);

impl Radix {
    /// The base used when encoding tags.
    pub const BASE14: Radix = Radix(14);

    /// Smallest supported base.
    pub const MIN: u32 = 2;

    /// Largest supported base, bounded by the size of [`HEX_DIGITS`].
    pub const MAX: u32 = 16;

    /// Creates a radix, rejecting bases the digit set can't express.
    pub fn new(base: u32) -> Result<Self, RadixError> {
        if !(Self::MIN..=Self::MAX).contains(&base) {
            return Err(RadixError::OutOfRange(base));
        }
        Ok(Self(base))
    }

    /// Returns the numeric base.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Radix {
    type Error = RadixError;

    fn try_from(base: u32) -> Result<Self, Self::Error> {
        Self::new(base)
    }
}

/// Splits `n` into its digit values in the given base, most significant
/// first. Every value is below `radix.get()`.
///
/// Remainders are pushed onto a stack and popped back off, so the result
/// reads top-to-bottom. Zero has no digits.
pub fn digits(n: u64, radix: Radix) -> Vec<usize> {
    let base = u64::from(radix.get());
    let mut remainders = Vec::new();
    let mut value = n;

    while value > 0 {
        remainders.push((value % base) as usize);
        value /= base;
    }

    remainders.reverse();
    remainders
}

/// Writes `n` in the given base using [`HEX_DIGITS`].
///
/// Zero has no digits and yields an empty string; callers that need a
/// `"0"` must special-case it.
pub fn to_base(n: u64, radix: Radix) -> String {
    digits(n, radix)
        .into_iter()
        .map(|digit| char::from(HEX_DIGITS[digit]))
        .collect()
}
