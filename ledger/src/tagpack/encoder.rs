//! Tag encoding: byte vector recombination, base-14 conversion and symbol
//! substitution.

use std::str::FromStr;

use super::radix::{digits, Radix};
use super::{ByteVector, MAX_TAG_LEN, TAG_ALPHABET};

/// Reasons a byte vector produces no tag.
///
/// None of these are failures of the caller: they mark entries that are
/// skipped when generating tag lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    /// The input did not have exactly eight entries.
    #[error("malformed byte vector: expected 8 entries, got {len}")]
    MalformedByteVector {
        /// Number of entries that were supplied.
        len: usize,
    },

    /// The encoded tag is longer than [`MAX_TAG_LEN`], which means the value
    /// is outside the intended operating range.
    #[error("tag length {len} exceeds the maximum of {MAX_TAG_LEN}")]
    TagLengthExceeded {
        /// Length of the rejected encoding.
        len: usize,
    },

    /// The recombined value was zero, which has no digits.
    #[error("the recombined value is zero and encodes to an empty tag")]
    EmptyTag,

    /// A tag string contained a symbol outside of [`TAG_ALPHABET`].
    #[error("invalid tag symbol {0:?}")]
    InvalidSymbol(char),
}

/// A player tag: a non-empty string of at most [`MAX_TAG_LEN`] symbols drawn
/// from [`TAG_ALPHABET`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(String);

impl Tag {
    /// Gets the tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the number of symbols in the tag.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Consumes the tag, returning the underlying string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Structural validation only: the symbols and the length are checked, the
/// tag is not decoded back to a number.
impl FromStr for Tag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TagError::EmptyTag);
        }
        if let Some(symbol) = s.chars().find(|c| !TAG_ALPHABET.contains(c)) {
            return Err(TagError::InvalidSymbol(symbol));
        }
        if s.len() > MAX_TAG_LEN {
            return Err(TagError::TagLengthExceeded { len: s.len() });
        }
        Ok(Self(s.to_string()))
    }
}

/// Folds one half of a byte vector with `acc = (acc + byte) * 256`, then
/// undoes the trailing multiplication.
fn fold_half(half: &[u8]) -> u64 {
    let acc = half
        .iter()
        .fold(0u64, |acc, &byte| (acc + u64::from(byte)) * 0x100);
    acc / 0x100
}

/// Recombines a byte vector into the single value that gets encoded.
///
/// Computes `low` over entries 0-3 and `high` over entries 4-7, then returns
/// `low + high * 256`. This is not the inverse of [`ByteVector::expand`]:
/// for identifiers below 2^32 the result is the identifier times 256.
///
/// The widest intermediate is `(2^32 - 1) * 256 + (2^32 - 1)`, so `u64`
/// never overflows here.
pub fn recombine(bytes: &ByteVector) -> u64 {
    let low = fold_half(bytes.low_half());
    let high = fold_half(bytes.high_half());
    low + high * 0x100
}

/// Encodes byte vectors into player tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagEncoder;

impl TagEncoder {
    /// Encodes a byte vector into a tag.
    ///
    /// ## Errors
    /// - `EmptyTag` when the recombined value is zero
    /// - `TagLengthExceeded` when the encoding is longer than [`MAX_TAG_LEN`]
    pub fn encode(&self, bytes: &ByteVector) -> Result<Tag, TagError> {
        let total = recombine(bytes);
        let values = digits(total, Radix::BASE14);

        if values.is_empty() {
            return Err(TagError::EmptyTag);
        }
        if values.len() > MAX_TAG_LEN {
            return Err(TagError::TagLengthExceeded { len: values.len() });
        }

        // Base 14 digits are below TAG_ALPHABET.len().
        let tag = values.into_iter().map(|digit| TAG_ALPHABET[digit]).collect();

        Ok(Tag(tag))
    }

    /// Encodes an untyped sequence of byte entries, rejecting any sequence
    /// that doesn't have exactly eight entries.
    pub fn encode_slice(&self, bytes: &[u8]) -> Result<Tag, TagError> {
        let bytes = ByteVector::try_from(bytes)?;
        self.encode(&bytes)
    }

    /// Expands and encodes an identifier in one step.
    pub fn encode_identifier(&self, n: u64) -> Result<Tag, TagError> {
        self.encode(&ByteVector::expand(n))
    }
}
