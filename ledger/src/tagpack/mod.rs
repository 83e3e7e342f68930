//! # TagPack: Player Number to Player Tag Encoding
//!
//! `tagpack` turns a numeric player identifier into the short tag string
//! that players see in game, e.g. `1 -> "2PP"`.
//!
//! ## Usage Example
//!
//! ```
//! use ledger::tagpack::{ByteVector, TagEncoder};
//!
//! let bytes = ByteVector::expand(1000);
//! let tag = TagEncoder.encode(&bytes).unwrap();
//!
//! assert_eq!(tag.as_str(), "LRP2J");
//! ```
//!
//! ## Pipeline
//!
//! * **ByteVector**: fixed 8-entry big-endian expansion of an identifier
//! * **Recombination**: folds the two 4-byte halves into a single value
//! * **Radix**: re-expresses that value in base 14 over hex digits
//! * **Tag**: substitutes each digit through the tag alphabet
//!
//! Every step is pure and independently re-computable from its input. The
//! reverse direction (tag to number) is not provided: the recombination step
//! mixes byte positions and is not known to be injective.

mod bytes;
mod encoder;
mod radix;


pub use bytes::ByteVector;
pub use bytes::BYTE_VECTOR_LEN;

pub use radix::to_base;
pub use radix::Radix;
pub use radix::RadixError;

pub use encoder::recombine;
pub use encoder::Tag;
pub use encoder::TagEncoder;
pub use encoder::TagError;

/// Digit symbols used for the intermediate radix representation.
pub const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Output symbols of a tag. Order matters: the base-14 digit value is used
/// as a direct index into this table.
#[rustfmt::skip]
pub const TAG_ALPHABET: [char; 14] = [
    '0', '2', '8', '9', 'P', 'Y', 'L',
    'Q', 'G', 'R', 'J', 'C', 'U', 'V',
];

/// Maximum number of symbols in an encoded tag. Longer encodings mean the
/// identifier lies outside the intended operating range.
pub const MAX_TAG_LEN: usize = 9;
