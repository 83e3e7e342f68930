//! Fixed-width base-256 expansion of player identifiers.

use super::TagError;

/// Number of entries in a [`ByteVector`].
pub const BYTE_VECTOR_LEN: usize = 8;

/// The big-endian, fixed-width byte expansion of an identifier.
///
/// Index 0 holds the most significant base-256 digit. The vector always has
/// exactly [`BYTE_VECTOR_LEN`] entries and every entry is a byte, so both
/// structural invariants hold by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ByteVector([u8; BYTE_VECTOR_LEN]);

impl ByteVector {
    /// Expands `n` into its base-256 digits, most significant first.
    ///
    /// The value is reduced by repeated division by 256, filling the vector
    /// from the last slot backward until the value is exhausted. Unfilled
    /// leading slots stay zero. A `u64` never needs more than eight base-256
    /// digits, so no digit is ever dropped.
    pub fn expand(n: u64) -> Self {
        let mut bytes = [0u8; BYTE_VECTOR_LEN];
        let mut value = n;

        for slot in bytes.iter_mut().rev() {
            if value == 0 {
                break;
            }
            *slot = (value % 256) as u8;
            value /= 256;
        }

        Self(bytes)
    }

    /// Reads the entries back as a big-endian base-256 number.
    pub fn to_identifier(&self) -> u64 {
        self.0
            .iter()
            .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte))
    }

    /// Entries 0-3, folded into the `low` term of the recombination.
    pub fn low_half(&self) -> &[u8] {
        &self.0[..BYTE_VECTOR_LEN / 2]
    }

    /// Entries 4-7, folded into the `high` term of the recombination.
    pub fn high_half(&self) -> &[u8] {
        &self.0[BYTE_VECTOR_LEN / 2..]
    }

    /// Gets the entries as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; BYTE_VECTOR_LEN]> for ByteVector {
    fn from(bytes: [u8; BYTE_VECTOR_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for ByteVector {
    type Error = TagError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; BYTE_VECTOR_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| TagError::MalformedByteVector { len: bytes.len() })
    }
}

/// Comma separated entries: `ByteVector(0, 0, 0, 0, 0, 0, 3, 232)`.
impl std::fmt::Display for ByteVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ByteVector(")?;
        for (i, byte) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", byte)?;
        }
        write!(f, ")")
    }
}
