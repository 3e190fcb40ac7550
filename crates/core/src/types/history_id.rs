//! History document identifier.

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when parsing a [`HistoryId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum HistoryIdError {
    /// The input is not exactly 24 characters long.
    #[error("history id must be {expected} hex characters, got {len}")]
    InvalidLength {
        /// Expected number of characters.
        expected: usize,
        /// Actual number of characters.
        len: usize,
    },
    /// The input contains a non-hexadecimal character.
    #[error("history id is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Identifier of a history document in the external document store.
///
/// The store uses 12-byte object ids, written as 24 hexadecimal characters.
/// The first four bytes hold the creation time in seconds since the Unix
/// epoch (big-endian).
///
/// ## Examples
///
/// ```
/// use session_identity_core::HistoryId;
///
/// let id = HistoryId::parse("64f1a2b3c4d5e6f708192a3b").unwrap();
/// assert_eq!(id.to_string(), "64f1a2b3c4d5e6f708192a3b");
///
/// assert!(HistoryId::parse("").is_err());
/// assert!(HistoryId::parse("not-an-object-id-at-all!").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HistoryId([u8; 12]);

impl HistoryId {
    /// Length of the identifier in bytes.
    pub const BYTE_LENGTH: usize = 12;

    /// Length of the textual (hex) form.
    pub const HEX_LENGTH: usize = Self::BYTE_LENGTH * 2;

    /// Create an id from its raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Parse a `HistoryId` from its 24-character hex form.
    ///
    /// Upper- and lowercase hex digits are both accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly 24 characters or
    /// contains a non-hex character.
    pub fn parse(s: &str) -> Result<Self, HistoryIdError> {
        if s.len() != Self::HEX_LENGTH {
            return Err(HistoryIdError::InvalidLength {
                expected: Self::HEX_LENGTH,
                len: s.len(),
            });
        }

        let mut bytes = [0u8; 12];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Returns the creation time embedded in the id, in seconds since the Unix epoch.
    #[must_use]
    pub const fn timestamp_secs(&self) -> u32 {
        let [a, b, c, d, ..] = self.0;
        u32::from_be_bytes([a, b, c, d])
    }

    /// Returns the lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for HistoryId {
    type Err = HistoryIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<[u8; 12]> for HistoryId {
    fn from(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }
}

impl Serialize for HistoryId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HistoryId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
