use crate::{
    DecodeError,
    base32::{decode_u64, encode_u64},
    generator::default_generator,
    time::DEFAULT_EPOCH,
};
use core::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A compact, time-sortable 64-bit identifier
///
/// - 42 bits timestamp (ms since the generator's epoch)
/// - 6 bits node ID
/// - 16 bits counter
///
/// ```text
///  Bit Index:  63             22 21           16 15            0
///              +----------------+---------------+--------------+
///  Field:      | timestamp (42) |  node ID (6)  | counter (16) |
///              +----------------+---------------+--------------+
///              |<---- MSB --------- 64 bits -------- LSB ----->|
/// ```
///
/// The packed `u64` is the sole state; every field is derived by shifting
/// and masking. Because the timestamp occupies the most significant bits,
/// numeric order matches chronological order whenever timestamps differ,
/// with ties falling through to node ID and then counter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TsId {
    id: u64,
}

impl TsId {
    /// Width of the timestamp field in bits.
    pub const TIMESTAMP_BITS: u8 = 42;

    /// Width of the node ID field in bits.
    pub const NODE_ID_BITS: u8 = 6;

    /// Width of the counter field in bits.
    pub const COUNTER_BITS: u8 = 16;

    /// Bitmask for the 42-bit timestamp field. Occupies bits 22 through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 6-bit node ID field. Occupies bits 16 through 21.
    pub const NODE_ID_MASK: u64 = (1 << Self::NODE_ID_BITS) - 1;

    /// Bitmask for the 16-bit counter field. Occupies bits 0 through 15.
    pub const COUNTER_MASK: u64 = (1 << Self::COUNTER_BITS) - 1;

    /// Number of bits to shift the timestamp to its position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = (Self::NODE_ID_BITS + Self::COUNTER_BITS) as u64;

    /// Number of bits to shift the node ID to its position (bit 16).
    pub const NODE_ID_SHIFT: u64 = Self::COUNTER_BITS as u64;

    /// Packs a timestamp, node ID and counter into an ID.
    ///
    /// Out-of-range inputs are **masked, never rejected**: the timestamp
    /// keeps its low 42 bits and the node ID its low 6 bits. This silent
    /// truncation is a deliberate compatibility choice, not an oversight.
    ///
    /// # Example
    /// ```
    /// use tsid::TsId;
    ///
    /// let id = TsId::from_parts(5000, 7, 1);
    /// assert_eq!(id.to_raw(), (5000 << 6 | 7) << 16 | 1);
    /// assert_eq!(id.to_raw(), 20_971_978_753);
    /// ```
    pub const fn from_parts(timestamp_ms: u64, node_id: u8, counter: u16) -> Self {
        let timestamp = (timestamp_ms & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let node_id = (node_id as u64 & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        Self {
            id: timestamp | node_id | counter as u64,
        }
    }

    /// Wraps an arbitrary raw value verbatim, without validation.
    ///
    /// This is the deserialization path: the persisted form of an ID is
    /// its raw `u64` and nothing else.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the packed raw value, for storage or serialization.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp field: milliseconds since the producing
    /// generator's epoch.
    pub const fn timestamp(&self) -> u64 {
        self.id >> Self::TIMESTAMP_SHIFT
    }

    /// Extracts the node ID field.
    pub const fn node_id(&self) -> u8 {
        ((self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK) as u8
    }

    /// Extracts the counter field.
    pub const fn counter(&self) -> u16 {
        (self.id & Self::COUNTER_MASK) as u16
    }

    /// The instant this ID was created, given the epoch it was generated
    /// against (as a [`Duration`] since the Unix epoch).
    pub fn created_at(&self, epoch: Duration) -> SystemTime {
        UNIX_EPOCH + epoch + Duration::from_millis(self.timestamp())
    }

    /// The instant this ID was created, assuming the default epoch
    /// (2020-01-01T00:00:00Z).
    pub fn default_created_at(&self) -> SystemTime {
        self.created_at(DEFAULT_EPOCH)
    }

    /// Mints a new ID from the process-wide default generator.
    ///
    /// The default generator is lazily constructed exactly once, with a
    /// node ID derived from the machine name and the default epoch. See
    /// [`default_generator`].
    pub fn generate() -> Self {
        default_generator().next_id()
    }

    /// Returns the canonical string form: fixed-width, uppercase Crockford
    /// base32 of the raw value.
    ///
    /// The output is always [`ENCODED_LEN`] characters; leading zeros are
    /// preserved so that encoded strings sort the same way as raw values.
    ///
    /// # Example
    /// ```
    /// use tsid::TsId;
    ///
    /// let id = TsId::from_raw(2_424_242_424_242_424_242);
    /// assert_eq!(id.encode(), "23953MG16DJDJ");
    /// assert_eq!(TsId::from_raw(0).encode(), "0000000000000");
    /// ```
    ///
    /// [`ENCODED_LEN`]: crate::ENCODED_LEN
    pub fn encode(&self) -> String {
        let buf = encode_u64(self.id);
        // The alphabet is pure ASCII, so the buffer is always valid UTF-8.
        buf.iter().map(|&b| b as char).collect()
    }

    /// Decodes a canonical string back into an ID.
    ///
    /// Decoding is case-insensitive and accepts the Crockford aliases
    /// (`O`/`o` for `0`, `I`/`i`/`L`/`l` for `1`).
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input is not exactly 13 characters,
    /// contains a byte outside the Crockford alphabet, or decodes to a
    /// value wider than 64 bits.
    ///
    /// # Example
    /// ```
    /// use tsid::TsId;
    ///
    /// let id = TsId::decode("23953MG16DJDJ").unwrap();
    /// assert_eq!(id.to_raw(), 2_424_242_424_242_424_242);
    /// ```
    pub fn decode(s: impl AsRef<str>) -> Result<Self, DecodeError> {
        decode_u64(s.as_ref()).map(Self::from_raw)
    }
}

impl fmt::Display for TsId {
    /// Renders the canonical Crockford base32 encoding.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let buf = encode_u64(self.id);
        for &b in &buf {
            write!(f, "{}", b as char)?;
        }
        Ok(())
    }
}

impl fmt::Debug for TsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TsId")
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("counter", &self.counter())
            .field("raw", &self.id)
            .finish()
    }
}
