use thiserror::Error;

/// All the ways a canonical string can fail to decode into a [`TsId`].
///
/// Decoding is the only fallible operation in this crate: packing masks
/// out-of-range inputs instead of rejecting them, and generation always
/// succeeds.
///
/// [`TsId`]: crate::TsId
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The input was not exactly [`ENCODED_LEN`] characters long.
    ///
    /// [`ENCODED_LEN`]: crate::ENCODED_LEN
    #[error("invalid encoded length: {len} (expected 13)")]
    InvalidLength { len: usize },

    /// The input contained a byte outside the Crockford Base32 alphabet.
    #[error("invalid base32 byte {byte:#04x} at index {index}")]
    InvalidChar { byte: u8, index: usize },

    /// The decoded value does not fit in 64 bits.
    ///
    /// A 13-character Crockford string carries 65 bits, so the first
    /// character must decode below 16 (`0`..=`F`).
    #[error("decoded value overflows 64 bits")]
    Overflow,
}
