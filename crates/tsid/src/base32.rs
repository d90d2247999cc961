use crate::DecodeError;

/// Crockford Base32 alphabet. Excludes `I`, `L`, `O` and `U` to avoid
/// visually ambiguous output.
const ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: usize = 5;

/// Fixed width of the canonical encoding of a 64-bit value: `ceil(64 / 5)`.
///
/// The 65th bit of the character stream is always zero, so the first
/// character of a canonical string is in `0`..=`F`.
pub const ENCODED_LEN: usize = 13;

/// Lookup table for Crockford base32 decoding.
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    // Main alphabet, allow lower-case
    while i < 32 {
        let c = ALPHABET[i as usize];
        lut[c as usize] = i;
        if c.is_ascii_uppercase() {
            lut[(c + 32) as usize] = i; // lowercase letter
        }
        i += 1;
    }
    // Crockford-specific aliases
    lut[b'O' as usize] = 0;
    lut[b'o' as usize] = 0;
    lut[b'I' as usize] = 1;
    lut[b'i' as usize] = 1;
    lut[b'L' as usize] = 1;
    lut[b'l' as usize] = 1;
    lut
};

/// Encodes a 64-bit value as fixed-width, uppercase Crockford base32.
///
/// Leading zero bits are encoded rather than trimmed, so the output is
/// always [`ENCODED_LEN`] bytes and lexicographic order over encoded
/// strings matches numeric order over the raw values.
pub(crate) fn encode_u64(value: u64) -> [u8; ENCODED_LEN] {
    let mut buf = [0_u8; ENCODED_LEN];
    for (i, slot) in buf.iter_mut().enumerate() {
        // The first shift is 60, which leaves only the top 4 bits: the
        // implicit 65th bit is zero.
        let shift = BITS_PER_CHAR * (ENCODED_LEN - 1 - i);
        *slot = ALPHABET[(value >> shift) as usize & 0x1F];
    }
    buf
}

/// Decodes a fixed-width Crockford base32 string back into a 64-bit value.
///
/// Decoding is case-insensitive and accepts the Crockford aliases
/// (`O`/`o` for `0`, `I`/`i`/`L`/`l` for `1`).
///
/// # Errors
///
/// - [`DecodeError::InvalidLength`] if the input is not exactly
///   [`ENCODED_LEN`] characters
/// - [`DecodeError::InvalidChar`] if a byte is outside the alphabet
/// - [`DecodeError::Overflow`] if the 65-bit character stream carries a
///   value wider than 64 bits
pub(crate) fn decode_u64(encoded: &str) -> Result<u64, DecodeError> {
    let bytes = encoded.as_bytes();
    if bytes.len() != ENCODED_LEN {
        return Err(DecodeError::InvalidLength { len: bytes.len() });
    }

    let mut acc = 0_u128;
    for (i, &b) in bytes.iter().enumerate() {
        let val = LOOKUP[b as usize];
        if val == NO_VALUE {
            return Err(DecodeError::InvalidChar { byte: b, index: i });
        }
        acc = (acc << BITS_PER_CHAR) | u128::from(val);
    }

    u64::try_from(acc).map_err(|_| DecodeError::Overflow)
}
