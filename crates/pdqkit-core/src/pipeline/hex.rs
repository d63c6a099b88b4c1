//! Hex encoding of hash bit vectors.
//!
//! The bit vector is read as one big-endian binary number and printed with
//! exactly `ceil(n / 4)` lowercase hex digits, zero-padded on the left. When
//! `n` is not a multiple of 4 the padding bits sit above the first bit.

use crate::error::HexError;
use crate::types::BitVector;

const BITS_PER_DIGIT: usize = 4;

/// Number of hex digits needed for `bits` bits.
pub fn hex_len(bits: usize) -> usize {
    bits.div_ceil(BITS_PER_DIGIT)
}

/// Encode bits as a zero-padded lowercase hex string.
pub fn encode_hex(bits: &BitVector) -> String {
    let digits = hex_len(bits.len());
    let pad = digits * BITS_PER_DIGIT - bits.len();

    let mut out = String::with_capacity(digits);
    let mut nibble = 0u32;
    for (i, bit) in std::iter::repeat(false)
        .take(pad)
        .chain(bits.iter())
        .enumerate()
    {
        nibble = (nibble << 1) | u32::from(bit);
        if i % BITS_PER_DIGIT == BITS_PER_DIGIT - 1 {
            // nibble < 16, so from_digit always succeeds
            out.extend(char::from_digit(nibble, 16));
            nibble = 0;
        }
    }
    out
}

/// Decode a hex string back into exactly `bits` bits.
///
/// Accepts either letter case. The string must have `ceil(bits / 4)` digits
/// and any padding bits above the first bit must be zero.
pub fn decode_hex(hex: &str, bits: usize) -> Result<BitVector, HexError> {
    let expected = hex_len(bits);
    let actual = hex.chars().count();
    if actual != expected {
        return Err(HexError::Length {
            bits,
            expected,
            actual,
        });
    }

    let mut padded = Vec::with_capacity(expected * BITS_PER_DIGIT);
    for (position, character) in hex.chars().enumerate() {
        let value = character
            .to_digit(16)
            .ok_or(HexError::InvalidCharacter {
                character,
                position,
            })?;
        padded.extend((0..BITS_PER_DIGIT).rev().map(|shift| (value >> shift) & 1 == 1));
    }

    let pad = padded.len() - bits;
    if padded[..pad].iter().any(|&b| b) {
        return Err(HexError::Overflow { bits });
    }
    Ok(padded.split_off(pad).into())
}
