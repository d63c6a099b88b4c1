//! Core data types for the pdqkit hashing pipeline.
//!
//! These types flow between the pipeline stages: pixel arrays go into the
//! hash collaborator, bit vectors and quality scores come out, and the hex
//! encoder turns them into a [`PdqOutput`].

use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// Pixel samples laid out as `(height, width, channels)`.
pub type PixelArray = Array3<u8>;

/// Confidence score reported alongside a hash, passed through unmodified.
pub type Quality = u32;

/// Number of bits in a PDQ hash.
pub const PDQ_HASH_BITS: usize = 256;

/// An ordered, fixed-length sequence of hash bits.
///
/// Index 0 is the most significant bit when the vector is read as a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct BitVector(Vec<bool>);

impl BitVector {
    /// Wrap a sequence of bits.
    pub fn new(bits: Vec<bool>) -> Self {
        Self(bits)
    }

    /// A vector of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Self(vec![false; len])
    }

    /// Unpack bytes into bits, most significant bit of each byte first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        bytes
            .iter()
            .flat_map(|&byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
            .collect()
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl FromIterator<bool> for BitVector {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<bool>> for BitVector {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

/// What the hash collaborator hands back for one pixel array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashOutput {
    /// The raw hash bits
    pub bits: BitVector,
    /// The collaborator's confidence in the hash
    pub quality: Quality,
}

/// Final result of hashing one image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PdqOutput {
    /// Lowercase hex, `ceil(bits / 4)` digits
    pub hash: String,

    /// Quality score from the hash collaborator
    pub quality: Quality,
}

impl PdqOutput {
    /// Split into the `(hash, quality)` pair.
    pub fn into_pair(self) -> (String, Quality) {
        (self.hash, self.quality)
    }
}

/// A hash result labelled with where the image came from, for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashRecord {
    /// Lowercase hex hash
    pub hash: String,

    /// Quality score
    pub quality: Quality,

    /// File path, or `-` for stdin
    pub source: String,
}

impl HashRecord {
    pub fn new(output: PdqOutput, source: impl Into<String>) -> Self {
        Self {
            hash: output.hash,
            quality: output.quality,
            source: source.into(),
        }
    }
}
