//! Image hashing pipeline components.
//!
//! This module contains the stages of the hashing pipeline:
//! - **decode**: Load and decode images from files or byte buffers
//! - **normalize**: Bring pixel arrays to a hasher-friendly channel layout
//! - **hash**: The perceptual hash seam and the PDQ implementation
//! - **hex**: Hex encoding of hash bit vectors
//! - **processor**: Orchestrates the full pipeline

pub mod decode;
pub mod hash;
pub mod hex;
pub mod normalize;
pub mod processor;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder, PixelMode, RawPixels};
pub use hash::{invoke, PdqHasher, PerceptualHash};
pub use hex::{decode_hex, encode_hex, hex_len};
pub use normalize::normalize;
pub use processor::{HashOptions, PdqPipeline};
