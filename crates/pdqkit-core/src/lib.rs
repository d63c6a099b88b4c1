//! pdqkit core - PDQ perceptual hashing for images.
//!
//! Turns an image file or an encoded byte buffer into a 64-digit hex PDQ
//! hash plus a quality score.
//!
//! # Architecture
//!
//! ```text
//! Image → Decode → Normalize channels → Perceptual hash → Hex encode → (hash, quality)
//! ```
//!
//! The perceptual hash step sits behind the [`PerceptualHash`] trait, so the
//! PDQ implementation can be swapped for a test double or another backend.
//!
//! # Usage
//!
//! ```rust,no_run
//! let output = pdqkit_core::pdq_from_file("./image.jpg", false)?;
//! println!("{} (quality {})", output.hash, output.quality);
//! # Ok::<(), pdqkit_core::PdqError>(())
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod types;

use std::path::Path;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, DecodeError, HashComputationError, HexError, PdqError, Result};
pub use output::{OutputFormat, OutputWriter};
pub use pipeline::{
    decode_hex, encode_hex, DecodedImage, HashOptions, ImageDecoder, PdqHasher, PdqPipeline,
    PerceptualHash, PixelMode,
};
pub use types::{BitVector, HashOutput, HashRecord, PdqOutput, PixelArray, Quality};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Hash an image file with the PDQ hasher and default limits.
pub fn pdq_from_file(path: impl AsRef<Path>, force_rgb: bool) -> Result<PdqOutput> {
    PdqPipeline::default()
        .options(HashOptions { force_rgb })
        .hash_file(path.as_ref())
}

/// Hash an encoded image held in memory with the PDQ hasher and default limits.
pub fn pdq_from_bytes(bytes: &[u8], force_rgb: bool) -> Result<PdqOutput> {
    PdqPipeline::default()
        .options(HashOptions { force_rgb })
        .hash_bytes(bytes)
}
