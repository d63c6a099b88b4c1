//! Pipeline orchestration - wires together the hashing stages.

use std::path::Path;
use std::time::Instant;

use crate::config::Config;
use crate::error::Result;
use crate::types::PdqOutput;

use super::decode::{DecodedImage, ImageDecoder};
use super::hash::{invoke, PdqHasher, PerceptualHash};
use super::hex::encode_hex;
use super::normalize::normalize;

/// Options for controlling hashing behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct HashOptions {
    /// Convert every image to RGB before hashing
    pub force_rgb: bool,
}

/// The hashing pipeline: decode, normalize, hash, hex-encode.
///
/// Holds no per-call state, so one instance can serve many threads as long
/// as the hash collaborator can.
pub struct PdqPipeline<H = PdqHasher> {
    decoder: ImageDecoder,
    hasher: H,
    options: HashOptions,
}

impl PdqPipeline<PdqHasher> {
    /// Create a pipeline using the PDQ hasher and the given configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_hasher(config, PdqHasher)
    }
}

impl Default for PdqPipeline<PdqHasher> {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl<H: PerceptualHash> PdqPipeline<H> {
    /// Create a pipeline around a custom hash collaborator.
    pub fn with_hasher(config: &Config, hasher: H) -> Self {
        Self {
            decoder: ImageDecoder::new(config.limits.clone()),
            hasher,
            options: HashOptions {
                force_rgb: config.hashing.force_rgb,
            },
        }
    }

    /// Override the options taken from the configuration.
    pub fn options(mut self, options: HashOptions) -> Self {
        self.options = options;
        self
    }

    /// The options this pipeline hashes with.
    pub fn hash_options(&self) -> HashOptions {
        self.options
    }

    /// Hash an image file.
    pub fn hash_file(&self, path: &Path) -> Result<PdqOutput> {
        let start = Instant::now();
        tracing::debug!("Hashing: {:?}", path);

        let decoded = self.decoder.decode_path(path)?;
        tracing::trace!("  Decode: {:?}", start.elapsed());

        let output = self.hash_image(&decoded)?;
        tracing::debug!(
            "Hashed {:?} in {:?} ({}x{}, quality {})",
            path,
            start.elapsed(),
            decoded.width,
            decoded.height,
            output.quality
        );
        Ok(output)
    }

    /// Hash an encoded image held in memory.
    pub fn hash_bytes(&self, bytes: &[u8]) -> Result<PdqOutput> {
        let start = Instant::now();
        tracing::debug!("Hashing {} byte buffer", bytes.len());

        let decoded = self.decoder.decode_bytes(bytes)?;
        tracing::trace!("  Decode: {:?}", start.elapsed());

        let output = self.hash_image(&decoded)?;
        tracing::debug!(
            "Hashed buffer in {:?} ({}x{}, quality {})",
            start.elapsed(),
            decoded.width,
            decoded.height,
            output.quality
        );
        Ok(output)
    }

    /// Hash an image that has already been decoded.
    pub fn hash_image(&self, image: &DecodedImage) -> Result<PdqOutput> {
        let normalize_start = Instant::now();
        let pixels = normalize(image, self.options.force_rgb)?;
        tracing::trace!(
            "  Normalize: {:?} -> {:?}",
            normalize_start.elapsed(),
            pixels.dim()
        );

        let hash_start = Instant::now();
        let output = invoke(&self.hasher, &pixels)?;
        tracing::trace!("  Hash: {:?}", hash_start.elapsed());

        Ok(PdqOutput {
            hash: encode_hex(&output.bits),
            quality: output.quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HashComputationError, PdqError};
    use crate::types::{HashOutput, PixelArray};
    use image::{DynamicImage, GrayImage};

    fn fixed_bits(pattern: &'static str, quality: u32) -> impl PerceptualHash {
        move |_: &PixelArray| -> std::result::Result<HashOutput, HashComputationError> {
            Ok(HashOutput {
                bits: pattern.chars().map(|c| c == '1').collect(),
                quality,
            })
        }
    }

    #[test]
    fn test_hash_options_default() {
        let options = HashOptions::default();
        assert!(!options.force_rgb);
    }

    #[test]
    fn test_force_rgb_read_from_config() {
        let mut config = Config::default();
        config.hashing.force_rgb = true;
        assert!(PdqPipeline::new(&config).hash_options().force_rgb);
    }

    #[test]
    fn test_four_bit_stub_encodes_to_single_digit() {
        let pipeline = PdqPipeline::with_hasher(&Config::default(), fixed_bits("1010", 42));
        let image = DecodedImage::new(DynamicImage::ImageLuma8(GrayImage::new(2, 2)));
        let output = pipeline.hash_image(&image).unwrap();
        assert_eq!(output.into_pair(), ("a".to_string(), 42));
    }

    #[test]
    fn test_eight_bit_stub_keeps_leading_zero() {
        let pipeline = PdqPipeline::with_hasher(&Config::default(), fixed_bits("00000001", 5));
        let image = DecodedImage::new(DynamicImage::ImageLuma8(GrayImage::new(2, 2)));
        assert_eq!(pipeline.hash_image(&image).unwrap().hash, "01");
    }

    #[test]
    fn test_hash_error_propagates() {
        let failing = |_: &PixelArray| -> std::result::Result<HashOutput, HashComputationError> {
            Err(HashComputationError::UnsupportedChannels { channels: 3 })
        };
        let pipeline = PdqPipeline::with_hasher(&Config::default(), failing);
        let image = DecodedImage::new(DynamicImage::ImageLuma8(GrayImage::new(2, 2)));
        let err = pipeline.hash_image(&image).unwrap_err();
        assert!(matches!(
            err,
            PdqError::Hash(HashComputationError::UnsupportedChannels { channels: 3 })
        ));
    }

    #[test]
    fn test_default_pipeline_hashes_to_64_digits() {
        let image = DecodedImage::new(DynamicImage::ImageLuma8(GrayImage::from_fn(
            32,
            32,
            |x, y| image::Luma([((x ^ y) * 8) as u8]),
        )));
        let output = PdqPipeline::default().hash_image(&image).unwrap();
        assert_eq!(output.hash.len(), 64);
        assert!(output
            .hash
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
