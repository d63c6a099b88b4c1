//! The perceptual hash seam and its default PDQ implementation.

use pdqhash::image as pdq_image;

use crate::error::HashComputationError;
use crate::types::{BitVector, HashOutput, PixelArray, Quality};

/// Highest quality score [`PdqHasher`] reports.
const MAX_QUALITY: Quality = 100;

/// Computes a perceptual hash from a normalized pixel array.
///
/// Implementations must be safe to call from several threads at once; the
/// pipeline keeps no state of its own between calls.
pub trait PerceptualHash: Send + Sync {
    /// Hash `pixels`, laid out as `(height, width, channels)`.
    fn compute(&self, pixels: &PixelArray) -> Result<HashOutput, HashComputationError>;
}

impl<F> PerceptualHash for F
where
    F: Fn(&PixelArray) -> Result<HashOutput, HashComputationError> + Send + Sync,
{
    fn compute(&self, pixels: &PixelArray) -> Result<HashOutput, HashComputationError> {
        self(pixels)
    }
}

/// Call the hash collaborator and hand back its result untouched.
pub fn invoke<H: PerceptualHash + ?Sized>(
    hasher: &H,
    pixels: &PixelArray,
) -> Result<HashOutput, HashComputationError> {
    hasher.compute(pixels)
}

/// PDQ hashing backed by the `pdqhash` crate.
///
/// Accepts 1, 3 or 4 channel arrays and hashes at full resolution. The 32
/// hash bytes are unpacked most significant bit first, so the hex form of the
/// bit vector matches the canonical PDQ hex. Quality is scaled from `[0, 1]`
/// to `0..=100`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdqHasher;

impl PdqHasher {
    pub fn new() -> Self {
        Self
    }

    fn to_pdq_image(
        pixels: &PixelArray,
    ) -> Result<pdq_image::DynamicImage, HashComputationError> {
        let (height, width, channels) = pixels.dim();
        if height == 0 || width == 0 {
            return Err(HashComputationError::EmptyImage { height, width });
        }

        let overflow = || HashComputationError::DimensionOverflow { height, width };
        let w = u32::try_from(width).map_err(|_| overflow())?;
        let h = u32::try_from(height).map_err(|_| overflow())?;

        // Logical iteration order is row-major regardless of memory layout
        let samples: Vec<u8> = pixels.iter().copied().collect();
        let mismatch = HashComputationError::BufferMismatch {
            len: samples.len(),
            height,
            width,
            channels,
        };

        let image = match channels {
            1 => pdq_image::ImageBuffer::from_raw(w, h, samples)
                .map(pdq_image::DynamicImage::ImageLuma8),
            3 => pdq_image::ImageBuffer::from_raw(w, h, samples)
                .map(pdq_image::DynamicImage::ImageRgb8),
            4 => pdq_image::ImageBuffer::from_raw(w, h, samples)
                .map(pdq_image::DynamicImage::ImageRgba8),
            other => return Err(HashComputationError::UnsupportedChannels { channels: other }),
        };
        image.ok_or(mismatch)
    }
}

impl PerceptualHash for PdqHasher {
    fn compute(&self, pixels: &PixelArray) -> Result<HashOutput, HashComputationError> {
        let image = Self::to_pdq_image(pixels)?;
        let (hash, quality) = pdqhash::generate_pdq_full_size(&image);

        let quality = ((quality * MAX_QUALITY as f32) as Quality).min(MAX_QUALITY);
        Ok(HashOutput {
            bits: BitVector::from_bytes(&hash),
            quality,
        })
    }
}
