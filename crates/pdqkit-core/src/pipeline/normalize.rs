//! Channel normalization ahead of hashing.
//!
//! The hasher expects interleaved `(height, width, channels)` samples. Two
//! decoded layouts need fixing up first:
//! - luminance+alpha, which would otherwise reach the hasher with 2 channels
//! - plain grayscale, which comes back from the decoder as a 2-D array

use ndarray::Array3;

use crate::error::DecodeResult;
use crate::types::PixelArray;

use super::decode::{DecodedImage, PixelMode, RawPixels};

/// Channel count the hasher receives for grayscale sources.
const BROADCAST_CHANNELS: usize = 3;

/// Turn a decoded image into a pixel array ready for the hasher.
///
/// With `force_rgb`, or for luminance+alpha sources, the image is converted to
/// RGB before its samples are read. A single-channel array is then copied into
/// three identical channels, which is cheaper than a colorspace conversion and
/// gives the same values. Anything else passes through with its native
/// channel count.
pub fn normalize(image: &DecodedImage, force_rgb: bool) -> DecodeResult<PixelArray> {
    let raw = if force_rgb || image.mode() == PixelMode::LumaAlpha {
        tracing::trace!(mode = ?image.mode(), force_rgb, "converting to RGB");
        image.to_rgb().to_array()?
    } else {
        image.to_array()?
    };

    Ok(match raw {
        RawPixels::Gray(gray) => {
            let (height, width) = gray.dim();
            Array3::from_shape_fn((height, width, BROADCAST_CHANNELS), |(y, x, _)| {
                gray[[y, x]]
            })
        }
        RawPixels::Channels(pixels) => pixels,
    })
}
