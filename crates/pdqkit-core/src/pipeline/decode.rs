//! Image decoding with content-based format detection and decoder limits.

use image::{ColorType, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use ndarray::{Array2, Array3};
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use crate::config::LimitsConfig;
use crate::error::{DecodeError, DecodeResult};

/// Label used in errors for in-memory sources.
const BYTES_SOURCE: &str = "<bytes>";

/// Channel layout of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelMode {
    /// Single-channel grayscale
    Luma,
    /// Grayscale with alpha
    LumaAlpha,
    Rgb,
    Rgba,
}

impl PixelMode {
    /// Number of samples per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelMode::Luma => 1,
            PixelMode::LumaAlpha => 2,
            PixelMode::Rgb => 3,
            PixelMode::Rgba => 4,
        }
    }

    fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 | ColorType::L16 => PixelMode::Luma,
            ColorType::La8 | ColorType::La16 => PixelMode::LumaAlpha,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => PixelMode::Rgb,
            _ => PixelMode::Rgba,
        }
    }
}

/// Raw samples of a decoded image, before channel normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPixels {
    /// `(height, width)` for single-channel images
    Gray(Array2<u8>),
    /// `(height, width, channels)` for everything else
    Channels(Array3<u8>),
}

impl RawPixels {
    /// Number of array dimensions (2 or 3).
    pub fn ndim(&self) -> usize {
        match self {
            RawPixels::Gray(_) => 2,
            RawPixels::Channels(_) => 3,
        }
    }
}

/// A decoded raster image.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// The decoded image data
    pub image: DynamicImage,
    /// Detected container format, if the image came from a container
    pub format: Option<ImageFormat>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

impl DecodedImage {
    /// Wrap an already-decoded image.
    pub fn new(image: DynamicImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            image,
            format: None,
            width,
            height,
        }
    }

    /// The channel layout of the decoded samples.
    pub fn mode(&self) -> PixelMode {
        PixelMode::from_color_type(self.image.color())
    }

    /// Convert to 8-bit RGB, dropping any alpha channel.
    pub fn to_rgb(&self) -> DecodedImage {
        let mut rgb = DecodedImage::new(DynamicImage::ImageRgb8(self.image.to_rgb8()));
        rgb.format = self.format;
        rgb
    }

    /// Read the samples as an array.
    ///
    /// Grayscale images come back 2-D; all other modes come back 3-D with
    /// their native channel count. Deeper sample types are reduced to 8 bits.
    /// The shape comes from the pixel data, not the `width`/`height` fields.
    pub fn to_array(&self) -> DecodeResult<RawPixels> {
        let (width, height) = self.image.dimensions();
        let (h, w) = (height as usize, width as usize);

        let pixels = match &self.image {
            DynamicImage::ImageLuma8(buf) => {
                RawPixels::Gray(Array2::from_shape_vec((h, w), buf.as_raw().clone())?)
            }
            DynamicImage::ImageLuma16(_) => {
                RawPixels::Gray(Array2::from_shape_vec((h, w), self.image.to_luma8().into_raw())?)
            }
            DynamicImage::ImageLumaA8(buf) => {
                RawPixels::Channels(Array3::from_shape_vec((h, w, 2), buf.as_raw().clone())?)
            }
            DynamicImage::ImageLumaA16(_) => RawPixels::Channels(Array3::from_shape_vec(
                (h, w, 2),
                self.image.to_luma_alpha8().into_raw(),
            )?),
            DynamicImage::ImageRgb8(buf) => {
                RawPixels::Channels(Array3::from_shape_vec((h, w, 3), buf.as_raw().clone())?)
            }
            DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgb32F(_) => RawPixels::Channels(
                Array3::from_shape_vec((h, w, 3), self.image.to_rgb8().into_raw())?,
            ),
            _ => RawPixels::Channels(Array3::from_shape_vec(
                (h, w, 4),
                self.image.to_rgba8().into_raw(),
            )?),
        };
        Ok(pixels)
    }
}

/// Image decoder with configurable limits.
#[derive(Debug, Clone, Default)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an image file.
    ///
    /// The format is sniffed from the content, not the extension. The file
    /// handle is closed before this returns.
    pub fn decode_path(&self, path: &Path) -> DecodeResult<DecodedImage> {
        let source_name = path.display().to_string();
        let io_err = |source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        };

        let reader = ImageReader::open(path)
            .map_err(io_err)?
            .with_guessed_format()
            .map_err(io_err)?;
        self.decode_reader(reader, &source_name)
    }

    /// Decode an image from an in-memory byte buffer.
    pub fn decode_bytes(&self, bytes: &[u8]) -> DecodeResult<DecodedImage> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| DecodeError::Image {
                source_name: BYTES_SOURCE.to_string(),
                source: image::ImageError::IoError(e),
            })?;
        self.decode_reader(reader, BYTES_SOURCE)
    }

    fn decode_reader<R: BufRead + Seek>(
        &self,
        mut reader: ImageReader<R>,
        source_name: &str,
    ) -> DecodeResult<DecodedImage> {
        let format = reader
            .format()
            .ok_or_else(|| DecodeError::UnsupportedFormat {
                source_name: source_name.to_string(),
            })?;
        reader.limits(self.limits.to_image_limits());

        let image = reader.decode().map_err(|source| DecodeError::Image {
            source_name: source_name.to_string(),
            source,
        })?;

        let mut decoded = DecodedImage::new(image);
        decoded.format = Some(format);
        Ok(decoded)
    }
}
