//! Error types for the pdqkit hashing pipeline.
//!
//! Errors are organized by stage. Decode and hash failures are forwarded
//! through [`PdqError`] unchanged, so callers can match on the stage error
//! that actually occurred.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for pdqkit operations.
#[derive(Error, Debug)]
pub enum PdqError {
    /// The source could not be decoded into an image
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The hash collaborator rejected the pixel array
    #[error(transparent)]
    Hash(#[from] HashComputationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures while turning a path or byte buffer into pixels.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The file could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content sniffing found no known container format
    #[error("Unsupported format for {source_name}")]
    UnsupportedFormat { source_name: String },

    /// The codec rejected the data (corrupt, truncated, limits exceeded)
    #[error("Decode error for {source_name}: {source}")]
    Image {
        source_name: String,
        #[source]
        source: image::ImageError,
    },

    /// The decoded samples did not fit the expected array layout
    #[error("Invalid pixel layout: {0}")]
    Layout(#[from] ndarray::ShapeError),
}

/// Failures reported by the perceptual hash collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashComputationError {
    /// The array has a zero-length axis
    #[error("Cannot hash an empty image ({height}x{width})")]
    EmptyImage { height: usize, width: usize },

    /// The channel count is not one the hasher understands
    #[error("Unsupported channel count: {channels}")]
    UnsupportedChannels { channels: usize },

    /// Height or width does not fit the hasher's dimension type
    #[error("Image dimensions overflow: {height}x{width}")]
    DimensionOverflow { height: usize, width: usize },

    /// The sample buffer length disagrees with the declared shape
    #[error("Sample buffer of {len} bytes does not match shape {height}x{width}x{channels}")]
    BufferMismatch {
        len: usize,
        height: usize,
        width: usize,
        channels: usize,
    },
}

/// Failures while decoding a hex hash back into bits.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// Wrong number of hex digits for the requested bit count
    #[error("Expected {expected} hex digits for {bits} bits, got {actual}")]
    Length {
        bits: usize,
        expected: usize,
        actual: usize,
    },

    /// A character outside `[0-9a-fA-F]`
    #[error("Invalid hex character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Bits above the requested width were set
    #[error("Hex value does not fit in {bits} bits")]
    Overflow { bits: usize },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Convenience type alias for pdqkit results.
pub type Result<T> = std::result::Result<T, PdqError>;

/// Convenience type alias for decode-stage results.
pub type DecodeResult<T> = std::result::Result<T, DecodeError>;
