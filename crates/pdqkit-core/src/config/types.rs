//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Hashing behavior.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingConfig {
    /// Always convert to RGB before hashing, even where the cheaper
    /// grayscale broadcast would apply
    pub force_rgb: bool,
}

/// Resource limits applied by the image decoder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Maximum memory the decoder may allocate, in megabytes
    pub max_alloc_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_image_dimension: 16384,
            max_alloc_mb: 512,
        }
    }
}

impl LimitsConfig {
    /// Translate into the decoder's own limit type.
    pub fn to_image_limits(&self) -> image::Limits {
        let mut limits = image::Limits::default();
        limits.max_image_width = Some(self.max_image_dimension);
        limits.max_image_height = Some(self.max_image_dimension);
        limits.max_alloc = Some(self.max_alloc_mb.saturating_mul(1024 * 1024));
        limits
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format ("text" or "json")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "text".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
