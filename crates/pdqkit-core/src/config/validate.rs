//! Configuration validation with range checks.

use crate::error::ConfigError;
use crate::output::OutputFormat;

use super::Config;

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        if self.limits.max_alloc_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_alloc_mb must be > 0".into(),
            ));
        }
        if OutputFormat::parse(&self.output.format).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "output.format must be \"text\" or \"json\", got {:?}",
                self.output.format
            )));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.logging.level
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.format must be \"pretty\" or \"json\", got {:?}",
                self.logging.format
            )));
        }
        Ok(())
    }
}
