//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

/// A classification never carries more than this many tags.
const MAX_TAGS: usize = 3;

/// Upper bound on the upload body limit (1 GiB).
const MAX_UPLOAD_MB: usize = 1024;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be > 0".into(),
            ));
        }
        if self.server.max_upload_mb == 0 || self.server.max_upload_mb > MAX_UPLOAD_MB {
            return Err(ConfigError::ValidationError(format!(
                "server.max_upload_mb must be between 1 and {MAX_UPLOAD_MB}"
            )));
        }
        if self.model.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model.name must not be empty".into(),
            ));
        }
        if self.model.logit_scale <= 0.0 {
            return Err(ConfigError::ValidationError(
                "model.logit_scale must be > 0".into(),
            ));
        }
        if self.tagging.top_k == 0 || self.tagging.top_k > MAX_TAGS {
            return Err(ConfigError::ValidationError(format!(
                "tagging.top_k must be between 1 and {MAX_TAGS}"
            )));
        }
        if self.tagging.min_tags == 0 || self.tagging.min_tags > self.tagging.top_k {
            return Err(ConfigError::ValidationError(
                "tagging.min_tags must be between 1 and tagging.top_k".into(),
            ));
        }
        if self.tagging.min_probability < 0.0 || self.tagging.min_probability > 1.0 {
            return Err(ConfigError::ValidationError(
                "tagging.min_probability must be between 0.0 and 1.0".into(),
            ));
        }
        if self.limits.decode_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.decode_timeout_ms must be > 0".into(),
            ));
        }
        if self.limits.max_image_dimension == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_image_dimension must be > 0".into(),
            ));
        }
        Ok(())
    }
}
