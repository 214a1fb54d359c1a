//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,

    /// Port to listen on (overridden by `PORT`)
    pub port: u16,

    /// Maximum request body size in megabytes
    pub max_upload_mb: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            max_upload_mb: 50,
        }
    }
}

impl ServerConfig {
    /// Body limit in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

/// Pretrained model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Attempt to load the model at startup. When false the service runs
    /// in fallback mode.
    pub enabled: bool,

    /// Local name of the model variant (subdirectory of `model_dir`)
    pub name: String,

    /// Hugging Face repository holding the ONNX export
    pub repo: String,

    /// Directory where models are stored
    pub model_dir: PathBuf,

    /// Download missing model files at startup
    pub auto_download: bool,

    /// Multiplier applied to cosine similarities before softmax.
    /// CLIP ViT-B/32 learns exp(logit_scale) = 100.
    pub logit_scale: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            name: "clip-vit-base-patch32".to_string(),
            repo: "Xenova/clip-vit-base-patch32".to_string(),
            model_dir: PathBuf::from("~/.folio/models"),
            auto_download: true,
            logit_scale: 100.0,
        }
    }
}

/// Tag selection settings for the model-backed classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaggingConfig {
    /// Number of highest-probability labels considered
    pub top_k: usize,

    /// Labels must score strictly above this probability to be kept
    pub min_probability: f32,

    /// If fewer labels pass the threshold, the top `min_tags` are returned
    pub min_tags: usize,
}

impl Default for TaggingConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            min_probability: 0.10,
            min_tags: 2,
        }
    }
}

/// Resource limits to protect against problematic uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            decode_timeout_ms: 5000,
            max_image_dimension: 20000,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_upload_bytes() {
        let mut server = ServerConfig::default();
        assert_eq!(server.max_upload_bytes(), 50 * 1024 * 1024);

        server.max_upload_mb = usize::MAX;
        assert_eq!(server.max_upload_bytes(), usize::MAX);
    }
}
