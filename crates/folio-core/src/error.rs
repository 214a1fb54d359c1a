//! Error types for the Folio tagging service.
//!
//! Errors are organized by stage so callers can tell a bad upload apart from
//! a model problem. Messages carry the filename or model path involved.

use std::path::PathBuf;
use thiserror::Error;

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

/// Errors raised while decoding, loading models, or running inference.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {filename}: {message}")]
    Decode { filename: String, message: String },

    /// Neither the content nor the extension identifies a known format
    #[error("Unsupported format for {filename}: {format}")]
    UnsupportedFormat { filename: String, format: String },

    /// Image dimensions exceed limit
    #[error("Image too large: {filename} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        filename: String,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Model files missing or unloadable
    #[error("Model error for {path}: {message}")]
    Model { path: PathBuf, message: String },

    /// Inference against a loaded model failed
    #[error("Inference failed: {message}")]
    Inference { message: String },

    /// Fetching model files failed
    #[error("Download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {filename} after {timeout_ms}ms")]
    Timeout {
        filename: String,
        stage: String,
        timeout_ms: u64,
    },
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_mentions_filename() {
        let err = PipelineError::Decode {
            filename: "broken.jpg".to_string(),
            message: "unexpected end of file".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("broken.jpg"));
        assert!(msg.contains("unexpected end of file"));
    }

    #[test]
    fn test_validation_error_message() {
        let err = ConfigError::ValidationError("server.port must be > 0".into());
        assert!(err.to_string().contains("server.port"));
    }
}
