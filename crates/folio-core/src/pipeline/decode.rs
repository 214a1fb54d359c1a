//! Upload decoding with format detection, validation, and timeout support.

use image::{DynamicImage, GenericImageView, ImageFormat};
use std::path::Path;
use std::time::Duration;
use tokio::time::timeout;

use crate::config::LimitsConfig;
use crate::error::PipelineError;

/// Image decoder with configurable limits and timeout.
#[derive(Debug, Clone)]
pub struct ImageDecoder {
    limits: LimitsConfig,
}

/// Result of decoding an uploaded image.
pub struct DecodedImage {
    /// Pixel data, always normalized to 8-bit RGB
    pub image: DynamicImage,
    /// Detected image format
    pub format: ImageFormat,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Upload size in bytes
    pub byte_size: u64,
}

impl ImageDecoder {
    /// Create a new decoder with the given limits.
    pub fn new(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Decode an in-memory upload on the blocking pool, bounded by the
    /// configured decode timeout.
    pub async fn decode(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<DecodedImage, PipelineError> {
        let name = filename.to_string();
        let timeout_duration = Duration::from_millis(self.limits.decode_timeout_ms);

        let decode_result = timeout(timeout_duration, async {
            tokio::task::spawn_blocking(move || Self::decode_sync(bytes, &name)).await
        })
        .await;

        match decode_result {
            Ok(Ok(Ok(decoded))) => {
                if decoded.width > self.limits.max_image_dimension
                    || decoded.height > self.limits.max_image_dimension
                {
                    return Err(PipelineError::ImageTooLarge {
                        filename: filename.to_string(),
                        width: decoded.width,
                        height: decoded.height,
                        max_dim: self.limits.max_image_dimension,
                    });
                }
                Ok(decoded)
            }
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(e)) => Err(PipelineError::Decode {
                filename: filename.to_string(),
                message: format!("Task join error: {}", e),
            }),
            Err(_) => Err(PipelineError::Timeout {
                filename: filename.to_string(),
                stage: "decode".to_string(),
                timeout_ms: self.limits.decode_timeout_ms,
            }),
        }
    }

    /// Synchronous decode. Content sniffing wins over the filename extension.
    pub fn decode_sync(bytes: Vec<u8>, filename: &str) -> Result<DecodedImage, PipelineError> {
        use std::io::Cursor;

        let byte_size = bytes.len() as u64;
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| PipelineError::Decode {
                filename: filename.to_string(),
                message: format!("Cannot detect image format: {}", e),
            })?;

        let (reader, format) = match reader.format() {
            Some(f) => (reader, f),
            None => {
                let f = ImageFormat::from_path(Path::new(filename)).map_err(|_| {
                    PipelineError::UnsupportedFormat {
                        filename: filename.to_string(),
                        format: Path::new(filename)
                            .extension()
                            .and_then(|e| e.to_str())
                            .unwrap_or("unknown")
                            .to_string(),
                    }
                })?;
                let mut reader = reader;
                reader.set_format(f);
                (reader, f)
            }
        };

        let image = reader.decode().map_err(|e| PipelineError::Decode {
            filename: filename.to_string(),
            message: e.to_string(),
        })?;

        let (width, height) = image.dimensions();
        let image = match image {
            DynamicImage::ImageRgb8(_) => image,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        };

        Ok(DecodedImage {
            image,
            format,
            width,
            height,
            byte_size,
        })
    }
}
