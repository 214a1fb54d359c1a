//! Model file layout and acquisition from the Hugging Face hub.
//!
//! Files are stored under `{model_dir}/{model.name}/` with fixed local names,
//! regardless of where they live in the remote repository.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::PipelineError;

/// Local filename of the vision encoder.
pub const VISUAL_MODEL_FILENAME: &str = "visual.onnx";
/// Local filename of the text encoder.
pub const TEXT_MODEL_FILENAME: &str = "text_model.onnx";
/// Local filename of the tokenizer.
pub const TOKENIZER_FILENAME: &str = "tokenizer.json";

/// One file the model needs: where it lives remotely and locally.
#[derive(Debug, Clone, Copy)]
pub struct ModelFile {
    pub label: &'static str,
    pub remote_path: &'static str,
    pub local_name: &'static str,
}

/// Everything the CLIP classifier needs on disk.
pub const MODEL_FILES: &[ModelFile] = &[
    ModelFile {
        label: "Vision encoder",
        remote_path: "onnx/vision_model.onnx",
        local_name: VISUAL_MODEL_FILENAME,
    },
    ModelFile {
        label: "Text encoder",
        remote_path: "onnx/text_model.onnx",
        local_name: TEXT_MODEL_FILENAME,
    },
    ModelFile {
        label: "Tokenizer",
        remote_path: "tokenizer.json",
        local_name: TOKENIZER_FILENAME,
    },
];

/// Resolved local paths for a model variant.
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub dir: PathBuf,
}

impl ModelPaths {
    pub fn from_config(config: &Config) -> Self {
        Self {
            dir: config.model_variant_dir(),
        }
    }

    pub fn visual(&self) -> PathBuf {
        self.dir.join(VISUAL_MODEL_FILENAME)
    }

    pub fn text(&self) -> PathBuf {
        self.dir.join(TEXT_MODEL_FILENAME)
    }

    pub fn tokenizer(&self) -> PathBuf {
        self.dir.join(TOKENIZER_FILENAME)
    }

    /// Files not yet present on disk.
    pub fn missing(&self) -> Vec<&'static ModelFile> {
        MODEL_FILES
            .iter()
            .filter(|f| !self.dir.join(f.local_name).exists())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }
}

/// Remote URL of a file in a Hugging Face repository.
pub fn hub_url(repo: &str, remote_path: &str) -> String {
    format!("https://huggingface.co/{repo}/resolve/main/{remote_path}")
}

/// Download every missing model file. Already-present files are skipped.
pub async fn download_missing(
    paths: &ModelPaths,
    repo: &str,
    client: &reqwest::Client,
) -> Result<(), PipelineError> {
    let missing = paths.missing();
    if missing.is_empty() {
        tracing::debug!("All model files present in {:?}", paths.dir);
        return Ok(());
    }

    tokio::fs::create_dir_all(&paths.dir)
        .await
        .map_err(|e| PipelineError::Model {
            path: paths.dir.clone(),
            message: format!("Cannot create model directory: {e}"),
        })?;

    for file in missing {
        let url = hub_url(repo, file.remote_path);
        let dest = paths.dir.join(file.local_name);

        tracing::info!("Downloading {}...", file.label);
        tracing::info!("  Source: {}", url);
        tracing::info!("  Destination: {:?}", dest);

        download_file(client, &url, &dest).await?;

        if let Ok(meta) = tokio::fs::metadata(&dest).await {
            tracing::info!(
                "  {} complete ({:.1} MB)",
                file.label,
                meta.len() as f64 / (1024.0 * 1024.0)
            );
        }
    }

    Ok(())
}

/// Stream a URL to `dest` via a `.part` file, renamed into place on success.
///
/// A failed transfer leaves no file behind at `dest`.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<(), PipelineError> {
    let partial = dest.with_extension("part");
    let result = stream_to(client, url, &partial).await;

    match result {
        Ok(()) => tokio::fs::rename(&partial, dest)
            .await
            .map_err(|e| PipelineError::Download {
                url: url.to_string(),
                message: format!("Cannot move download into place: {e}"),
            }),
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            Err(e)
        }
    }
}

async fn stream_to(client: &reqwest::Client, url: &str, dest: &Path) -> Result<(), PipelineError> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let download_err = |message: String| PipelineError::Download {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| download_err(e.to_string()))?;

    let total_size = response.content_length();
    if let Some(size) = total_size {
        tracing::info!("  Size: {:.1} MB", size as f64 / (1024.0 * 1024.0));
    }

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| download_err(format!("Cannot create {}: {e}", dest.display())))?;
    let mut stream = response.bytes_stream();
    let mut downloaded: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| download_err(e.to_string()))?;
        file.write_all(&chunk)
            .await
            .map_err(|e| download_err(format!("Write failed: {e}")))?;
        downloaded += chunk.len() as u64;

        if let Some(total) = total_size {
            if downloaded % (50 * 1024 * 1024) < chunk.len() as u64 {
                tracing::info!(
                    "  Progress: {:.0}%",
                    downloaded as f64 / total as f64 * 100.0
                );
            }
        }
    }

    file.flush()
        .await
        .map_err(|e| download_err(format!("Flush failed: {e}")))?;

    Ok(())
}
