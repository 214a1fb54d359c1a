//! Request handlers for `/health` and `/classify`.

use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use folio_core::{Classification, Folio, HealthStatus};

use super::error::ApiError;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

pub async fn health(State(folio): State<Arc<Folio>>) -> Json<HealthStatus> {
    Json(folio.health())
}

pub async fn classify(
    State(folio): State<Arc<Folio>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Classification>, ApiError> {
    // A body that isn't multipart at all has no file in it.
    let mut multipart = multipart.map_err(|_| ApiError::NoFile)?;

    let (filename, bytes) = read_file_field(&mut multipart).await?;
    let result = folio.classify_upload(bytes, &filename).await?;
    Ok(Json(result))
}

/// Find the `file` part and read it fully.
///
/// A `file` part without a filename is a plain form value, not an upload.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(ApiError::EmptyFilename);
        }

        let bytes = field.bytes().await?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(ApiError::NoFile)
}
