// ============================================================
// MULTIPART UPLOAD EXTRACTION
// ============================================================
// Pull the bytes of the `file` form field out of a multipart request

use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::HttpRequest;
use futures_util::StreamExt;

use crate::domain::error::{AppError, Result};

pub const FILE_FIELD: &str = "file";

/// Read the first `file` field into memory.
///
/// Requests that are not multipart, or that carry no `file` field, are
/// reported as `MissingFile`. Other form fields are skipped.
pub async fn read_file_field(
    req: &HttpRequest,
    mut payload: Multipart,
    max_bytes: usize,
) -> Result<Vec<u8>> {
    if !is_multipart(req) {
        return Err(AppError::MissingFile);
    }

    while let Some(field) = payload.next().await {
        let mut field = field.map_err(|e| AppError::Upload(e.to_string()))?;
        let is_file = field.name() == Some(FILE_FIELD);

        let mut data = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::Upload(e.to_string()))?;
            if !is_file {
                continue;
            }
            if data.len() + chunk.len() > max_bytes {
                return Err(AppError::Upload(format!(
                    "File exceeds the upload limit of {} bytes",
                    max_bytes
                )));
            }
            data.extend_from_slice(&chunk);
        }

        if is_file {
            return Ok(data);
        }
    }

    Err(AppError::MissingFile)
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}
