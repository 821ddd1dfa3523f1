use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extract;
use crate::portfolio::GenerationRequest;
use crate::state::AppState;
use crate::upload::{allowed_file, upload_destination};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub portfolio: String,
    pub message: String,
}

/// POST /upload
/// Accepts a multipart `resume` file plus optional `model` and `api_key`
/// fields, extracts the resume text, and returns the generated portfolio
/// HTML. Provider failures never surface here — the generator degrades to
/// the offline template on its own.
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_upload_fields(multipart).await?;

    let filename = upload.filename;
    if filename.is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }
    if !allowed_file(&filename) {
        return Err(AppError::Validation(
            "File type not allowed. Use PDF, DOC, DOCX, or TXT".to_string(),
        ));
    }

    let path = upload_destination(&state.config.upload_dir, &filename);
    let data = upload.data;
    tokio::fs::write(&path, &data)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to store upload: {e}")))?;

    // The document parsers are synchronous; keep them off the runtime threads.
    let parse_path = path.clone();
    let extraction = tokio::task::spawn_blocking(move || extract::extract_text(&parse_path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Extraction task failed: {e}")));

    // The upload is transient; remove it before reporting any outcome.
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!("Failed to remove uploaded file {}: {e}", path.display());
    }

    let resume_text = extraction?.map_err(|e| AppError::Internal(e.into()))?;
    info!(
        "Extracted {} bytes of resume text from {filename}",
        resume_text.len()
    );

    let request = GenerationRequest {
        resume_text,
        model: upload.model,
        api_key: upload.api_key,
    };
    let portfolio = state.generator.generate(&request).await;

    Ok(Json(UploadResponse {
        success: true,
        portfolio,
        message: "Portfolio generated successfully".to_string(),
    }))
}

/// The fields the upload form may carry. Only `resume` is required.
struct UploadFields {
    filename: String,
    data: Bytes,
    /// Per-request model override from the `model` form field.
    model: Option<String>,
    /// Per-request credential from the `api_key` form field.
    api_key: Option<String>,
}

/// Walks the multipart payload collecting the resume file and the optional
/// generation overrides.
async fn read_upload_fields(mut multipart: Multipart) -> Result<UploadFields, AppError> {
    let mut resume: Option<(String, Bytes)> = None;
    let mut model = None;
    let mut api_key = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
                resume = Some((filename, data));
            }
            "model" => {
                model = text_field(field).await?;
            }
            "api_key" => {
                api_key = text_field(field).await?;
            }
            _ => {}
        }
    }

    let (filename, data) =
        resume.ok_or_else(|| AppError::Validation("No resume file provided".to_string()))?;

    Ok(UploadFields {
        filename,
        data,
        model,
        api_key,
    })
}

/// Trimmed text value of a form field; blank values count as absent.
async fn text_field(field: axum::extract::multipart::Field<'_>) -> Result<Option<String>, AppError> {
    let value = field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}
