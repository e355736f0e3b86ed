//! Image upload side-channel.
//!
//! Accepts one multipart `image` field (plus an optional `image_type` text
//! field used in the generated filename), validates extension and size,
//! stores the file under the configured directory, and returns the absolute
//! URL the client later writes into image/receipt fields. The stored files
//! are served back under `/uploads/`.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{AppState, api::models::uploads::UploadResponse, errors::{Error, Result}};

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

fn rejected(message: impl Into<String>) -> (StatusCode, Json<UploadResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(UploadResponse {
            success: false,
            message: message.into(),
            file_path: None,
        }),
    )
}

#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    summary = "Upload an image",
    request_body(content_type = "multipart/form-data", description = "One `image` file plus optional `image_type` label"),
    responses(
        (status = 200, description = "File stored; `file_path` holds the URL", body = UploadResponse),
        (status = 400, description = "Missing file, bad extension, or size over the limit", body = UploadResponse),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upload_image(State(state): State<AppState>, mut multipart: Multipart) -> Result<(StatusCode, Json<UploadResponse>)> {
    let mut image: Option<(String, Bytes)> = None;
    let mut image_type = "unknown".to_string();

    while let Some(field) = multipart.next_field().await.map_err(|e| Error::BadRequest {
        message: format!("Failed to parse multipart data: {e}"),
    })? {
        match field.name().unwrap_or("") {
            "image" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field.bytes().await.map_err(|e| Error::BadRequest {
                    message: format!("Failed to read uploaded file: {e}"),
                })?;
                image = Some((file_name, data));
            }
            "image_type" => {
                image_type = field.text().await.unwrap_or_else(|_| "unknown".to_string());
            }
            _ => {}
        }
    }

    let Some((file_name, data)) = image else {
        return Ok(rejected("No image file provided."));
    };

    let extension = file_name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase()).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Ok(rejected("Invalid file type. Only JPG, JPEG, PNG, and GIF files are allowed."));
    }

    let max_file_size = state.config.uploads.max_file_size;
    if data.len() as u64 > max_file_size {
        return Ok(rejected(format!(
            "File size exceeds the maximum limit of {} MB.",
            max_file_size / (1024 * 1024)
        )));
    }

    let new_file_name = format!("{}_{}_{}.{}", Utc::now().timestamp(), image_type, Uuid::new_v4().simple(), extension);
    let target = state.config.uploads.dir.join(&new_file_name);

    tokio::fs::create_dir_all(&state.config.uploads.dir)
        .await
        .map_err(|e| Error::Internal {
            operation: format!("create upload directory: {e}"),
        })?;
    tokio::fs::write(&target, &data).await.map_err(|e| Error::Internal {
        operation: format!("store uploaded file: {e}"),
    })?;

    let file_url = format!("{}/uploads/{}", state.config.public_url.trim_end_matches('/'), new_file_name);
    tracing::info!(file = %new_file_name, size = data.len(), "file uploaded");

    Ok((
        StatusCode::OK,
        Json(UploadResponse {
            success: true,
            message: "File uploaded successfully.".to_string(),
            file_path: Some(file_url),
        }),
    ))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{create_test_app, create_test_app_with_config};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::Value;
    use sqlx::SqlitePool;

    fn png_part(bytes: Vec<u8>, name: &str) -> Part {
        Part::bytes(bytes).file_name(name.to_string())
    }

    #[sqlx::test]
    #[test_log::test]
    async fn accepted_upload_lands_on_disk_and_returns_a_url(pool: SqlitePool) {
        let (app, config) = create_test_app_with_config(pool).await;

        let form = MultipartForm::new()
            .add_part("image", png_part(vec![0x89, 0x50, 0x4E, 0x47], "receipt.png"))
            .add_text("image_type", "receipt");
        let response = app.post("/upload").multipart(form).await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(true));
        let url = body["file_path"].as_str().unwrap();
        let file_name = url.rsplit('/').next().unwrap();
        assert!(file_name.ends_with(".png"));
        assert!(file_name.contains("_receipt_"));
        assert!(config.uploads.dir.join(file_name).exists());

        // the stored file is served back
        let served = app.get(&format!("/uploads/{file_name}")).await;
        served.assert_status_ok();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn disallowed_extension_is_rejected(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let form = MultipartForm::new().add_part("image", png_part(vec![1, 2, 3], "notes.txt"));
        let response = app.post("/upload").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], Value::Bool(false));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn oversized_file_is_rejected(pool: SqlitePool) {
        let (app, config) = create_test_app_with_config(pool).await;

        let too_big = vec![0u8; (config.uploads.max_file_size + 1) as usize];
        let form = MultipartForm::new().add_part("image", png_part(too_big, "huge.png"));
        let response = app.post("/upload").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["message"].as_str().unwrap().contains("size"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn missing_file_field_is_rejected(pool: SqlitePool) {
        let app = create_test_app(pool).await;

        let form = MultipartForm::new().add_text("image_type", "receipt");
        let response = app.post("/upload").multipart(form).await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
