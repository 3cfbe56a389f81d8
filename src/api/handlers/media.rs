//! Image upload.

use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::MEDIA_TAG;
use crate::api::dto::{ErrorResponse, UploadForm, UploadQuery, UploadResponse};
use crate::api::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::services::Upload;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

pub fn media_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(upload))
}

/// POST /api/media/upload
///
/// Stores one image from the `file` form field and returns its public URL.
#[utoipa::path(
    post,
    path = "/media/upload",
    tag = MEDIA_TAG,
    params(UploadQuery),
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored", body = UploadResponse),
        (status = 400, description = "Missing, empty, oversized or non-image file", body = ErrorResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 502, description = "Storage backend failed", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn upload(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<UploadQuery>,
    multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let file = read_file_field(multipart).await?;
    tracing::debug!(
        user_id = user.user_id,
        file_name = %file.file_name,
        size = file.bytes.len(),
        "Upload received"
    );

    let url = state.services.media.upload(query.category, file).await?;
    Ok(Json(UploadResponse { url }))
}

/// Pulls the first `file` field out of the form, skipping any others.
async fn read_file_field(mut multipart: Multipart) -> AppResult<Upload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::bad_request("The file field has no file name"))?;
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        return Ok(Upload {
            file_name,
            content_type,
            bytes,
        });
    }

    Err(AppError::bad_request(format!(
        "Multipart form has no '{FILE_FIELD}' field"
    )))
}
