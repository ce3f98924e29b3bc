use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::photo;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::photo::{ListPhotosQuery, PhotoListResponse, PhotoResponse, PhotoSort};
use crate::state::AppState;
use crate::utils::filename::{safe_extension, validate_photo_name};
use crate::utils::suffix::random_suffix;

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(128 * 1024 * 1024) // 128 MB
}

/// List the caller's photos.
#[utoipa::path(
    get,
    path = "/api/v1/photos",
    tag = "Photos",
    operation_id = "listPhotos",
    summary = "List the caller's photos",
    description = "Returns exactly the photos owned by the caller. `sort=date` orders by \
        upload time ascending; any other value or absence orders by display name ascending.",
    params(ListPhotosQuery),
    responses(
        (status = 200, description = "Photo list", body = PhotoListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn list_photos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListPhotosQuery>,
) -> Result<Json<PhotoListResponse>, AppError> {
    let find = photo::Entity::find().filter(photo::Column::UserId.eq(auth_user.user_id));

    let find = match PhotoSort::from_query(query.sort.as_deref()) {
        PhotoSort::Date => find.order_by_asc(photo::Column::UploadedAt),
        PhotoSort::Name => find.order_by_asc(photo::Column::DisplayName),
    };

    let photos = find.all(&state.db).await?;

    let total = photos.len() as u64;
    let photos = photos.into_iter().map(PhotoResponse::from).collect();

    Ok(Json(PhotoListResponse { photos, total }))
}

/// Upload a photo.
#[utoipa::path(
    post,
    path = "/api/v1/photos",
    tag = "Photos",
    operation_id = "uploadPhoto",
    summary = "Upload a photo",
    description = "Multipart upload: the `photo` field carries the binary, the `name` field the \
        user-supplied name (at least 8 characters). The stored display name is the given name \
        plus a random 64-hex-character suffix.",
    request_body(content_type = "multipart/form-data", description = "Photo binary plus name"),
    responses(
        (status = 201, description = "Photo created", body = PhotoResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn upload_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut staged: Option<(std::path::PathBuf, u64)> = None;
    let mut original_filename: Option<String> = None;
    let mut name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("photo") => {
                original_filename = field.file_name().map(|s| s.to_string());
                let max = state.config.storage.max_photo_size;
                staged = Some(stage_field_to_temp(field, max).await?);
            }
            Some("name") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read name: {e}")))?;
                name = Some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let result = async {
        let (temp_path, size) = staged
            .as_ref()
            .ok_or_else(|| AppError::Validation("Missing 'photo' field".into()))?;
        let name = name.ok_or_else(|| AppError::Validation("Missing 'name' field".into()))?;

        let name = validate_photo_name(&name)
            .map_err(|e| AppError::Validation(e.message()))?
            .to_string();

        let display_name = format!("{}-{}", name, random_suffix());

        let file_path = match original_filename.as_deref().and_then(safe_extension) {
            Some(ext) => format!("photos/{display_name}.{ext}"),
            None => format!("photos/{display_name}"),
        };

        let content_type = original_filename
            .as_deref()
            .and_then(|f| mime_guess::from_path(f).first())
            .map(|m| m.to_string());

        let mut file = tokio::fs::File::open(temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        state.media.save(&file_path, &mut file).await?;

        let new_photo = photo::ActiveModel {
            user_id: Set(auth_user.user_id),
            display_name: Set(display_name),
            file_path: Set(file_path.clone()),
            content_type: Set(content_type),
            size: Set(i64::try_from(*size).unwrap_or(i64::MAX)),
            uploaded_at: Set(Utc::now()),
            ..Default::default()
        };

        let saved = match new_photo.insert(&state.db).await {
            Ok(model) => model,
            Err(e) => {
                // Record insert failed: don't leave the file behind.
                let _ = state.media.delete(&file_path).await;
                return Err(AppError::from(e));
            }
        };

        Ok((StatusCode::CREATED, Json(PhotoResponse::from(saved))))
    }
    .await;

    if let Some((temp_path, _)) = staged {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }

    result
}

/// Download a photo's binary content. Owner-only.
#[utoipa::path(
    get,
    path = "/api/v1/photos/{id}/file",
    tag = "Photos",
    operation_id = "downloadPhoto",
    summary = "Download a photo",
    params(("id" = i32, Path, description = "Photo ID")),
    responses(
        (status = 200, description = "Photo content"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, photo_id = id))]
pub async fn download_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response, AppError> {
    let photo = find_photo(&state, id).await?;
    if photo.user_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }

    let reader = state.media.open(&photo.file_path).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = photo
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, photo.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&photo.display_name),
        )
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

/// Delete a photo. Owner-only; any authenticated caller sees 404 for a
/// nonexistent id.
#[utoipa::path(
    delete,
    path = "/api/v1/photos/{id}",
    tag = "Photos",
    operation_id = "deletePhoto",
    summary = "Delete a photo",
    description = "Deletes the record first, then removes the file best-effort, so a crash can \
        at worst leave an orphaned file rather than a record pointing at missing content.",
    params(("id" = i32, Path, description = "Photo ID")),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Photo not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, photo_id = id))]
pub async fn delete_photo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let photo = find_photo(&state, id).await?;
    if photo.user_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }

    photo::Entity::delete_by_id(id).exec(&state.db).await?;

    // Record is gone; file cleanup is best-effort and idempotent. A missing
    // file is a silent no-op.
    match state.media.delete(&photo.file_path).await {
        Ok(_) => {}
        Err(e) => tracing::warn!("Failed to remove media for photo {id}: {e}"),
    }

    Ok(StatusCode::NO_CONTENT)
}

async fn find_photo(state: &AppState, id: i32) -> Result<photo::Model, AppError> {
    photo::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Photo not found".into()))
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| (c.is_ascii_graphic() || *c == ' ') && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "download".to_string()
    } else {
        ascii_safe
    };

    format!("inline; filename=\"{ascii_name}\"")
}

/// Stream a multipart field to a local temp file, enforcing the size limit.
///
/// Staging lets the final media path be chosen after all form fields have
/// been read; multipart field order is not guaranteed.
async fn stage_field_to_temp(
    mut field: axum::extract::multipart::Field<'_>,
    max_size: u64,
) -> Result<(std::path::PathBuf, u64), AppError> {
    let temp_path = std::env::temp_dir().join(format!("photovault-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

        let mut total_size: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
        {
            total_size += chunk.len() as u64;
            if total_size > max_size {
                return Err(AppError::Validation(format!(
                    "File exceeds maximum size of {max_size} bytes"
                )));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;

        Ok((temp_path.clone(), total_size))
    }
    .await;

    if result.is_err() {
        let _ = tokio::fs::remove_file(&temp_path).await;
    }

    result
}
