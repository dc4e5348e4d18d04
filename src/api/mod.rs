//! HTTP route handlers
//!
//! Handlers compose the access gate and the two stores; admin handlers check
//! the secret before any store access. On upload the blob is written before
//! the record is appended; on delete the record removal is the commit point
//! and the blob is deleted afterwards.

use actix_multipart::Multipart;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use bytes::BytesMut;
use chrono::Utc;
use futures::TryStreamExt;
use log::{error, info, warn};
use serde::Serialize;

use crate::app_state::AppState;
use crate::auth::require_admin;
use crate::error::ApiError;
use crate::metadata::{FileRecord, MetadataPatch};
use crate::storage::BlobError;

/// Response body for admin deletes. `blob_removed` is false when the record
/// is gone but the blob was missing or could not be deleted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub message: String,
    pub filename: String,
    pub blob_removed: bool,
}

/// Drain a multipart field into a UTF-8 string
async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String, ApiError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart payload".into()))?
    {
        buf.extend_from_slice(&chunk);
    }
    String::from_utf8(buf.to_vec())
        .map_err(|_| ApiError::BadRequest("form field is not valid UTF-8".into()))
}

/// Upload a new file (admin): multipart form with `file`, `title`,
/// `description` fields
#[post("/upload")]
pub async fn upload(
    req: HttpRequest,
    mut payload: Multipart,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state.config)?;

    let max_upload_size = state.config.server.max_upload_size;
    let mut title = String::new();
    let mut description = String::new();
    let mut file: Option<(String, BytesMut)> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("invalid multipart payload".into()))?
    {
        let cd = field.content_disposition().cloned();
        let field_name = cd
            .as_ref()
            .and_then(|c| c.get_name())
            .unwrap_or_default()
            .to_string();

        match field_name.as_str() {
            "file" => {
                let original_name = cd
                    .as_ref()
                    .and_then(|c| c.get_filename())
                    .unwrap_or("upload.bin")
                    .to_string();
                let mut buf = BytesMut::new();
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|_| ApiError::BadRequest("upload read error".into()))?
                {
                    buf.extend_from_slice(&chunk);
                    if buf.len() > max_upload_size {
                        return Err(ApiError::BadRequest("file too large".into()));
                    }
                }
                file = Some((original_name, buf));
            }
            "title" => title = read_text_field(&mut field).await?,
            "description" => description = read_text_field(&mut field).await?,
            _ => {
                // drain unknown fields
                while field
                    .try_next()
                    .await
                    .map_err(|_| ApiError::BadRequest("invalid multipart payload".into()))?
                    .is_some()
                {}
            }
        }
    }

    let (original_name, content) =
        file.ok_or_else(|| ApiError::BadRequest("no file uploaded".into()))?;

    // blob first, record second
    let filename = state.blob_store.put(&content, &original_name)?;
    let record = FileRecord {
        title,
        description,
        filename: filename.clone(),
        original_name,
        uploaded_at: Utc::now(),
    };
    if let Err(e) = state.metadata_store.append(record.clone()) {
        error!("Record for blob {} not appended, blob left for manual cleanup", filename);
        return Err(e.into());
    }

    info!("Uploaded {} as {}", record.original_name, record.filename);
    Ok(HttpResponse::Ok().json(record))
}

/// Public listing of all records
#[get("/files")]
pub async fn list_files(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(state.metadata_store.list()?))
}

/// Admin listing of all records
#[get("/admin/files")]
pub async fn admin_list_files(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state.config)?;
    Ok(HttpResponse::Ok().json(state.metadata_store.list()?))
}

/// Edit a record's title/description (admin)
#[put("/admin/files/{filename}")]
pub async fn update_file(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<MetadataPatch>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state.config)?;
    let filename = path.into_inner();
    let patch = body.into_inner();
    let record = state.metadata_store.update(&filename, &patch)?;
    info!("Updated metadata for {}", record.filename);
    Ok(HttpResponse::Ok().json(record))
}

/// Delete a record and its blob (admin)
#[delete("/admin/files/{filename}")]
pub async fn delete_file(
    req: HttpRequest,
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    require_admin(&req, &state.config)?;
    let filename = path.into_inner();

    // commit point: once the record is out, it stays out
    let removed = state.metadata_store.remove(&filename)?;

    match state.blob_store.delete(&removed.filename) {
        Ok(()) => {
            info!("Deleted {} and its blob", removed.filename);
            Ok(HttpResponse::Ok().json(DeleteResponse {
                message: "deleted".into(),
                filename: removed.filename,
                blob_removed: true,
            }))
        }
        Err(BlobError::NotFound(_)) => {
            warn!("Blob {} was already missing at delete time", removed.filename);
            Ok(HttpResponse::Ok().json(DeleteResponse {
                message: "deleted; stored blob was already missing".into(),
                filename: removed.filename,
                blob_removed: false,
            }))
        }
        Err(BlobError::Io(e)) => {
            error!(
                "Blob {} could not be deleted and is now orphaned: {}",
                removed.filename, e
            );
            Ok(HttpResponse::InternalServerError().json(DeleteResponse {
                message: "file entry removed but its stored blob could not be deleted".into(),
                filename: removed.filename,
                blob_removed: false,
            }))
        }
    }
}

/// Download a file with its original name as the suggested save name
#[get("/uploads/{filename}")]
pub async fn download(
    path: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let filename = path.into_inner();

    // the route parameter is an opaque key, never a path
    let record = state
        .metadata_store
        .find(&filename)?
        .ok_or(ApiError::NotFound)?;
    let content = state.blob_store.read(&record.filename)?;

    let mime = mime_guess::from_path(&record.original_name).first_or_octet_stream();
    Ok(HttpResponse::Ok()
        .content_type(mime.as_ref())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(record.original_name.clone())],
        })
        .body(content))
}
