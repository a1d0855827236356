use super::types::{ErrorResponse, HealthResponse, StatusResponse};
use crate::{
    Error, Result,
    relay::{CLOTHING_IMAGE_FIELD, PERSON_IMAGE_FIELD, RelayService, UploadRequest},
};
use axum::{
    extract::{Multipart, State, multipart::MultipartRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

pub const TRYON_PATH: &str = "/api/virtual-tryon";

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<RelayService>,
}

pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        message: "Virtual Try-On Proxy Server (Rust)".to_string(),
        endpoint: TRYON_PATH.to_string(),
    })
}

/// Static descriptor; does not probe the inference service.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        model: "IDM-VTON".to_string(),
        backend: "Gradio API (Rust)".to_string(),
    })
}

pub async fn virtual_tryon(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> std::result::Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let request_id = Uuid::new_v4();
    let span = info_span!("virtual_tryon", %request_id);

    async move {
        let upload = read_upload(multipart).await.map_err(|e| {
            warn!("Rejected try-on request: {}", e);
            error_response(e)
        })?;

        match state.relay.virtual_try_on(upload).await {
            Ok(image) => {
                info!("Successfully processed try-on request");
                Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response())
            }
            Err(e) => {
                error!("Failed to process try-on request: {}", e);
                Err(error_response(e))
            }
        }
    }
    .instrument(span)
    .await
}

async fn read_upload(
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<UploadRequest> {
    let mut multipart = multipart
        .map_err(|e| Error::validation(format!("Invalid multipart body: {}", e.body_text())))?;

    let mut person_image: Option<Bytes> = None;
    let mut clothing_image: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::validation(format!("Invalid multipart body: {}", e.body_text())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let slot = match name.as_str() {
            PERSON_IMAGE_FIELD => &mut person_image,
            CLOTHING_IMAGE_FIELD => &mut clothing_image,
            _ => continue,
        };

        if slot.is_some() {
            return Err(Error::validation(format!(
                "Field {} may only be supplied once",
                name
            )));
        }

        if field.file_name().is_none() {
            return Err(Error::validation(format!(
                "Field {} must be a file upload",
                name
            )));
        }

        let data = field.bytes().await.map_err(|e| {
            Error::validation(format!("Failed to read field {}: {}", name, e.body_text()))
        })?;
        *slot = Some(data);
    }

    UploadRequest::new(person_image, clothing_image)
}

fn error_response(err: Error) -> (StatusCode, Json<ErrorResponse>) {
    (
        err.status_code(),
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
