// Server module - the HTTP transfer shim around the resize pipeline
//
// One upload endpoint: the handler pulls the first file field out of the
// multipart form, hands bytes + filename to the ResizeService on a blocking
// worker, and streams the encoded artifact back as an attachment. All
// pipeline errors map to HTTP statuses; nothing here aborts the process.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use tracing::{error, info, warn};

use crate::resize::processor::ResizeService;

/// Handler state: the pipeline with its dependencies already injected
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ResizeService>,
}

/// Build the application router
pub fn router(service: Arc<ResizeService>, max_upload_size: usize) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(max_upload_size))
        .with_state(AppState { service })
}

const UPLOAD_FORM: &str = r#"<!doctype html>
<html>
<head><title>Suzume</title></head>
<body>
<p>Upload your image to resize</p>
<form action="/upload" method="post" enctype="multipart/form-data">
<input type="file" name="file">
<button type="submit">Resize</button>
</form>
</body>
</html>
"#;

async fn index() -> Html<&'static str> {
    Html(UPLOAD_FORM)
}

async fn upload(State(state): State<AppState>, multipart: Multipart) -> Response {
    let (filename, data) = match first_file_field(multipart).await {
        Ok(found) => found,
        Err(response) => return response,
    };

    info!(filename = %filename, size = data.len(), "processing upload");

    let service = state.service.clone();
    let name = filename.clone();
    let result = tokio::task::spawn_blocking(move || service.process(&data, &name)).await;

    let output = match result {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(filename = %filename, error = %e, "image processing failed");
            let status = StatusCode::from_u16(e.to_http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return error_response(status, e.to_string());
        }
        Err(e) => {
            error!(error = %e, "image processing task failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            );
        }
    };

    let content_type = output.content_type();
    let content_length = output.len();
    let body = match output.into_bytes() {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(filename = %filename, error = %e, "failed to read encoded artifact");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to read encoded artifact".to_string(),
            );
        }
    };

    (
        [
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", sanitize_filename(&filename)),
            ),
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, content_length.to_string()),
        ],
        body,
    )
        .into_response()
}

/// Scan the multipart form for the first field carrying a filename.
async fn first_file_field(mut multipart: Multipart) -> Result<(String, Bytes), Response> {
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let filename = match field.file_name() {
                    Some(name) => name.to_owned(),
                    None => continue, // plain form value, keep scanning
                };
                match field.bytes().await {
                    Ok(bytes) => return Ok((filename, bytes)),
                    Err(e) => {
                        warn!(error = %e, "failed to read uploaded file");
                        return Err(error_response(
                            StatusCode::BAD_REQUEST,
                            format!("failed to read upload: {}", e),
                        ));
                    }
                }
            }
            Ok(None) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    "no file field in form data".to_string(),
                ))
            }
            Err(e) => {
                return Err(error_response(
                    StatusCode::BAD_REQUEST,
                    format!("malformed multipart body: {}", e),
                ))
            }
        }
    }
}

/// Header values must not carry quotes or CR/LF from client input
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_passes_normal_names() {
        assert_eq!(sanitize_filename("photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_filename("my picture.png"), "my picture.png");
    }

    #[test]
    fn test_sanitize_filename_strips_header_breakers() {
        assert_eq!(sanitize_filename("a\"b.jpg"), "a_b.jpg");
        assert_eq!(sanitize_filename("evil\r\nSet-Cookie: x.gif"), "evil__Set-Cookie: x.gif");
    }
}
