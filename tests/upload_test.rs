// HTTP surface tests: drive the router with hand-built multipart requests
// through tower's oneshot, without binding a socket.

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tower::ServiceExt;

use suzume::constants::DEFAULT_MAX_UPLOAD_SIZE;
use suzume::resize::encoder::EncoderRegistry;
use suzume::resize::policy::{ResizeKernel, SizePolicy};
use suzume::resize::processor::ResizeService;

const BOUNDARY: &str = "----suzume-test-boundary";

fn app() -> Router {
    let service = Arc::new(ResizeService::new(
        SizePolicy::FixedWidth { width: 100 },
        ResizeKernel::Nearest,
        EncoderRegistry::with_defaults(100),
    ));
    suzume::server::router(service, DEFAULT_MAX_UPLOAD_SIZE)
}

fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

fn multipart_body(filename: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(filename: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(filename, bytes)))
        .unwrap()
}

#[tokio::test]
async fn index_serves_upload_form() {
    let response = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let html = std::str::from_utf8(&body).unwrap();
    assert!(html.contains("multipart/form-data"));
    assert!(html.contains("/upload"));
}

#[tokio::test]
async fn upload_returns_resized_attachment() {
    let response = app()
        .oneshot(upload_request("photo.jpg", &jpeg_bytes(200, 100)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers().clone();
    assert_eq!(headers[header::CONTENT_TYPE], "image/jpeg");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=photo.jpg"
    );

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(
        headers[header::CONTENT_LENGTH],
        body.len().to_string().as_str()
    );

    let decoded = image::load_from_memory(&body).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (100, 50));
}

#[tokio::test]
async fn upload_sanitizes_filename_in_disposition_header() {
    // a tab survives multipart parsing but must not reach the response header
    let response = app()
        .oneshot(upload_request("a\tb.jpg", &jpeg_bytes(10, 10)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=a_b.jpg"
    );
}

#[tokio::test]
async fn unsupported_extension_maps_to_415() {
    let response = app()
        .oneshot(upload_request("photo.bmp", &jpeg_bytes(10, 10)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn undecodable_upload_maps_to_400() {
    let response = app()
        .oneshot(upload_request("photo.jpg", b"not an image at all"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn zero_byte_upload_maps_to_400() {
    let response = app()
        .oneshot(upload_request("photo.jpg", &[]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn form_without_file_field_maps_to_400() {
    // a plain text field has no filename, so the scan comes up empty
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(b"Content-Disposition: form-data; name=\"note\"\r\n\r\n");
    body.extend_from_slice(b"hello");
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn animated_gif_round_trips_through_the_endpoint() {
    let mut gif_data = Vec::new();
    {
        let mut encoder = gif::Encoder::new(&mut gif_data, 200, 100, &[]).unwrap();
        encoder.set_repeat(gif::Repeat::Infinite).unwrap();
        for color in [[255u8, 0, 0], [0, 0, 255]] {
            let frame = gif::Frame {
                width: 200,
                height: 100,
                delay: 5,
                palette: Some(color.to_vec()),
                buffer: std::borrow::Cow::Owned(vec![0; 200 * 100]),
                ..gif::Frame::default()
            };
            encoder.write_frame(&frame).unwrap();
        }
    }

    let response = app()
        .oneshot(upload_request("anim.gif", &gif_data))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/gif");

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::RGBA);
    let mut decoder = options.read_info(Cursor::new(body.as_ref())).unwrap();
    assert_eq!((decoder.width(), decoder.height()), (100, 50));

    let mut frames = 0;
    while decoder.read_next_frame().unwrap().is_some() {
        frames += 1;
    }
    assert_eq!(frames, 2);
}
