use super::mocks::{MockInferenceClient, StaticImageFetcher};
use axum::{
    Router,
    body::Body,
    http::{Request, header},
};
use std::sync::Arc;
use tryon_relay::{
    config::PredictionParameters,
    relay::RelayService,
    server::{self, AppState, handlers::TRYON_PATH},
};

pub const BOUNDARY: &str = "tryon-test-boundary";

/// Ten bytes starting with the PNG signature.
pub const DUMMY_PNG: [u8; 10] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x01];

pub const RESULT_PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47];

pub const RESULT_URL: &str = "http://mock/result.png";

pub const TEST_UPLOAD_LIMIT: usize = 1024 * 1024;

/// Build a router around the given doubles
pub fn create_test_app(
    inference: Arc<MockInferenceClient>,
    fetcher: Arc<StaticImageFetcher>,
) -> Router {
    let relay = RelayService::new(inference, fetcher, PredictionParameters::default());
    server::router(
        AppState {
            relay: Arc::new(relay),
        },
        TEST_UPLOAD_LIMIT,
    )
}

/// Encode file parts as a multipart/form-data body
pub fn multipart_body(parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, data) in parts {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{name}.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST request to the try-on endpoint with the given parts
pub fn tryon_request(parts: &[(&str, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(TRYON_PATH)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

/// Sample configuration YAML for testing
pub const SAMPLE_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: 8081
  max_upload_bytes: 1048576
  logs:
    level: "debug"

upstream:
  base_url: "http://localhost:7860/"
  endpoint: "/tryon"
  request_timeout_secs: 120

prediction:
  garment_description: "A red shirt"
  denoise_steps: 40
  seed: 7
"#;

/// Invalid configuration YAML for testing error cases
pub const INVALID_CONFIG_YAML: &str = r#"
server:
  host: "127.0.0.1"
  port: "not-a-number"
"#;
