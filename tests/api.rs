mod common;

use std::fs;

use activity_predictor::features::{EncoderSet, FeatureVector};
use activity_predictor::model::{load_artifact, Classifier, ClassifierError, EncodersArtifact, Stored};
use activity_predictor::{create_router, AppState, PredictionService};
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use common::{server_config, trained_service, walking_request};

const BOUNDARY: &str = "activity-predictor-test-boundary";

fn app() -> (Router, TempDir) {
    app_with_upload_limit(1024 * 1024)
}

fn app_with_upload_limit(max_upload_bytes: usize) -> (Router, TempDir) {
    let dir = tempdir().unwrap();
    let (service, _) = trained_service(dir.path());
    let mut config = server_config(dir.path());
    config.max_upload_bytes = max_upload_bytes;
    (create_router(AppState::new(service, config)), dir)
}

/// Answers every request with a code no encoder knows
struct OutOfRangeClassifier;

impl Classifier for OutOfRangeClassifier {
    fn predict(&self, _features: &FeatureVector) -> Result<u32, ClassifierError> {
        Ok(99)
    }
}

fn corrupt_app() -> (Router, TempDir) {
    let dir = tempdir().unwrap();
    let (_, config) = trained_service(dir.path());
    let Stored { artifact, .. } = load_artifact::<EncodersArtifact>(&config.encoders_path).unwrap();
    let encoders: EncoderSet = artifact.encoders;

    let service = PredictionService::new(Box::new(OutOfRangeClassifier), encoders).unwrap();
    let state = AppState::new(service, server_config(dir.path()));
    (create_router(state), dir)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn predict_request(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn multipart_request(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
             Content-Type: audio/wav\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload-audio")
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_home() {
    let (app, _dir) = app();
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"Welcome to the Activity Prediction API");
}

#[tokio::test]
async fn test_health_reports_model() {
    let (app, _dir) = app();
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model"]["classes"].as_array().unwrap().len(), 4);
    assert_eq!(json["model"]["n_trees"], 25);
    assert_eq!(json["model"]["digest"].as_str().unwrap().len(), 64);
}

#[tokio::test]
async fn test_predict_walking() {
    let (app, _dir) = app();

    let (status, body) = send(app, predict_request(walking_request().to_string())).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!({ "predicted_activity": "walking" }));
}

#[tokio::test]
async fn test_predict_ignores_extra_fields() {
    let (app, _dir) = app();
    let mut payload = walking_request();
    payload["latitude"] = serde_json::json!(12.97);
    payload["panic_button_pressed"] = serde_json::json!(false);
    payload["heartbeat"] = serde_json::json!("72");

    let (status, body) = send(app, predict_request(payload.to_string())).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["predicted_activity"], "walking");
}

#[tokio::test]
async fn test_predict_missing_field() {
    let (app, _dir) = app();
    let mut payload = walking_request();
    payload.as_object_mut().unwrap().remove("phone_status");

    let (status, body) = send(app, predict_request(payload.to_string())).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "missing_field");
    assert_eq!(json["field"], "phone_status");
    assert_eq!(json["status"], 400);
}

#[tokio::test]
async fn test_predict_unknown_category() {
    let (app, _dir) = app();
    let mut payload = walking_request();
    payload["position"] = serde_json::json!("backpack");

    let (status, body) = send(app, predict_request(payload.to_string())).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "unknown_category");
    assert_eq!(json["field"], "position");
    assert_eq!(json["value"], "backpack");
}

#[tokio::test]
async fn test_predict_malformed_json() {
    let (app, _dir) = app();

    let (status, body) = send(app, predict_request("{ not json".to_string())).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["kind"], "bad_request");
}

#[tokio::test]
async fn test_predict_corrupt_state_is_internal_error() {
    let (app, _dir) = corrupt_app();

    let (status, body) = send(app.clone(), predict_request(walking_request().to_string())).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["kind"], "corrupt_state");
    assert_eq!(json["error"], "Internal server error");

    // the service keeps answering
    let (status, _) = send(app.clone(), predict_request(walking_request().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let health = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, _) = send(app, health).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_upload_audio() {
    let (app, dir) = app();
    let data = b"RIFF\x24\x00\x00\x00WAVEfmt fake-audio";

    let (status, body) = send(app, multipart_request("audio", "audioFile.wav", data)).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Audio uploaded successfully");

    let stored = dir.path().join("uploaded_audios").join("audioFile.wav");
    assert_eq!(json["filePath"], stored.display().to_string());
    assert_eq!(fs::read(&stored).unwrap(), data);
}

#[tokio::test]
async fn test_upload_strips_directories_from_name() {
    let (app, dir) = app();

    let (status, _) = send(app, multipart_request("audio", "../../escape.wav", b"data")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(dir.path().join("uploaded_audios").join("escape.wav").exists());
    assert!(!dir.path().join("escape.wav").exists());
}

#[tokio::test]
async fn test_upload_without_audio_field() {
    let (app, _dir) = app();

    let (status, body) = send(app, multipart_request("video", "clip.mp4", b"data")).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No audio file provided");
}

#[tokio::test]
async fn test_upload_over_limit_is_payload_too_large() {
    let (app, dir) = app_with_upload_limit(1024);

    let (status, body) = send(app, multipart_request("audio", "long.wav", &[7u8; 8 * 1024])).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json["kind"], "payload_too_large");
    assert_eq!(json["status"], 413);
    assert!(!dir.path().join("uploaded_audios").join("long.wav").exists());
}

#[tokio::test]
async fn test_upload_requires_multipart() {
    let (app, _dir) = app();
    let request = Request::builder()
        .method("POST")
        .uri("/upload-audio")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let (status, body) = send(app, request).await;
    let json: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "No audio file provided");
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _dir) = app();
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/predict")
        .header(header::ORIGIN, "http://localhost:5173")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
