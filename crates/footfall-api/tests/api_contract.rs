//! HTTP contract tests against the router with a stub detector.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use base64::Engine;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use footfall_api::{create_router, ApiConfig, AppState};
use footfall_vision::{RawDetection, StubDetector};

fn raw(x1: i64, y1: i64, x2: i64, y2: i64, confidence: f32) -> RawDetection {
    RawDetection {
        x1,
        y1,
        x2,
        y2,
        confidence,
    }
}

/// Router whose detector reports two people in the same spatial-hash cell.
fn test_router() -> Router {
    let detector = StubDetector::with_detections(vec![
        raw(0, 0, 20, 20, 0.95),   // center (10, 10)
        raw(10, 10, 30, 30, 0.90), // center (20, 20)
    ]);
    let state = AppState::with_detector(ApiConfig::default(), Arc::new(detector));
    create_router(state)
}

fn tiny_frame_data_url() -> String {
    use image::{ImageBuffer, Rgb};
    let img = ImageBuffer::from_pixel(4, 4, Rgb([0u8, 0, 0]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageOutputFormat::Png,
        )
        .unwrap();
    format!(
        "data:image/png;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bytes)
    )
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn webcam_request() -> Request<Body> {
    let body = serde_json::json!({ "image": tiny_frame_data_url() });
    Request::builder()
        .method("POST")
        .uri("/webcam")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_data_without_time_pos_is_400() {
    let app = test_router();
    let response = app
        .oneshot(Request::get("/data").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid time position");
}

#[tokio::test]
async fn test_data_out_of_range_is_400() {
    let app = test_router();

    // One webcam frame populates the live session.
    let response = app.clone().oneshot(webcam_request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    for uri in ["/data?time_pos=5", "/data?time_pos=-1"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", uri);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid time position");
    }
}

#[tokio::test]
async fn test_webcam_accumulates_into_live_session() {
    let app = test_router();

    let first = body_json(app.clone().oneshot(webcam_request()).await.unwrap()).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["count"], 2);
    assert_eq!(first["total_count"], 2);
    assert_eq!(first["keypoints"], serde_json::json!([[10, 10], [20, 20]]));

    // Second frame appends without reset.
    let second = body_json(app.clone().oneshot(webcam_request()).await.unwrap()).await;
    assert_eq!(second["count"], 2);
    assert_eq!(second["total_count"], 4);

    // Demographic buckets cover everyone in the frame.
    let age_counts: u64 = second["demographics"]["age"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["count"].as_u64().unwrap())
        .sum();
    assert_eq!(age_counts, 2);
}

#[tokio::test]
async fn test_data_point_query_after_webcam() {
    let app = test_router();

    app.clone().oneshot(webcam_request()).await.unwrap();
    app.clone().oneshot(webcam_request()).await.unwrap();

    let response = app
        .clone()
        .oneshot(Request::get("/data?time_pos=1").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["current_count"], 2);
    assert_eq!(json["total_count"], 4);
    assert_eq!(json["timeline_data"], serde_json::json!([2, 2]));
    // Webcam entries are stamped with a unix timestamp.
    assert!(json["frame"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_webcam_without_image_is_400() {
    let app = test_router();
    let request = Request::builder()
        .method("POST")
        .uri("/webcam")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_without_video_field_is_400() {
    let app = test_router();
    let boundary = "----footfall-test-boundary";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nx\r\n--{b}--\r\n",
        b = boundary
    );
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Bad request: No video file provided");
}

#[tokio::test]
async fn test_health() {
    let app = test_router();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_data_unknown_session_is_404() {
    let app = test_router();
    let response = app
        .oneshot(
            Request::get("/data?time_pos=0&session=no-such-session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
