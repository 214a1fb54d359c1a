//! HTTP layer: routes, middleware, and shutdown handling.
//!
//! | Method | Path        | Handler                 |
//! |--------|-------------|-------------------------|
//! | GET    | `/health`   | [`handlers::health`]    |
//! | POST   | `/classify` | [`handlers::classify`]  |

mod error;
mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use folio_core::Folio;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the application router. Any origin may call it.
pub fn router(folio: Arc<Folio>) -> Router {
    let body_limit = folio.config().server.max_upload_bytes();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/classify", post(handlers::classify))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(folio)
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down gracefully..."),
        () = terminate => tracing::info!("Received SIGTERM, shutting down gracefully..."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use folio_core::{
        Classifier, ClipClassifier, Config, LabelScorer, PipelineError, CATEGORIES,
    };
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use tower::ServiceExt;

    const BOUNDARY: &str = "folio-test-boundary";

    /// Scores "people" and "indoor" highest for every image.
    struct PortraitScorer;

    impl LabelScorer for PortraitScorer {
        fn name(&self) -> &str {
            "portrait-stub"
        }

        fn logits(&self, _image: &DynamicImage) -> Result<Vec<f32>, PipelineError> {
            let mut logits = vec![0.0; CATEGORIES.len()];
            logits[0] = 30.0; // people
            logits[5] = 29.5; // indoor
            logits[16] = 29.0; // portrait
            Ok(logits)
        }
    }

    fn fallback_app() -> Router {
        let folio = Folio::with_classifier(Config::default(), Classifier::Fallback);
        router(Arc::new(folio))
    }

    fn clip_app() -> Router {
        let config = Config::default();
        let classifier = Classifier::Clip(ClipClassifier::new(
            Box::new(PortraitScorer),
            config.tagging.clone(),
        ));
        router(Arc::new(Folio::with_classifier(config, classifier)))
    }

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(16, 12, Rgb([90, 160, 220]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    /// One multipart part: (field name, optional filename, content).
    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, filename, content) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            let disposition = match filename {
                Some(f) => format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n"
                ),
                None => format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"),
            };
            body.extend_from_slice(disposition.as_bytes());
            body.extend_from_slice(content);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn classify_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/classify")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_health_fallback() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, json) = send(fallback_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({"status": "healthy", "model": "Fallback", "model_loaded": false})
        );
    }

    #[tokio::test]
    async fn test_health_clip() {
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, json) = send(clip_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["model"], "CLIP");
        assert_eq!(json["model_loaded"], true);
    }

    #[tokio::test]
    async fn test_classify_fallback_uses_filename() {
        let png = png_bytes();
        let body = multipart_body(&[("file", Some("my_dog_photo.png"), png.as_slice())]);
        let (status, json) = send(fallback_app(), classify_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({
                "tags": ["animals", "pets", "outdoor"],
                "category": "Animals/Pets",
                "confidence": "low",
                "model": "Fallback"
            })
        );
    }

    #[tokio::test]
    async fn test_classify_clip_uses_model() {
        let png = png_bytes();
        let body = multipart_body(&[("file", Some("my_dog_photo.png"), png.as_slice())]);
        let (status, json) = send(clip_app(), classify_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["tags"], serde_json::json!(["people", "indoor", "portrait"]));
        assert_eq!(json["category"], "People/Indoor");
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["model"], "CLIP");
    }

    #[tokio::test]
    async fn test_classify_skips_other_fields() {
        let png = png_bytes();
        let body = multipart_body(&[
            ("note", None, b"hello".as_slice()),
            ("file", Some("city_street.png"), png.as_slice()),
        ]);
        let (status, json) = send(fallback_app(), classify_request(body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["category"], "Urban/Architecture");
    }

    #[tokio::test]
    async fn test_classify_missing_file() {
        let body = multipart_body(&[("image", Some("dog.png"), b"abc".as_slice())]);
        let (status, json) = send(fallback_app(), classify_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"error": "No file provided"}));
    }

    #[tokio::test]
    async fn test_classify_file_field_without_filename() {
        let body = multipart_body(&[("file", None, b"abc".as_slice())]);
        let (status, json) = send(fallback_app(), classify_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_classify_non_multipart_body() {
        let request = Request::post("/classify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let (status, json) = send(fallback_app(), request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_classify_empty_filename() {
        let png = png_bytes();
        let body = multipart_body(&[("file", Some(""), png.as_slice())]);
        let (status, json) = send(fallback_app(), classify_request(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, serde_json::json!({"error": "Empty filename"}));
    }

    #[tokio::test]
    async fn test_classify_corrupt_image() {
        let body = multipart_body(&[("file", Some("broken.jpg"), b"not really a jpeg".as_slice())]);
        let (status, json) = send(fallback_app(), classify_request(body)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("broken.jpg"), "{message}");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let request = Request::get("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = fallback_app().oneshot(request).await.unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "*"
        );
    }
}
