//! HTTP Routes
//!
//! API Endpoints:
//! - /api/voices    GET   预置音色列表（静态目录）
//! - /api/health    GET   健康检查与凭据诊断
//! - /api/generate  POST  文本转语音（JSON 或 multipart，上传文件优先）
//!
//! 静态 UI 由 server 挂载在 API 路由之后，避免遮蔽

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/voices", get(handlers::list_voices))
        .route("/generate", post(handlers::generate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::TtsEnginePort;
    use crate::domain::audio;
    use crate::infrastructure::adapters::credentials::EnvCredentialStore;
    use crate::infrastructure::adapters::engine::{FakeEngineLoader, FakeTtsEngine};
    use crate::infrastructure::adapters::staging::FileSampleStaging;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};
    use tower::util::ServiceExt;

    struct TestApp {
        app: Router,
        engine: Arc<FakeTtsEngine>,
        loader: Arc<FakeEngineLoader>,
        // 保持临时目录存活到测试结束
        _temp: TempDir,
    }

    fn test_app() -> TestApp {
        let temp = tempdir().unwrap();
        let engine = Arc::new(FakeTtsEngine::with_defaults());
        let loader = Arc::new(FakeEngineLoader::new(engine.clone()));
        let staging = Arc::new(FileSampleStaging::new(temp.path().join("staging")));
        let credentials = Arc::new(EnvCredentialStore::new(temp.path().join(".env")));

        let state = Arc::new(AppState::new(loader.clone(), staging, credentials));
        TestApp {
            app: create_routes().with_state(state),
            engine,
            loader,
            _temp: temp,
        }
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_list_voices_is_static_and_does_not_load_the_model() {
        let t = test_app();
        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/voices")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        let voices = body["voices"].as_array().unwrap();
        assert_eq!(voices.len(), 8);
        assert_eq!(voices[0]["id"], "alba");
        assert_eq!(voices[0]["name"], "Alba (Casual)");

        assert_eq!(t.loader.load_calls(), 0);
    }

    #[tokio::test]
    async fn test_health_reports_credential_status_without_loading() {
        let t = test_app();
        let response = t
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(body["auth_status"], "anonymous");
        assert_eq!(body["env_file_found"], false);

        assert_eq!(t.loader.load_calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_json_returns_wav() {
        let t = test_app();
        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":"Hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/wav"
        );

        let bytes = body_bytes(response).await;
        let info = audio::info(&bytes).unwrap();
        assert_eq!(info.sample_rate, t.engine.sample_rate());
        assert_eq!(info.sample_count(), t.engine.samples_per_request());
    }

    #[tokio::test]
    async fn test_generate_empty_text_is_bad_request() {
        let t = test_app();
        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":"   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(t.loader.load_calls(), 0);
    }

    #[tokio::test]
    async fn test_generate_unknown_voice_is_bad_request_not_server_error() {
        let t = test_app();
        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"text":"Hello","voice":"nonexistent"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("nonexistent"));
    }

    #[tokio::test]
    async fn test_generate_multipart_upload_takes_priority_over_voice_field() {
        let t = test_app();

        let boundary = "parla-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{b}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\nHello\r\n\
                 --{b}\r\nContent-Disposition: form-data; name=\"voice\"\r\n\r\nalba\r\n\
                 --{b}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"clone.wav\"\r\nContent-Type: audio/wav\r\n\r\n",
                b = boundary
            )
            .as_bytes(),
        );
        body.extend_from_slice(&[0u8; 64]);
        body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "audio/wav"
        );
        // 解析走了上传样本（已落盘到暂存目录），而不是 voice 字段
        assert!(t._temp.path().join("staging").join("clone.wav").exists());
        assert_eq!(t.engine.voice_state_calls(), 1);
    }

    #[tokio::test]
    async fn test_generate_multipart_rejects_non_audio_extension() {
        let t = test_app();

        let boundary = "parla-test-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"text\"\r\n\r\nHello\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"evil.exe\"\r\n\r\npayload\r\n--{b}--\r\n",
            b = boundary
        );

        let response = t
            .app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", boundary),
                    )
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_two_sequential_identical_requests_succeed_independently() {
        let t = test_app();

        for _ in 0..2 {
            let response = t
                .app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/api/generate")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(r#"{"text":"Hello","voice":"alba"}"#))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        assert_eq!(t.loader.load_calls(), 1);
        assert_eq!(t.engine.generate_calls(), 2);
    }
}
