#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;
    use tracing::level_filters::LevelFilter;

    use crate::{
        config::config::AppConfig,
        prompt::models::Settings,
        server::{app_state::AppState, router::app_router},
    };

    const BOUNDARY: &str = "quizgen-test-boundary";

    fn setup_logging() {
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(LevelFilter::DEBUG)
            .with_test_writer()
            .try_init()
            .ok();
    }

    fn setup_app(groq_url: &str, upload_dir: &TempDir) -> Router {
        setup_logging();
        let config = AppConfig::for_tests(groq_url, upload_dir.path().to_path_buf());
        let state = AppState::from_config(&config).unwrap();
        app_router(state, &config.cors)
    }

    fn multipart_request(field: &str, file_name: Option<&str>, content: &[u8]) -> Request<Body> {
        let disposition = match file_name {
            Some(name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream",
                field, name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"", field),
        };

        let mut body = format!("--{}\r\n{}\r\n\r\n", BOUNDARY, disposition).into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/parse")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn completion(content: &str) -> String {
        json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn status_envelope_carries_security_headers() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["x-frame-options"], "DENY");
        assert!(headers.contains_key("x-request-id"));

        let body = read_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["provider"], "groq");
        assert_eq!(body["endpoints"]["parse"], "POST /api/parse");
    }

    #[tokio::test]
    async fn preflight_allows_configured_origin() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/generate-quiz")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS],
            "true"
        );
    }

    #[tokio::test]
    async fn pasted_text_below_minimum_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let response = app
            .oneshot(multipart_request("text", None, "a".repeat(49).as_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["kind"], "too_short_error");
        assert_eq!(body["details"]["length"], 49);
        assert_eq!(body["details"]["minimum"], 50);
    }

    #[tokio::test]
    async fn pasted_text_at_minimum_is_accepted() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let response = app
            .oneshot(multipart_request("text", None, "a".repeat(50).as_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert_eq!(body["ok"], true);
        assert_eq!(body["meta"]["length"], 50);
        assert_eq!(body["meta"]["wordCount"], 1);
        assert_eq!(body["meta"]["estimatedQuestions"], 0);
        assert_eq!(body["meta"]["source"], "paste");
    }

    #[tokio::test]
    async fn uploaded_markdown_is_parsed_and_staging_is_cleaned() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);
        let content = "# Verbs\n\n".to_string() + &"hablar parler ".repeat(100);

        let response = app
            .oneshot(multipart_request("file", Some("Notes.MD"), content.as_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert_eq!(body["meta"]["source"], "upload");
        assert_eq!(body["meta"]["fileName"], "Notes.MD");
        assert_eq!(body["meta"]["estimatedQuestions"], 4);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unsupported_extension_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let response = app
            .oneshot(multipart_request("file", Some("setup.exe"), b"MZ binary"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert_eq!(body["kind"], "validation_error");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn parse_without_content_is_rejected() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let response = app
            .oneshot(multipart_request("other", None, b"ignored"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert_eq!(body["kind"], "validation_error");
    }

    #[tokio::test]
    async fn generate_without_prompt_is_missing_data() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);
        let settings = serde_json::to_value(Settings::default()).unwrap();

        let response = app
            .oneshot(json_request(
                "/api/generate-quiz",
                json!({ "settings": settings }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert_eq!(body["error"], "Missing data");
    }

    #[tokio::test]
    async fn generate_without_settings_is_missing_data() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let response = app
            .oneshot(json_request(
                "/api/generate-quiz",
                json!({ "prompt": "Make a quiz" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert_eq!(body["error"], "Missing data");
        assert!(body["message"].as_str().unwrap().contains("settings"));
    }

    #[tokio::test]
    async fn missing_prompt_wins_over_unrecognised_settings() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let response = app
            .oneshot(json_request(
                "/api/generate-quiz",
                json!({ "settings": { "numQuestions": 10, "sourceLang": "DE" } }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert_eq!(body["error"], "Missing data");
        assert!(body["message"].as_str().unwrap().contains("prompt"));
    }

    #[tokio::test]
    async fn partial_settings_are_forwarded_to_the_provider() {
        let mut groq = mockito::Server::new_async().await;
        let mock = groq
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("{\"questions\":[]}"))
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let app = setup_app(&groq.url(), &dir);

        let response = app
            .oneshot(json_request(
                "/api/generate-quiz",
                json!({ "prompt": "Make a quiz", "settings": { "sourceLang": "DE" } }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_json_gets_error_envelope() {
        let dir = TempDir::new().unwrap();
        let app = setup_app("http://127.0.0.1:1", &dir);

        let request = Request::builder()
            .method("POST")
            .uri("/api/generate-quiz")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"prompt\": \"unterminated"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_body(response).await;
        assert_eq!(body["error"], "Invalid request");
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn generate_wraps_provider_text() {
        let mut groq = mockito::Server::new_async().await;
        let mock = groq
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key")
            .with_status(200)
            .with_body(completion("{\"title\":\"Quiz\",\"questions\":[]}"))
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let app = setup_app(&groq.url(), &dir);
        let settings = serde_json::to_value(Settings::default()).unwrap();

        let response = app
            .oneshot(json_request(
                "/api/generate-quiz",
                json!({ "prompt": "Make a quiz", "settings": settings }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["provider"], "groq");
        assert_eq!(body["data"]["content"][0]["type"], "text");
        assert_eq!(
            body["data"]["content"][0]["text"],
            "{\"title\":\"Quiz\",\"questions\":[]}"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn provider_failure_is_reported_as_retryable() {
        let mut groq = mockito::Server::new_async().await;
        groq.mock("POST", "/chat/completions")
            .with_status(500)
            .with_body(json!({ "error": { "message": "Rate limit reached" } }).to_string())
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let app = setup_app(&groq.url(), &dir);
        let settings = serde_json::to_value(Settings::default()).unwrap();

        let response = app
            .oneshot(json_request(
                "/api/generate-quiz",
                json!({ "prompt": "Make a quiz", "settings": settings }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_body(response).await;
        assert_eq!(body["error"], "Quiz generation failed");
        assert_eq!(body["retryable"], true);
        assert!(body["message"].as_str().unwrap().contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn provider_check_reports_reply() {
        let mut groq = mockito::Server::new_async().await;
        groq.mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(completion("OK"))
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let app = setup_app(&groq.url(), &dir);

        let response = app
            .oneshot(Request::get("/api/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["response"], "OK");
    }

    #[tokio::test]
    async fn provider_check_reports_failure() {
        let mut groq = mockito::Server::new_async().await;
        groq.mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(json!({ "error": { "message": "Invalid API Key" } }).to_string())
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let app = setup_app(&groq.url(), &dir);

        let response = app
            .oneshot(Request::get("/api/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("Invalid API Key"));
    }
}
