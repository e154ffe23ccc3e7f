//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Layer stack (outermost → innermost): CORS → Extension(ApiContext) →
//! identity middleware → handler. The Extension layer sits outside the
//! middleware so the middleware can read the context; handlers take it
//! via `State`.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;

/// Build the API router with the full layer stack.
pub fn api_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/upload", post(endpoints::documents::upload))
        .route("/import-file", post(endpoints::documents::import_file))
        .route("/chat", post(endpoints::chat::send))
        .route("/chat-history", get(endpoints::chat::history))
        .route("/sync-calendar", post(endpoints::calendar::sync))
        .route("/health-data", get(endpoints::records::health_data))
        .route("/health-insights", post(endpoints::insights::generate))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::auth::identify))
        // Extension must sit outside the identity middleware so it can
        // read the context from request extensions.
        .layer(axum::Extension(ctx))
        // The web frontend is served from a different origin.
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::calendar::StubCalendar;
    use crate::config::AuthSettings;
    use crate::gateway::{ExtractionGateway, MockCompletionClient};
    use crate::models::{HealthRecord, Medication};
    use crate::store::{MemoryRepository, RecordRepository};

    struct TestApp {
        repository: Arc<MemoryRepository>,
        calendar: Arc<StubCalendar>,
        ctx: ApiContext,
    }

    fn test_app(reply: &str) -> TestApp {
        test_app_with(reply, HealthRecord::default(), None)
    }

    fn test_app_with(
        reply: &str,
        record: HealthRecord,
        auth: Option<AuthSettings>,
    ) -> TestApp {
        let repository = Arc::new(MemoryRepository::with_record(record));
        let calendar = Arc::new(StubCalendar::new());
        let gateway = Arc::new(ExtractionGateway::new(Arc::new(
            MockCompletionClient::replying(reply),
        )));
        let ctx = ApiContext::new(repository.clone(), gateway, calendar.clone(), auth);
        TestApp {
            repository,
            calendar,
            ctx,
        }
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 262_144)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    // ── /health ─────────────────────────────────────────────

    #[tokio::test]
    async fn health_reports_connected_probe() {
        let app = api_router(test_app("OK").ctx);
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["message"], "HealthSync AI is running!");
        assert_eq!(json["gemini_status"], "connected");
    }

    #[tokio::test]
    async fn health_reports_probe_error() {
        let repository = Arc::new(MemoryRepository::new());
        let gateway = Arc::new(ExtractionGateway::new(Arc::new(
            MockCompletionClient::failing("quota exceeded"),
        )));
        let ctx = ApiContext::new(repository, gateway, Arc::new(StubCalendar::new()), None);

        let response = api_router(ctx).oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(json["gemini_status"]
            .as_str()
            .unwrap()
            .starts_with("error:"));
    }

    // ── /upload ─────────────────────────────────────────────

    #[tokio::test]
    async fn upload_empty_text_returns_400() {
        let app = api_router(test_app("{}").ctx);
        let response = app
            .oneshot(json_request("POST", "/upload", r#"{"text": "   "}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn upload_ingests_document_and_merges_facts() {
        let test = test_app(r#"{"medications": [{"name": "Metformin", "dosage": "500mg"}]}"#);
        let app = api_router(test.ctx);

        let response = app
            .oneshot(json_request(
                "POST",
                "/upload",
                r#"{"text": "Metformin 500mg twice daily"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["message"], "Document analyzed successfully");
        assert_eq!(json["document_id"], 1);
        assert_eq!(json["analysis"]["medications"][0]["name"], "Metformin");

        let record = test.repository.load().unwrap();
        assert_eq!(record.documents.len(), 1);
        assert_eq!(record.documents[0].owner.as_deref(), Some("local-dev"));
        assert_eq!(record.medications.len(), 1);
    }

    #[tokio::test]
    async fn upload_twice_assigns_sequential_document_ids() {
        let test = test_app("{}");
        let app = api_router(test.ctx.clone());
        let first = app
            .oneshot(json_request("POST", "/upload", r#"{"text": "first note"}"#))
            .await
            .unwrap();
        assert_eq!(response_json(first).await["document_id"], 1);

        let app = api_router(test.ctx);
        let second = app
            .oneshot(json_request("POST", "/upload", r#"{"text": "second note"}"#))
            .await
            .unwrap();
        assert_eq!(response_json(second).await["document_id"], 2);
    }

    #[tokio::test]
    async fn upload_unparseable_analysis_still_ingests() {
        let test = test_app("I could not read that document at all.");
        let app = api_router(test.ctx);

        let response = app
            .oneshot(json_request("POST", "/upload", r#"{"text": "garbled scan"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["document_id"], 1);
        assert!(json["analysis"]["recommendations"][0]
            .as_str()
            .unwrap()
            .contains("structure unclear"));

        let record = test.repository.load().unwrap();
        assert_eq!(record.documents.len(), 1);
        assert_eq!(record.recommendations.len(), 1);
    }

    // ── /import-file ────────────────────────────────────────

    fn multipart_request(uri: &str, boundary: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn file_part(boundary: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"scan.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        body
    }

    #[tokio::test]
    async fn import_file_extracts_text_and_ingests() {
        // One mock reply serves both calls: the vision extraction returns
        // this text, and analyzing that text parses the same object.
        let test = test_app(r#"{"medications": [{"name": "Amoxicillin"}]}"#);
        let app = api_router(test.ctx);

        let boundary = "test-boundary";
        let response = app
            .oneshot(multipart_request(
                "/import-file",
                boundary,
                file_part(boundary, b"\xff\xd8fakejpeg"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["document_id"], 1);
        assert_eq!(json["analysis"]["medications"][0]["name"], "Amoxicillin");
    }

    #[tokio::test]
    async fn import_file_without_file_returns_400() {
        let app = api_router(test_app("{}").ctx);
        let boundary = "test-boundary";
        let body = format!("--{boundary}--\r\n").into_bytes();

        let response = app
            .oneshot(multipart_request("/import-file", boundary, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["message"], "No file provided");
    }

    #[tokio::test]
    async fn import_file_extraction_failure_returns_500() {
        let repository = Arc::new(MemoryRepository::new());
        let gateway = Arc::new(ExtractionGateway::new(Arc::new(
            MockCompletionClient::failing("vision model unavailable"),
        )));
        let ctx = ApiContext::new(repository, gateway, Arc::new(StubCalendar::new()), None);
        let app = api_router(ctx);

        let boundary = "test-boundary";
        let response = app
            .oneshot(multipart_request(
                "/import-file",
                boundary,
                file_part(boundary, b"\xff\xd8fakejpeg"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ── /chat + /chat-history ───────────────────────────────

    #[tokio::test]
    async fn chat_empty_message_returns_400() {
        let app = api_router(test_app("hi").ctx);
        let response = app
            .oneshot(json_request("POST", "/chat", r#"{"message": ""}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["message"], "No message provided");
    }

    #[tokio::test]
    async fn chat_appends_exchange_and_returns_id() {
        let test = test_app("You're doing great — keep taking your medication.");
        let app = api_router(test.ctx);

        let response = app
            .oneshot(json_request(
                "POST",
                "/chat",
                r#"{"message": "How am I doing?"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["chat_id"], 1);
        assert!(json["response"].as_str().unwrap().contains("doing great"));

        let record = test.repository.load().unwrap();
        assert_eq!(record.chat_history.len(), 1);
        assert_eq!(record.chat_history[0].user_message, "How am I doing?");
    }

    #[tokio::test]
    async fn chat_history_returns_exchanges_in_order() {
        let test = test_app("answer");
        for message in [r#"{"message": "first"}"#, r#"{"message": "second"}"#] {
            let app = api_router(test.ctx.clone());
            app.oneshot(json_request("POST", "/chat", message))
                .await
                .unwrap();
        }

        let app = api_router(test.ctx);
        let response = app.oneshot(get_request("/chat-history")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let history = json.as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["id"], 1);
        assert_eq!(history[0]["user_message"], "first");
        assert_eq!(history[1]["id"], 2);
    }

    // ── /sync-calendar ──────────────────────────────────────

    fn record_with_medication(frequency: &str) -> HealthRecord {
        let mut record = HealthRecord::default();
        record.medications.push(Medication {
            name: "Metformin".into(),
            dosage: "500mg".into(),
            frequency: frequency.into(),
            ..Medication::default()
        });
        record
    }

    #[tokio::test]
    async fn sync_calendar_with_no_medications_creates_nothing() {
        let test = test_app("[]");
        let app = api_router(test.ctx);

        let response = app
            .oneshot(json_request("POST", "/sync-calendar", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["message"], "Calendar synced successfully");
        assert_eq!(json["events_created"], 0);
        assert_eq!(json["calendar_result"]["success"], true);
        assert!(test.calendar.created().is_empty());
    }

    #[tokio::test]
    async fn sync_calendar_falls_back_and_publishes() {
        // Non-JSON schedule reply forces the deterministic fallback: one
        // once-daily medication → 7 events.
        let test = test_app_with(
            "I cannot make a schedule.",
            record_with_medication("once daily"),
            None,
        );
        let app = api_router(test.ctx);

        let response = app
            .oneshot(json_request("POST", "/sync-calendar", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["events_created"], 7);
        assert_eq!(json["calendar_result"]["success"], true);
        assert_eq!(
            json["calendar_result"]["events"][0]["summary"],
            "Take Metformin"
        );

        let created = test.calendar.created();
        assert_eq!(created.len(), 7);
        assert!(created
            .iter()
            .all(|spec| spec.reminder_overrides.len() == 2));
    }

    #[tokio::test]
    async fn sync_calendar_uses_ai_schedule_when_parseable() {
        let test = test_app_with(
            r#"[{"summary": "Take Metformin with breakfast",
                 "start_time": "2025-06-01T07:30:00",
                 "end_time": "2025-06-01T07:45:00"}]"#,
            record_with_medication("once daily"),
            None,
        );
        let app = api_router(test.ctx);

        let response = app
            .oneshot(json_request("POST", "/sync-calendar", ""))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["events_created"], 1);
        assert_eq!(
            test.calendar.created()[0].summary,
            "Take Metformin with breakfast"
        );
    }

    // ── /health-data ────────────────────────────────────────

    #[tokio::test]
    async fn health_data_returns_full_record() {
        let test = test_app_with("{}", record_with_medication("once daily"), None);
        let app = api_router(test.ctx);

        let response = app.oneshot(get_request("/health-data")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["medications"][0]["name"], "Metformin");
        for key in [
            "documents",
            "appointments",
            "health_metrics",
            "recommendations",
            "chat_history",
        ] {
            assert!(json[key].is_array(), "missing sequence: {key}");
        }
    }

    // ── /health-insights ────────────────────────────────────

    #[tokio::test]
    async fn health_insights_returns_parsed_object() {
        let app = api_router(
            test_app(r#"{"insights": ["BP trending down"], "recommendations": [], "trends": [], "alerts": []}"#)
                .ctx,
        );

        let response = app
            .oneshot(json_request("POST", "/health-insights", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["insights"][0], "BP trending down");
    }

    #[tokio::test]
    async fn health_insights_degrades_to_fallback() {
        let app = api_router(test_app("not json at all").ctx);
        let response = app
            .oneshot(json_request("POST", "/health-insights", ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(!json["insights"].as_array().unwrap().is_empty());
        assert!(!json["alerts"].as_array().unwrap().is_empty());
    }

    // ── identity middleware ─────────────────────────────────

    fn auth_settings() -> AuthSettings {
        AuthSettings {
            token: "secret-token".into(),
            user: "alice".into(),
        }
    }

    #[tokio::test]
    async fn valid_bearer_token_stamps_configured_identity() {
        let test = test_app_with("{}", HealthRecord::default(), Some(auth_settings()));
        let app = api_router(test.ctx);

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header("Content-Type", "application/json")
            .header("Authorization", "Bearer secret-token")
            .body(Body::from(r#"{"text": "note"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let record = test.repository.load().unwrap();
        assert_eq!(record.documents[0].owner.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn invalid_token_falls_back_to_development_identity() {
        let test = test_app_with("{}", HealthRecord::default(), Some(auth_settings()));
        let app = api_router(test.ctx);

        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header("Content-Type", "application/json")
            .header("Authorization", "Bearer wrong-token")
            .body(Body::from(r#"{"text": "note"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        // Permissive default: the request still succeeds.
        assert_eq!(response.status(), StatusCode::OK);
        let record = test.repository.load().unwrap();
        assert_eq!(record.documents[0].owner.as_deref(), Some("local-dev"));
    }

    #[tokio::test]
    async fn missing_token_falls_back_to_development_identity() {
        let test = test_app_with("{}", HealthRecord::default(), Some(auth_settings()));
        let app = api_router(test.ctx);

        let response = app
            .oneshot(json_request("POST", "/upload", r#"{"text": "note"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let record = test.repository.load().unwrap();
        assert_eq!(record.documents[0].owner.as_deref(), Some("local-dev"));
    }

    // ── routing ─────────────────────────────────────────────

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = api_router(test_app("{}").ctx);
        let response = app.oneshot(get_request("/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
