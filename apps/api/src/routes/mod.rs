pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers as interview;
use crate::resume::handlers as resume;
use crate::session::handlers as session;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Interview API
        .route("/api/v1/interview/analyze", post(interview::handle_analyze))
        .route(
            "/api/v1/interview/analyze-text",
            post(interview::handle_analyze_text),
        )
        .route(
            "/api/v1/interview/templates",
            get(interview::handle_get_template),
        )
        .route("/api/v1/interview/roles", get(interview::handle_list_roles))
        .route(
            "/api/v1/interview/prompt",
            post(interview::handle_build_prompt),
        )
        // Resume API
        .route("/api/v1/resume/parse", post(resume::handle_parse))
        .route("/api/v1/resume/validate", post(resume::handle_validate))
        // Session API
        .route("/api/v1/sessions/:id", get(session::handle_get_session))
        .route("/api/v1/sessions/:id/chat", post(session::handle_chat))
        .route(
            "/api/v1/sessions/:id/download",
            get(session::handle_download),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::llm_client::{LanguageModel, LlmError};
    use crate::models::chat::ChatTurn;
    use crate::session::SessionStore;

    struct CannedModel;

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn generate(&self, _prompt: &str, role: &str) -> Result<String, LlmError> {
            Ok(format!(
                "# Technical Questions\n1. What makes a strong {role}?\n\n# Coding Challenges\n1. Reverse a linked list."
            ))
        }

        async fn converse(&self, history: &[ChatTurn], message: &str) -> Result<String, LlmError> {
            Ok(format!("({} prior turns) You asked: {message}", history.len()))
        }
    }

    fn app(llm: Option<Arc<dyn LanguageModel>>) -> Router {
        build_router(AppState {
            llm,
            sessions: SessionStore::new(64),
            config: Config {
                google_api_key: None,
                llm_enabled: false,
                llm_timeout_secs: 5,
                port: 0,
                rust_log: "info".to_string(),
                max_upload_bytes: 1024 * 1024,
                max_sessions: 64,
            },
        })
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_body(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    async fn analyze_text(app: &Router, company: &str, role: &str) -> Value {
        let (status, body) = send(
            app,
            post_json(
                "/api/v1/interview/analyze-text",
                json!({
                    "resume_text": "EXPERIENCE\nShipped Python services on Docker.\n",
                    "company": company,
                    "role": role,
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        json_body(&body)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(None), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "prep-api");
    }

    #[tokio::test]
    async fn test_analyze_text_without_model_falls_back() {
        let app = app(None);
        let body = analyze_text(&app, "Acme", "Backend Developer").await;

        assert_eq!(body["guide"]["source"], "fallback");
        assert!(body["guide"]["document"]
            .as_str()
            .unwrap()
            .contains("Technical Questions for Backend Developer"));
        assert_eq!(body["resume"]["skills"]["languages"], json!(["Python"]));
        assert_eq!(
            body["download_file_name"],
            "interview_prep_Acme_Backend_Developer.txt"
        );
        assert!(body["session_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_analyze_text_with_model_and_follow_up_chat() {
        let app = app(Some(Arc::new(CannedModel)));
        let analysis = analyze_text(&app, "Acme", "Data Scientist").await;
        assert_eq!(analysis["guide"]["source"], "llm");
        assert_eq!(analysis["guide"]["outline"][1]["heading"], "Coding Challenges");

        let id = analysis["session_id"].as_str().unwrap().to_string();
        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/chat"),
                json!({ "message": "How deep on statistics?" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body)["reply"]["text"],
            "(2 prior turns) You asked: How deep on statistics?"
        );

        let (status, body) = send(&app, get(&format!("/api/v1/sessions/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        let session = json_body(&body);
        assert_eq!(session["transcript"].as_array().unwrap().len(), 4);
        assert_eq!(session["transcript"][1]["speaker"], "assistant");
    }

    #[tokio::test]
    async fn test_chat_without_model_is_bad_gateway() {
        let app = app(None);
        let analysis = analyze_text(&app, "Acme", "QA Engineer").await;
        let id = analysis["session_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/chat"),
                json!({ "message": "Any tips?" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json_body(&body)["error"]["code"], "LLM_ERROR");

        let (_, body) = send(&app, get(&format!("/api/v1/sessions/{id}"))).await;
        assert_eq!(json_body(&body)["transcript"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app(None), get(&uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(&body)["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_blank_inputs_are_rejected() {
        let app = app(None);
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/interview/analyze-text",
                json!({ "resume_text": "EDUCATION\nBSc", "company": "  ", "role": "Dev" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"]["message"], "company must not be empty");

        let analysis = analyze_text(&app, "Acme", "Dev").await;
        let id = analysis["session_id"].as_str().unwrap().to_string();
        let (status, _) = send(
            &app,
            post_json(
                &format!("/api/v1/sessions/{id}/chat"),
                json!({ "message": "\n" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_is_named_attachment() {
        let app = app(None);
        let analysis = analyze_text(&app, "Acme Corp", "Mobile Developer").await;
        let id = analysis["session_id"].as_str().unwrap();

        let response = app
            .clone()
            .oneshot(get(&format!("/api/v1/sessions/{id}/download")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"interview_prep_Acme_Corp_Mobile_Developer.txt\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, analysis["guide"]["document"].as_str().unwrap());
    }

    #[tokio::test]
    async fn test_template_endpoint_returns_plain_text() {
        let (status, body) = send(
            &app(None),
            get("/api/v1/interview/templates?role=Site%20Reliability%20Engineer"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("# 💻 Technical Questions for Site Reliability Engineer"));
    }

    #[tokio::test]
    async fn test_roles_endpoint_lists_suggestions() {
        let (status, body) = send(&app(None), get("/api/v1/interview/roles")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["roles"][0], "Backend Developer");
        assert_eq!(json_body(&body)["roles"][7], "Software Engineer");
    }

    #[tokio::test]
    async fn test_prompt_endpoint_validates_resume() {
        let (status, body) = send(
            &app(None),
            post_json(
                "/api/v1/interview/prompt",
                json!({
                    "resume": { "skills": { "languages": ["Go", "go", 7] } },
                    "company": "Initech",
                    "role": "DevOps Engineer",
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["resume"]["skills"]["languages"], json!(["Go", "go"]));
        assert_eq!(body["resume"]["skills"]["tools"], json!([]));
        let prompt = body["prompt"].as_str().unwrap();
        assert!(prompt.contains("DevOps Engineer position at Initech"));
        assert!(prompt.contains("Not specified"));
    }

    #[tokio::test]
    async fn test_resume_endpoints() {
        let app = app(None);
        let (status, body) = send(
            &app,
            post_json(
                "/api/v1/resume/parse",
                json!({ "resume_text": "EDUCATION\n- BSc Computer Science\n" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json_body(&body)["sections"]["Education"],
            json!(["BSc Computer Science"])
        );

        let (status, body) = send(&app, post_json("/api/v1/resume/validate", Value::Null)).await;
        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["sections"], json!({}));
        assert_eq!(
            body["skills"],
            json!({ "languages": [], "frameworks": [], "tools": [] })
        );
    }

    fn multipart(parts: &[(&str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in parts {
            body.extend_from_slice(b"--BOUNDARY\r\n");
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            );
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b"--BOUNDARY--\r\n");

        Request::builder()
            .method("POST")
            .uri("/api/v1/interview/analyze")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_without_resume_is_bad_request() {
        let request = multipart(&[
            ("company", b"Acme".as_slice()),
            ("role", b"QA Engineer".as_slice()),
        ]);
        let (status, body) = send(&app(None), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["error"]["message"], "resume PDF is required");
    }

    #[tokio::test]
    async fn test_upload_of_unreadable_pdf_is_unprocessable() {
        let request = multipart(&[
            ("resume", b"this is not a pdf".as_slice()),
            ("company", b"Acme".as_slice()),
            ("role", b"QA Engineer".as_slice()),
        ]);
        let (status, body) = send(&app(None), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(&body)["error"]["code"], "PDF_ERROR");
    }
}
