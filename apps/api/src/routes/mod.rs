pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::{ats, dossier, extraction, matching, optimization, resumes};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction
        .route("/api/v1/cv/parse", post(extraction::handlers::handle_parse_cv))
        .route("/api/v1/jobs/parse", post(extraction::handlers::handle_parse_job))
        .route(
            "/api/v1/linkedin/parse",
            post(extraction::handlers::handle_parse_linkedin),
        )
        // Matching & optimization
        .route("/api/v1/matching/score", post(matching::handlers::handle_score))
        .route(
            "/api/v1/matching/optimize",
            post(optimization::handlers::handle_optimize),
        )
        .route("/api/v1/ats/check", post(ats::handlers::handle_ats_check))
        // Dossiers
        .route(
            "/api/v1/dossiers/match",
            post(dossier::handlers::handle_match_dossier),
        )
        // Resume builder
        .route(
            "/api/v1/resumes/import",
            post(resumes::handlers::handle_import_resume),
        )
        .route(
            "/api/v1/resumes/reorder",
            post(resumes::handlers::handle_reorder_resume),
        )
        .route(
            "/api/v1/resumes/score",
            post(resumes::handlers::handle_score_resume),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::extraction::prompts::{CV_PARSE_SYSTEM, JOB_PARSE_SYSTEM};
    use crate::llm_client::testing::FakeLanguageModel;
    use crate::matching::{LexicalMatchScorer, MatchWeights};

    fn test_config() -> Config {
        Config {
            openai_api_key: "sk-test".to_string(),
            openai_base_url: "http://localhost:0".to_string(),
            chat_model: "test-chat".to_string(),
            embedding_model: "test-embed".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            enable_semantic_scoring: false,
            optimization_max_iterations: 3,
            optimization_target_score: 80,
            embedding_cache_capacity: 0,
        }
    }

    fn app(llm: FakeLanguageModel) -> Router {
        build_router(AppState {
            llm: Arc::new(llm),
            scorer: Arc::new(LexicalMatchScorer {
                weights: MatchWeights::default(),
            }),
            config: test_config(),
        })
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(FakeLanguageModel::new()), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_blank_cv_is_bad_request() {
        let (status, body) = send(
            app(FakeLanguageModel::new()),
            "POST",
            "/api/v1/cv/parse",
            Some(json!({"cv_text": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_missing_field_uses_error_envelope() {
        let (status, body) = send(
            app(FakeLanguageModel::new()),
            "POST",
            "/api/v1/cv/parse",
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("cv_text"));
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_envelope() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/ats/check")
            .header("content-type", "application/json")
            .body(Body::from("{\"cv_text\": "))
            .unwrap();
        let response = app(FakeLanguageModel::new()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_llm_failure_is_bad_gateway() {
        // No scripted reply: the fake model errors out
        let (status, body) = send(
            app(FakeLanguageModel::new()),
            "POST",
            "/api/v1/jobs/parse",
            Some(json!({"job_text": "Comptable H/F"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "LLM_ERROR");
    }

    #[tokio::test]
    async fn test_match_score_end_to_end() {
        let llm = FakeLanguageModel::new()
            .respond(
                CV_PARSE_SYSTEM,
                r#"{"experiences": [{"title": "Comptable", "start_date": "2015-01"}],
                    "skills": [{"name": "Sage", "level": "expert"}]}"#,
            )
            .respond(
                JOB_PARSE_SYSTEM,
                r#"{"title": "Comptable", "min_experience_years": 3,
                    "required_skills": [{"name": "Sage", "level": "avance"}],
                    "keywords": [{"keyword": "Sage", "weight": 1.0}]}"#,
            );
        let (status, body) = send(
            app(llm),
            "POST",
            "/api/v1/matching/score",
            Some(json!({
                "cv_text": "Comptable depuis 2015, expert Sage",
                "job_text": "Comptable H/F maîtrisant Sage"
            })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["report"]["scorer_backend"], "lexical");
        assert_eq!(body["report"]["matched_keywords"], json!(["Sage"]));
        assert_eq!(body["job"]["title"], "Comptable");
        let score = body["report"]["overall_score"].as_u64().unwrap();
        assert!(score > 50 && score <= 100);
    }

    #[tokio::test]
    async fn test_ats_check_route() {
        let (status, body) = send(
            app(FakeLanguageModel::new()),
            "POST",
            "/api/v1/ats/check",
            Some(json!({"cv_text": "Jean Dupont\nDéveloppeur"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["issues"][0]["code"], "missing_email");
        assert_eq!(body["issues"][0]["severity"], "critical");
    }

    #[tokio::test]
    async fn test_resume_import_then_reorder() {
        let llm = FakeLanguageModel::new().respond(
            CV_PARSE_SYSTEM,
            r#"{"summary": "Comptable rigoureuse",
                "experiences": [{"title": "Comptable", "company": "KPMG"}],
                "skills": [{"name": "Sage"}]}"#,
        );
        let router = app(llm);

        let (status, resume) = send(
            router.clone(),
            "POST",
            "/api/v1/resumes/import",
            Some(json!({"cv_text": "Comptable chez KPMG"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let order: Vec<String> = resume["metadata"]["section_order"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert!(order.len() >= 2);

        let last = order.last().unwrap().clone();
        let (status, reordered) = send(
            router.clone(),
            "POST",
            "/api/v1/resumes/reorder",
            Some(json!({"resume": resume, "section_order": [last]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(reordered["sections"][0]["id"], json!(last));

        let (status, body) = send(
            router,
            "POST",
            "/api/v1/resumes/reorder",
            Some(json!({"resume": reordered, "section_order": ["inexistante"]})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_dossier_match_route() {
        let llm = FakeLanguageModel::new().respond(
            CV_PARSE_SYSTEM,
            r#"{"experiences": [{"title": "Comptable"}]}"#,
        );
        let (status, body) = send(
            app(llm),
            "POST",
            "/api/v1/dossiers/match",
            Some(json!({
                "dossier": {"title": "Comptable", "skills": [{"skill": "Sage"}]},
                "candidates": [{"name": "Alice", "cv_text": "Comptable Sage"}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["matches"][0]["name"], "Alice");
        assert!(body["failures"].as_array().unwrap().is_empty());
    }
}
