//! Axum router configuration with middleware.
//!
//! All application routes are under `/api/`, plus an unauthenticated
//! `/health`. Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Accounts and sessions
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/session", get(handlers::auth::session))
        // AI chat
        .route(
            "/ai/chat",
            get(handlers::chat::list_chats).post(handlers::chat::send_message),
        )
        .route(
            "/ai/fix-classifications",
            post(handlers::chat::fix_chat_classifications),
        )
        // Notifications
        .route(
            "/notifications",
            get(handlers::notifications::list_notifications)
                .post(handlers::notifications::create_notification),
        )
        .route(
            "/notifications/clear",
            delete(handlers::notifications::clear_notifications),
        )
        .route(
            "/notifications/{id}/read",
            patch(handlers::notifications::mark_read),
        )
        // Appointments
        .route(
            "/appointments",
            get(handlers::appointments::list_appointments)
                .post(handlers::appointments::create_appointment),
        )
        .route(
            "/appointments/{id}",
            patch(handlers::appointments::update_appointment),
        )
        // Tasks
        .route(
            "/tasks",
            get(handlers::tasks::list_tasks)
                .post(handlers::tasks::create_task)
                .patch(handlers::tasks::update_task),
        )
        // Patients
        .route("/patients", get(handlers::patients::list_patients))
        .route("/patients/all", get(handlers::patients::patient_directory))
        .route("/patients/assign", post(handlers::patients::assign_patient))
        .route("/patients/{id}", get(handlers::patients::get_patient))
        // Dashboard
        .route("/dashboard/stats", get(handlers::dashboard::stats))
        .route(
            "/dashboard/recent-activity",
            get(handlers::dashboard::recent_activity),
        )
        .route(
            "/dashboard/refresh-stats",
            post(handlers::dashboard::refresh_stats),
        );

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(handlers::health::health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use clinitune_core::llm::box_provider::BoxLlmProvider;
    use clinitune_core::llm::provider::LlmProvider;
    use clinitune_infra::config::database_url;
    use clinitune_infra::sqlite::pool::DatabasePool;
    use clinitune_types::config::AppConfig;
    use clinitune_types::llm::{CompletionRequest, CompletionResponse, LlmError};

    /// Replies with the same text to every prompt.
    struct FixedReply(&'static str);

    impl LlmProvider for FixedReply {
        fn name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-model"
        }

        async fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            Ok(CompletionResponse {
                text: self.0.to_string(),
                model: "fixed-model".to_string(),
                finish_reason: Some("STOP".to_string()),
            })
        }
    }

    async fn test_app(llm: Option<BoxLlmProvider>) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let pool = DatabasePool::new(&database_url(dir.path())).await.unwrap();
        let state = AppState::from_pool(pool, &AppConfig::default(), llm, dir.path().to_path_buf());
        (build_router(state), dir)
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Sign up and log in; returns (token, user id).
    async fn register(app: &Router, name: &str, email: &str, role: &str) -> (String, String) {
        let (status, _) = call(
            app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"name": name, "email": email, "password": "password", "role": role})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = call(
            app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": email, "password": "password"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// A clinician with one assigned patient; returns (clinician token, patient token, patient id).
    async fn care_pair(app: &Router) -> (String, String, String) {
        let (clinician, _) = register(app, "Dr. Sarah Smith", "clinician@demo.com", "clinician").await;
        let (patient, patient_id) = register(app, "John Doe", "patient@demo.com", "patient").await;
        let (status, _) = call(
            app,
            "POST",
            "/api/patients/assign",
            Some(&clinician),
            Some(json!({"patientEmail": "patient@demo.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        (clinician, patient, patient_id)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = test_app(None).await;
        let (status, body) = call(&app, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_signup_login_session_logout() {
        let (app, _dir) = test_app(None).await;
        let (token, _) = register(&app, "Dr. Sarah Smith", "clinician@demo.com", "clinician").await;

        let (status, body) = call(&app, "GET", "/api/auth/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["redirect"], "/dashboard/clinician");
        assert_eq!(body["user"]["email"], "clinician@demo.com");
        assert!(body["user"].get("passwordHash").is_none());

        let (status, _) = call(&app, "POST", "/api/auth/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = call(&app, "GET", "/api/auth/session", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_signup_validation() {
        let (app, _dir) = test_app(None).await;
        let (status, body) = call(
            &app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"name": "A", "email": "a@b.c", "password": "123", "role": "patient"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Password must be at least 6 characters long");

        register(&app, "John Doe", "patient@demo.com", "patient").await;
        let (status, _) = call(
            &app,
            "POST",
            "/api/auth/signup",
            None,
            Some(json!({"name": "J", "email": "patient@demo.com", "password": "password", "role": "patient"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"email": "patient@demo.com", "password": "wrong-password"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_session_cookie_is_accepted() {
        let (app, _dir) = test_app(None).await;
        let (token, _) = register(&app, "John Doe", "patient@demo.com", "patient").await;
        let request = Request::builder()
            .uri("/api/auth/session")
            .header("cookie", format!("clinitune_session={token}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_requests_without_token_are_rejected() {
        let (app, _dir) = test_app(None).await;
        for uri in ["/api/notifications", "/api/appointments", "/api/dashboard/stats"] {
            let (status, _) = call(&app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_chat_without_llm_is_unavailable() {
        let (app, _dir) = test_app(None).await;
        let (token, id) = register(&app, "John Doe", "patient@demo.com", "patient").await;
        let (status, body) = call(
            &app,
            "POST",
            "/api/ai/chat",
            Some(&token),
            Some(json!({"message": "hello", "patientId": id})),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].as_str().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_chat_request_checks() {
        let (app, _dir) = test_app(Some(BoxLlmProvider::new(FixedReply("ok")))).await;
        let (clinician, patient, patient_id) = care_pair(&app).await;

        let (status, _) = call(
            &app,
            "POST",
            "/api/ai/chat",
            Some(&patient),
            Some(json!({"message": "  ", "patientId": patient_id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "POST",
            "/api/ai/chat",
            Some(&patient),
            Some(json!({"message": "hi", "patientId": uuid::Uuid::now_v7()})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = call(
            &app,
            "POST",
            "/api/ai/chat",
            Some(&clinician),
            Some(json!({"message": "hi", "patientId": patient_id})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_critical_chat_escalates_and_pages_clinician() {
        let (app, _dir) =
            test_app(Some(BoxLlmProvider::new(FixedReply("I'm here for you.")))).await;
        let (clinician, patient, patient_id) = care_pair(&app).await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/ai/chat",
            Some(&patient),
            Some(json!({"message": "I want to die", "patientId": patient_id})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["response"], "I'm here for you.");

        let uri = format!("/api/ai/chat?patientId={patient_id}");
        let (status, body) = call(&app, "GET", &uri, Some(&clinician), None).await;
        assert_eq!(status, StatusCode::OK);
        let chat = &body["chats"][0];
        assert_eq!(chat["alertLevel"], "high");
        assert_eq!(chat["emotionalState"], "critical");
        assert_eq!(chat["messages"].as_array().unwrap().len(), 2);

        let (_, body) = call(&app, "GET", "/api/notifications", Some(&clinician), None).await;
        let titles: Vec<&str> = body["notifications"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|n| n["title"].as_str())
            .collect();
        assert!(titles.contains(&"URGENT: John Doe - Critical Alert"));

        let (status, body) = call(&app, "GET", "/api/dashboard/stats", Some(&clinician), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["aiAlerts"], 1);
        assert_eq!(body["activePatients"], 1);
    }

    #[tokio::test]
    async fn test_clinician_only_routes_reject_patients() {
        let (app, _dir) = test_app(None).await;
        let (patient, _) = register(&app, "John Doe", "patient@demo.com", "patient").await;
        for (method, uri) in [
            ("GET", "/api/dashboard/stats"),
            ("GET", "/api/dashboard/recent-activity"),
            ("POST", "/api/dashboard/refresh-stats"),
            ("POST", "/api/ai/fix-classifications"),
            ("GET", "/api/patients"),
        ] {
            let (status, _) = call(&app, method, uri, Some(&patient), None).await;
            assert_eq!(status, StatusCode::FORBIDDEN, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn test_assign_conflicts() {
        let (app, _dir) = test_app(None).await;
        let (first, _, _) = care_pair(&app).await;
        let (second, _) = register(&app, "Dr. Lee", "lee@demo.com", "clinician").await;

        let assign = json!({"patientEmail": "patient@demo.com"});
        let (status, _) =
            call(&app, "POST", "/api/patients/assign", Some(&first), Some(assign.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) =
            call(&app, "POST", "/api/patients/assign", Some(&second), Some(assign)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        let (status, _) = call(
            &app,
            "POST",
            "/api/patients/assign",
            Some(&second),
            Some(json!({"patientEmail": "nobody@demo.com"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_appointment_and_task_flow() {
        let (app, _dir) = test_app(None).await;
        let (clinician, patient, patient_id) = care_pair(&app).await;

        let date = (chrono::Utc::now() + chrono::Duration::days(2)).to_rfc3339();
        let (status, body) = call(
            &app,
            "POST",
            "/api/appointments",
            Some(&clinician),
            Some(json!({"patientId": patient_id, "date": date, "type": "Therapy Session"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let appointment_id = body["appointment"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(&app, "GET", "/api/appointments", Some(&patient), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["appointments"][0]["clinicianName"], "Dr. Sarah Smith");

        let (status, body) = call(
            &app,
            "PATCH",
            &format!("/api/appointments/{appointment_id}"),
            Some(&clinician),
            Some(json!({"status": "completed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["appointment"]["status"], "completed");

        let due = (chrono::Utc::now() + chrono::Duration::days(3)).to_rfc3339();
        let (status, body) = call(
            &app,
            "POST",
            "/api/tasks",
            Some(&clinician),
            Some(json!({
                "title": "Daily Mood Journal",
                "description": "Write three lines each evening",
                "patientId": patient_id,
                "dueDate": due,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let task_id = body["task"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "PATCH",
            "/api/tasks",
            Some(&patient),
            Some(json!({"taskId": task_id, "completed": true})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["task"]["completed"], true);

        let (_, body) = call(&app, "GET", "/api/notifications", Some(&patient), None).await;
        assert_eq!(body["notifications"].as_array().unwrap().len(), 2);

        let (status, body) = call(&app, "GET", "/api/patients", Some(&clinician), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["patients"][0]["completionRate"], 100);
    }

    #[tokio::test]
    async fn test_notification_inbox() {
        let (app, _dir) = test_app(None).await;
        let (token, _) = register(&app, "John Doe", "patient@demo.com", "patient").await;

        let (status, body) = call(
            &app,
            "POST",
            "/api/notifications",
            Some(&token),
            Some(json!({"title": "Reminder", "message": "Drink water"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = body["notification"]["id"].as_str().unwrap().to_string();

        let (status, body) = call(
            &app,
            "PATCH",
            &format!("/api/notifications/{id}/read"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["notification"]["read"], true);

        let (status, _) = call(&app, "PATCH", "/api/notifications/not-a-uuid/read", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(&app, "DELETE", "/api/notifications/clear", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        let (_, body) = call(&app, "GET", "/api/notifications", Some(&token), None).await;
        assert!(body["notifications"].as_array().unwrap().is_empty());
    }
}
