use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use shub_database::Database;
use shub_domain::config::ApiConfig;
use shub_kernel::server::ApiState;
use shub_survey::Survey;
use tower::ServiceExt;
use utoipa_axum::router::OpenApiRouter;

async fn test_app() -> (Router, ApiState) {
    let db = Database::builder()
        .url("mem://")
        .session("shub", "survey-test")
        .migrations(shub_survey::migrations())
        .init()
        .await
        .expect("in-memory database");

    let slice = shub_survey::init(&db).expect("survey slice");

    let state = ApiState::builder()
        .config(ApiConfig::default())
        .db(db)
        .register_slice(slice)
        .build()
        .expect("api state");

    let (app, _doc) = OpenApiRouter::new()
        .merge(shub_survey::routes::router())
        .with_state(state.clone())
        .split_for_parts();

    (app, state)
}

async fn post_json(app: &Router, body: &Value) -> (StatusCode, Option<String>, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/survey-responses")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://survey.example")
        .body(Body::from(body.to_string()))
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, content_type, value)
}

async fn stored_count(state: &ApiState) -> i64 {
    let survey = state.get_slice::<Survey>().expect("survey slice registered");
    survey.repository.count().await.expect("count")
}

#[tokio::test]
async fn valid_submission_is_stored_and_normalized() {
    let (app, state) = test_app().await;

    let payload = json!({
        "name": "  Ana Souza  ",
        "email": "ana@example.com",
        "phone": "+55 11 91234-5678",
        "age": 34,
        "gender": "female",
        "diagnosis": "   ",
        "guardianFeatureChoices": ["Progress Charts", "File Access"],
        "openFeedback": "",
        "wantsUpdates": true
    });

    let (status, content_type, body) = post_json(&app, &payload).await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(content_type.is_some_and(|ct| ct.starts_with("application/json")));
    assert_eq!(body["success"], true);

    let id = body["id"].as_str().expect("id in receipt");
    assert_eq!(id.len(), 12);

    let survey = state.get_slice::<Survey>().expect("survey slice registered");
    let record = survey.repository.get(id).await.expect("get").expect("stored record");

    assert_eq!(record.name, "Ana Souza");
    assert_eq!(record.email, "ana@example.com");
    assert_eq!(record.diagnosis, None, "blank diagnosis must be dropped");
    assert_eq!(record.open_feedback, None, "empty feedback must be dropped");
    assert_eq!(record.gender.as_deref(), Some("female"));
    assert_eq!(record.wants_updates, Some(true));

    let mut choices = record.guardian_features.clone();
    choices.sort();
    assert_eq!(choices, vec!["File Access".to_owned(), "Progress Charts".to_owned()]);

    assert_eq!(stored_count(&state).await, 1);
}

#[tokio::test]
async fn missing_identity_yields_400_and_persists_nothing() {
    let (app, state) = test_app().await;

    for payload in [
        json!({ "email": "ana@example.com" }),
        json!({ "name": "Ana" }),
        json!({ "name": "   ", "email": "ana@example.com" }),
        json!({}),
    ] {
        let (status, _, body) = post_json(&app, &payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {payload}");
        assert_eq!(body["message"], "name and email are required");
    }

    assert_eq!(stored_count(&state).await, 0);
}

#[tokio::test]
async fn schema_violations_are_listed_by_field() {
    let (app, state) = test_app().await;

    let payload = json!({
        "name": "Ana",
        "email": "not-an-email",
        "age": 0,
        "gender": "robot",
        "therapistFeatureChoices": ["Teleportation"]
    });

    let (status, _, body) = post_json(&app, &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let message = body["message"].as_str().expect("message");
    assert!(message.contains("email"));
    assert!(message.contains("age"));
    assert!(message.contains("gender"));
    assert!(message.contains("therapistFeatureChoices"));

    assert_eq!(stored_count(&state).await, 0);
}

#[tokio::test]
async fn duplicate_email_yields_409_without_a_second_row() {
    let (app, state) = test_app().await;

    let first = json!({ "name": "Ana", "email": "ana@example.com", "phone": "111" });
    let (status, _, _) = post_json(&app, &first).await;
    assert_eq!(status, StatusCode::CREATED);

    let second = json!({ "name": "Outra Ana", "email": "ana@example.com", "phone": "222" });
    let (status, _, body) = post_json(&app, &second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered");

    assert_eq!(stored_count(&state).await, 1);
}

#[tokio::test]
async fn duplicate_phone_yields_409_without_a_second_row() {
    let (app, state) = test_app().await;

    let first = json!({ "name": "Ana", "email": "ana@example.com", "phone": "+55 11 91234-5678" });
    let (status, _, _) = post_json(&app, &first).await;
    assert_eq!(status, StatusCode::CREATED);

    let second = json!({ "name": "Bia", "email": "bia@example.com", "phone": "+55 11 91234-5678" });
    let (status, _, body) = post_json(&app, &second).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Phone already registered");

    assert_eq!(stored_count(&state).await, 1);
}

#[tokio::test]
async fn phoneless_submissions_do_not_collide() {
    let (app, state) = test_app().await;

    for email in ["ana@example.com", "bia@example.com"] {
        let payload = json!({ "name": "Respondent", "email": email, "phone": "  " });
        let (status, _, _) = post_json(&app, &payload).await;
        assert_eq!(status, StatusCode::CREATED, "email: {email}");
    }

    assert_eq!(stored_count(&state).await, 2);
}

#[tokio::test]
async fn unknown_wire_fields_are_rejected_with_the_error_envelope() {
    let (app, state) = test_app().await;

    let payload = json!({ "name": "Ana", "email": "ana@example.com", "favoriteColor": "blue" });
    let (status, _, body) = post_json(&app, &payload).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let message = body["message"].as_str().expect("message envelope");
    assert!(message.contains("favoriteColor"), "got: {message}");

    assert_eq!(stored_count(&state).await, 0);
}

#[tokio::test]
async fn malformed_bodies_get_the_error_envelope() {
    let (app, state) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/survey-responses")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("JSON error envelope");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));

    assert_eq!(stored_count(&state).await, 0);
}

#[tokio::test]
async fn api_responses_carry_json_content_type_and_cors_headers() {
    let (app, _state) = test_app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/survey-responses")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://survey.example")
        .body(Body::from("{}"))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .expect("content type");
    assert!(content_type.starts_with("application/json"));

    assert!(
        response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "CORS headers missing"
    );
}
