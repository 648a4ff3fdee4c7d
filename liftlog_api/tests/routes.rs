//! HTTP-level tests for the liftlog API router.
//!
//! Each test builds a router over a fresh temporary data directory and drives
//! it in-process with `tower::ServiceExt::oneshot`.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use liftlog_api::{router, AppState};
use liftlog_core::{FileStore, ServiceSettings, WorkoutService};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn setup() -> (TempDir, Router) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let service = WorkoutService::new(
        FileStore::new(temp_dir.path()),
        ServiceSettings::default(),
    );
    (temp_dir, router(AppState::new(service)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post_workout(app: &Router, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, "/workouts", Some(body)).await
}

#[tokio::test]
async fn test_create_workout_returns_201_with_derived_metrics() {
    let (_dir, app) = setup();

    let (status, body) = post_workout(
        &app,
        json!({
            "exerciseName": "  Bench   Press ",
            "workoutDate": "2024-06-01",
            "sets": [{"reps": 5, "weight": 100}, {"reps": 3, "weight": "100"}]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let item = &body["item"];
    assert_eq!(item["exerciseName"], "Bench Press");
    assert_eq!(item["exerciseNorm"], "bench press");
    assert_eq!(item["workoutDate"], "2024-06-01");
    assert_eq!(item["ownerId"], "default");
    assert!(item["createdAt"].is_i64());
    assert_eq!(item["sets"][1]["setNumber"], 2);
    assert_eq!(item["derived"]["topSetWeight"], 100.0);
    assert_eq!(item["derived"]["topSetReps"], 5);
    assert_eq!(item["derived"]["est1rm"], 116.67);
}

#[tokio::test]
async fn test_validation_errors_are_400_with_message() {
    let (_dir, app) = setup();

    let too_many_sets = vec![json!({"reps": 5, "weight": 60}); 21];
    let cases = [
        (json!({"exerciseName": "   ", "sets": [{"reps": 5, "weight": 1}]}), "exerciseName is required"),
        (
            json!({"exerciseName": "Squat", "workoutDate": "2024-13-40", "sets": [{"reps": 5, "weight": 1}]}),
            "workoutDate is invalid",
        ),
        (
            json!({"exerciseName": "Squat", "workoutDate": "June 1", "sets": [{"reps": 5, "weight": 1}]}),
            "workoutDate must be in YYYY-MM-DD format",
        ),
        (
            json!({"exerciseName": "Squat", "sets": [{"reps": 5, "weight": 1}, {"reps": 201, "weight": 1}]}),
            "set 2: reps must be an integer between 1 and 200",
        ),
        (
            json!({"exerciseName": "Squat", "sets": [{"reps": 5, "weight": 2500}]}),
            "set 1: weight must be a number between 0 and 2000",
        ),
        (
            json!({"exerciseName": "Squat", "sets": too_many_sets}),
            "sets must contain between 1 and 20 entries",
        ),
        (json!({"exerciseName": "Squat", "sets": "5x5"}), "sets must contain between 1 and 20 entries"),
    ];

    for (body, message) in cases {
        let (status, response) = post_workout(&app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "expected 400 for {}", message);
        assert_eq!(response["error"], message);
    }

    // Nothing was stored
    let (_, exercises) = send(&app, Method::GET, "/exercises", None).await;
    assert_eq!(exercises["items"], json!([]));
}

#[tokio::test]
async fn test_invalid_json_body_is_400() {
    let (_dir, app) = setup();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/workouts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "Request body must be valid JSON");
}

#[tokio::test]
async fn test_empty_body_requires_exercise_name() {
    let (_dir, app) = setup();
    let (status, body) = send(&app, Method::POST, "/workouts", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "exerciseName is required");
}

#[tokio::test]
async fn test_latest_and_history() {
    let (_dir, app) = setup();

    for (date, weight) in [("2024-06-01", 100.0), ("2024-06-03", 105.0), ("2024-06-02", 102.5)] {
        let (status, _) = post_workout(
            &app,
            json!({"exerciseName": "Squat", "workoutDate": date, "sets": [{"reps": 5, "weight": weight}]}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, latest) = send(&app, Method::GET, "/workouts/latest?exercise=SQUAT", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest["item"]["workoutDate"], "2024-06-03");

    let (status, history) = send(&app, Method::GET, "/workouts?exercise=squat", None).await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<_> = history["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["workoutDate"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2024-06-03", "2024-06-02", "2024-06-01"]);

    let (_, limited) = send(&app, Method::GET, "/workouts?exercise=squat&limit=2", None).await;
    assert_eq!(limited["items"].as_array().unwrap().len(), 2);

    let (_, clamped) = send(&app, Method::GET, "/workouts?exercise=squat&limit=-4", None).await;
    assert_eq!(clamped["items"].as_array().unwrap().len(), 1);

    let (_, fallback) = send(&app, Method::GET, "/workouts?exercise=squat&limit=lots", None).await;
    assert_eq!(fallback["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_latest_for_unknown_exercise_is_null() {
    let (_dir, app) = setup();
    let (status, body) = send(&app, Method::GET, "/workouts/latest?exercise=Deadlift", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "item": null }));
}

#[tokio::test]
async fn test_queries_require_exercise() {
    let (_dir, app) = setup();
    for uri in ["/workouts", "/workouts/latest", "/workouts?exercise=%20%20"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(body["error"], "exercise query parameter is required");
    }
}

#[tokio::test]
async fn test_exercises_sorted_by_recency() {
    let (_dir, app) = setup();

    for name in ["Squat", "Row", "squat "] {
        post_workout(
            &app,
            json!({"exerciseName": name, "sets": [{"reps": 5, "weight": 50}]}),
        )
        .await;
        // createdAt has millisecond resolution
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (status, body) = send(&app, Method::GET, "/exercises", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["exerciseName"], "squat");
    assert_eq!(items[0]["exerciseNorm"], "squat");
    assert_eq!(items[1]["exerciseName"], "Row");
    assert!(items[0]["updatedAt"].as_i64() > items[1]["updatedAt"].as_i64());
}

#[tokio::test]
async fn test_unknown_routes_are_404() {
    let (_dir, app) = setup();

    let (status, body) = send(&app, Method::GET, "/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");

    let (status, body) = send(&app, Method::DELETE, "/workouts", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not found");
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (_dir, app) = setup();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/exercises")
        .header(header::ORIGIN, "https://example.org")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn test_malformed_query_is_json_400() {
    let (_dir, app) = setup();

    for uri in [
        "/workouts?exercise=squat&exercise=bench",
        "/workouts/latest?exercise=squat&limit=1&limit=2",
    ] {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "uri {}", uri);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("duplicate field"), "message {}", message);
    }
}
