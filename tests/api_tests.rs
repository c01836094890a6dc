use std::sync::Arc;

use axum::{http::StatusCode, routing::get, Json, Router};
use axum_test::TestServer;
use serde_json::{json, Value};

use movie_rec_api::{
    config::DEFAULT_POSTER_URL,
    dataset::{Dataset, SimilarityMatrix},
    error::{AppError, AppResult},
    middleware::request_id::REQUEST_ID_HEADER,
    models::{MovieRecord, Recommendation},
    routes::{create_router, with_middleware, AppState},
};

fn create_test_server() -> TestServer {
    let movies = ["Inception", "Interstellar", "The Prestige"]
        .into_iter()
        .map(MovieRecord::new)
        .collect();
    let similarity = SimilarityMatrix::from_rows(vec![
        vec![1.0, 0.9, 0.2],
        vec![0.9, 1.0, 0.3],
        vec![0.2, 0.3, 1.0],
    ])
    .unwrap();
    let dataset = Dataset::new(movies, similarity).unwrap();

    let state = Arc::new(AppState::new(dataset, DEFAULT_POSTER_URL));
    TestServer::new(create_router(state)).unwrap()
}

fn titles(body: &Value) -> Vec<&str> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|movie| movie["title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_home_page() {
    let server = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().contains("<form id=\"search\">"));
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["movies"], 3);
    assert!(body["loaded_at"].is_string());
}

#[tokio::test]
async fn test_recommend_exact_match() {
    let server = create_test_server();
    let response = server
        .get("/recommend")
        .add_query_param("movie", "  inception ")
        .await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(titles(&body), vec!["Interstellar", "The Prestige"]);
    assert_eq!(body[0]["poster"], DEFAULT_POSTER_URL);
}

#[tokio::test]
async fn test_recommend_is_idempotent() {
    let server = create_test_server();
    let first: Value = server
        .get("/recommend")
        .add_query_param("movie", "The Prestige")
        .await
        .json();
    let second: Value = server
        .get("/recommend")
        .add_query_param("movie", "The Prestige")
        .await
        .json();
    assert_eq!(first, second);
    assert_eq!(titles(&first), vec!["Interstellar", "Inception"]);
}

#[tokio::test]
async fn test_repeated_movie_parameter_uses_first_value() {
    let server = create_test_server();
    let response = server.get("/recommend?movie=Inception&movie=Heat").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(titles(&body), vec!["Interstellar", "The Prestige"]);
}

#[tokio::test]
async fn test_empty_first_movie_parameter_is_missing() {
    let server = create_test_server();
    let response = server.get("/recommend?movie=&movie=Inception").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Missing 'movie' parameter" }));
}

#[tokio::test]
async fn test_missing_movie_parameter() {
    let server = create_test_server();
    let response = server.get("/recommend").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Missing 'movie' parameter" }));
}

#[tokio::test]
async fn test_empty_movie_parameter() {
    let server = create_test_server();
    let response = server.get("/recommend").add_query_param("movie", "").await;
    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Missing 'movie' parameter" }));
}

#[tokio::test]
async fn test_misspelled_movie_gets_suggestions() {
    let server = create_test_server();
    let response = server
        .get("/recommend")
        .add_query_param("movie", "Incepton")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "Movie not found");
    assert_eq!(body["suggestions"][0], "Inception");
}

#[tokio::test]
async fn test_unknown_movie_without_suggestions() {
    let server = create_test_server();
    let response = server
        .get("/recommend")
        .add_query_param("movie", "Zzzzxyz")
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({
        "error": "Movie not found",
        "suggestions": []
    }));
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let server = create_test_server();
    let id = "4b5e2a6c-3c1f-4d2e-9f7a-1b2c3d4e5f60";
    let response = server
        .get("/health")
        .add_header(REQUEST_ID_HEADER, id)
        .await;
    assert_eq!(response.header(REQUEST_ID_HEADER), id);
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let server = create_test_server();
    let response = server.get("/health").await;
    let header = response.header(REQUEST_ID_HEADER);
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}

async fn failing_lookup() -> AppResult<Json<Vec<Recommendation>>> {
    Err(AppError::Internal(
        "row 42 is outside the similarity matrix (3 rows)".to_string(),
    ))
}

async fn panicking_lookup() -> Json<Vec<Recommendation>> {
    panic!("similarity row vanished")
}

fn create_failing_server() -> TestServer {
    let routes = Router::new()
        .route("/error", get(failing_lookup))
        .route("/panic", get(panicking_lookup));
    TestServer::new(with_middleware(routes)).unwrap()
}

#[tokio::test]
async fn test_internal_error_is_json_500() {
    let server = create_failing_server();
    let response = server.get("/error").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "error": "Internal server error",
        "details": "row 42 is outside the similarity matrix (3 rows)"
    }));
}

#[tokio::test]
async fn test_handler_panic_is_json_500() {
    let server = create_failing_server();
    let response = server.get("/panic").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    response.assert_json(&json!({
        "error": "Internal server error",
        "details": "similarity row vanished"
    }));

    let header = response.header(REQUEST_ID_HEADER);
    assert!(uuid::Uuid::parse_str(header.to_str().unwrap()).is_ok());
}
