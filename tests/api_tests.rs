use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use movie_trends::config::Config;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn spawn_app() -> Router {
    spawn_app_with(Config::default()).await
}

async fn spawn_app_with(mut config: Config) -> Router {
    let db_path =
        std::env::temp_dir().join(format!("movie-trends-api-test-{}.db", uuid::Uuid::new_v4()));
    config.general.database_path = format!("sqlite:{}", db_path.display());

    let state = movie_trends::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    movie_trends::api::router(state)
}

async fn post_search(app: &Router, body: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    (status, read_json(response).await)
}

async fn get_trending(app: &Router) -> Vec<Value> {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/movies/trending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    match read_json(response).await {
        Value::Array(items) => items,
        other => panic!("expected array, got {other}"),
    }
}

async fn read_json(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_first_search_creates_record() {
    let app = spawn_app().await;

    let (status, body) = post_search(
        &app,
        json!({"searchTerm": "Inception", "movieId": "27205", "posterUrl": "poster1.jpg"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["id"].is_number());
    assert_eq!(body["searchTerm"], "Inception");
    assert_eq!(body["movieId"], "27205");
    assert_eq!(body["count"], 1);
    assert_eq!(body["posterUrl"], "poster1.jpg");
    assert!(body["createdAt"].is_string());
    assert!(body["updatedAt"].is_string());
}

#[tokio::test]
async fn test_repeat_search_keeps_original_poster() {
    let app = spawn_app().await;

    let (_, first) = post_search(
        &app,
        json!({"searchTerm": "Inception", "movieId": "27205", "posterUrl": "poster1.jpg"}),
    )
    .await;
    let (status, second) = post_search(
        &app,
        json!({"searchTerm": "Inception", "movieId": "27205", "posterUrl": "poster2.jpg"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["count"], 2);
    assert_eq!(second["posterUrl"], "poster1.jpg");
    assert_eq!(second["createdAt"], first["createdAt"]);
}

#[tokio::test]
async fn test_poster_url_is_optional() {
    let app = spawn_app().await;

    let (status, body) = post_search(&app, json!({"searchTerm": "Heat", "movieId": "949"})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["posterUrl"].is_null());

    let (status, body) = post_search(
        &app,
        json!({"searchTerm": "Up", "movieId": "14160", "posterUrl": null}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["posterUrl"].is_null());
}

#[tokio::test]
async fn test_validation_errors_name_fields() {
    let app = spawn_app().await;

    let (status, body) = post_search(&app, json!({"searchTerm": "", "movieId": "27205"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["fields"]["searchTerm"], "Search term is required");
    assert!(body["fields"].get("movieId").is_none());

    let (status, body) = post_search(&app, json!({"searchTerm": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["searchTerm"], "Search term is required");
    assert_eq!(body["fields"]["movieId"], "Movie ID is required");

    let long_url = "x".repeat(501);
    let (status, body) = post_search(
        &app,
        json!({"searchTerm": "Heat", "movieId": "949", "posterUrl": long_url}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["posterUrl"].is_string());

    // Nothing reached the store.
    assert!(get_trending(&app).await.is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies/search")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/movies/search")
                .body(Body::from(r#"{"searchTerm":"Heat","movieId":"949"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_trending_top_five_by_count() {
    let app = spawn_app().await;

    assert!(get_trending(&app).await.is_empty());

    let searches = [
        ("Heat", 1),
        ("Up", 3),
        ("Jaws", 2),
        ("Seven", 5),
        ("Rocky", 1),
        ("Fargo", 4),
    ];
    for (term, times) in searches {
        for _ in 0..times {
            let (status, _) = post_search(&app, json!({"searchTerm": term, "movieId": "1"})).await;
            assert_eq!(status, StatusCode::OK);
        }
    }

    let trending = get_trending(&app).await;
    let terms: Vec<_> = trending
        .iter()
        .map(|r| r["searchTerm"].as_str().unwrap())
        .collect();
    let counts: Vec<_> = trending.iter().map(|r| r["count"].as_i64().unwrap()).collect();

    assert_eq!(terms, ["Seven", "Fargo", "Up", "Jaws", "Heat"]);
    assert_eq!(counts, [5, 4, 3, 2, 1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_count_every_search() {
    let app = spawn_app().await;

    let requests = (0..8).map(|_| {
        let app = app.clone();
        tokio::spawn(async move {
            post_search(&app, json!({"searchTerm": "Arrival", "movieId": "329865"})).await
        })
    });

    for result in futures::future::join_all(requests).await {
        let (status, _) = result.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let trending = get_trending(&app).await;
    assert_eq!(trending.len(), 1);
    assert_eq!(trending[0]["count"], 8);
}

async fn preflight(app: &Router, origin: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/movies/search")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type,x-custom")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_cors_preflight_allowed_origin() {
    let app = spawn_app().await;

    let response = preflight(&app, "http://localhost:5173").await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");

    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap();
    for method in ["GET", "POST", "PUT", "DELETE", "OPTIONS"] {
        assert!(methods.contains(method), "missing {method} in {methods}");
    }

    let allowed_headers = headers[header::ACCESS_CONTROL_ALLOW_HEADERS]
        .to_str()
        .unwrap();
    assert!(allowed_headers.contains("x-custom"));
}

#[tokio::test]
async fn test_cors_wildcard_and_configured_origins() {
    let mut config = Config::default();
    config.server.frontend_url = "https://movies.example.com".to_string();
    let app = spawn_app_with(config).await;

    let response = preflight(&app, "https://my-app.railway.app").await;
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://my-app.railway.app"
    );

    let response = preflight(&app, "https://movies.example.com").await;
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://movies.example.com"
    );
}

#[tokio::test]
async fn test_cors_rejects_unknown_origin() {
    let app = spawn_app().await;

    let response = preflight(&app, "https://evil.example.com").await;
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/movies/trending")
                .header(header::ORIGIN, "https://evil.example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_simple_request_gets_cors_headers() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/movies/trending")
                .header(header::ORIGIN, "http://localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost"
    );
}

#[tokio::test]
async fn test_health_and_metrics() {
    let app = spawn_app().await;

    post_search(&app, json!({"searchTerm": "Heat", "movieId": "949"})).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["trackedSearches"], 1);

    // No recorder installed in tests.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .header(header::ORIGIN, "http://localhost")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none()
    );
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = spawn_app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/movies/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
