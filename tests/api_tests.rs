/// Router tests: requests go through the axum app, Namsor is mocked
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use rust_namsor_api::api;
use rust_namsor_api::config::Config;
use rust_namsor_api::handlers::AppState;
use rust_namsor_api::namsor_client::NamsorClient;
use rust_namsor_api::services::NameAnalysisService;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_state(server: &MockServer) -> Arc<AppState> {
    let config = Config {
        port: 0,
        namsor_api_key: "test_key".to_string(),
        namsor_base_url: server.uri(),
        namsor_account_url: server.uri(),
        request_timeout_secs: 5,
    };
    let namsor = NamsorClient::from_config(&config).unwrap();
    Arc::new(AppState {
        analysis: NameAnalysisService::new(Arc::new(namsor.clone())),
        namsor,
    })
}

async fn call(server: &MockServer, request: Request<Body>) -> (StatusCode, Value) {
    let response = api::router(create_test_state(server))
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let server = MockServer::start().await;
    let (status, body) = call(
        &server,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("healthy"));
}

#[tokio::test]
async fn test_operations_lists_every_kind() {
    let server = MockServer::start().await;
    let (status, body) = call(
        &server,
        Request::builder()
            .uri("/api/v1/operations")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maxBatchSize"], json!(200));
    let ops = body["operations"].as_array().unwrap();
    assert_eq!(ops.len(), 12);

    let gender = ops
        .iter()
        .find(|o| o["operation"] == json!("genderName"))
        .unwrap();
    assert_eq!(gender["endpoint"], json!("/api2/json/genderBatch"));
    assert_eq!(gender["geoEndpoint"], json!("/api2/json/genderGeoBatch"));
    assert_eq!(gender["requiredFields"], json!(["firstName"]));
}

#[tokio::test]
async fn test_analyze_returns_rows() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api2/json/parseNameGeoBatch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "personalNames": [{
                "script": "LATIN",
                "name": "Jean Dupont",
                "countryIso2": "FR",
                "firstLastName": { "firstName": "Jean", "lastName": "Dupont" }
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = call(
        &server,
        post_json(
            "/api/v1/analyze/splitFullNames",
            json!({ "entries": [ { "name": [ { "name": "Jean Dupont", "countryIso2": "FR" } ] } ] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{
            "script": "LATIN",
            "name": "Jean Dupont",
            "countryIso2": "FR",
            "firstName": "Jean",
            "lastName": "Dupont"
        }])
    );
}

#[tokio::test]
async fn test_analyze_unknown_operation() {
    let server = MockServer::start().await;
    let (status, body) = call(
        &server,
        post_json("/api/v1/analyze/horoscope", json!({ "entries": [] })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("horoscope"));
}

#[tokio::test]
async fn test_analyze_validation_failure_is_user_facing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = call(
        &server,
        post_json(
            "/api/v1/analyze/ethnicityName",
            json!({ "entries": [ { "name": [ { "firstName": "Only" } ] } ] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        json!("no valid records: Please add at least one name with a Last Name.")
    );
}

#[tokio::test]
async fn test_analyze_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api2/json/genderFullBatch"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API Key"))
        .mount(&server)
        .await;

    let (status, body) = call(
        &server,
        post_json(
            "/api/v1/analyze/genderFullName",
            json!({ "entries": [ { "name": [ { "name": "Joe Smith" } ] } ] }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("401"));
    assert!(error.contains("Invalid API Key"));
    assert!(!error.contains("test_key"));
}

#[tokio::test]
async fn test_verify_credentials_route() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/add-on/get-user-data-and-features"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "plan": "BASIC" })))
        .mount(&server)
        .await;

    let (status, body) = call(
        &server,
        post_json("/api/v1/credentials/verify", json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], json!(true));
    assert_eq!(body["account"]["plan"], json!("BASIC"));
}
