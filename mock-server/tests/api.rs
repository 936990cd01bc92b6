use axum::http::{self, Request, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine};
use http_body_util::BodyExt;
use mock_server::{app, Address, ServiceError, API_KEY, API_SECRET};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn lookup_request(uri: &str, key: &str, secret: &str) -> Request<String> {
    let token = STANDARD.encode(format!("{key}:{secret}"));
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, format!("Basic {token}"))
        .body(String::new())
        .unwrap()
}

fn authorized(uri: &str) -> Request<String> {
    lookup_request(uri, API_KEY, API_SECRET)
}

// --- lookup ---

#[tokio::test]
async fn known_address_without_addition() {
    let resp = app()
        .oneshot(authorized("/addresses/postcode/2012ES/30/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let address: Address = body_json(resp).await;
    assert_eq!(address.street, "Julianastraat");
    assert_eq!(address.house_number, 30);
    assert_eq!(address.house_number_addition.as_deref(), Some(""));
}

#[tokio::test]
async fn postcode_is_case_insensitive() {
    let resp = app()
        .oneshot(authorized("/addresses/postcode/2012es/30/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn known_addition_is_echoed() {
    let resp = app()
        .oneshot(authorized("/addresses/postcode/2011DW/9/a"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let address: Address = body_json(resp).await;
    assert_eq!(address.house_number_addition.as_deref(), Some("A"));
    assert_eq!(address.house_number_additions, vec!["", "A", "B"]);
}

#[tokio::test]
async fn unknown_addition_is_null() {
    let resp = app()
        .oneshot(authorized("/addresses/postcode/2011DW/9/ZZZ"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert!(body["houseNumberAddition"].is_null());
}

#[tokio::test]
async fn unknown_address_returns_404() {
    let resp = app()
        .oneshot(authorized("/addresses/postcode/1234ZZ/1234/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: ServiceError = body_json(resp).await;
    assert_eq!(err.exception_id, mock_server::ADDRESS_NOT_FOUND);
}

#[tokio::test]
async fn malformed_input_returns_400() {
    let resp = app()
        .oneshot(authorized("/addresses/postcode/0123AB/1/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ServiceError = body_json(resp).await;
    assert_eq!(err.exception_id, mock_server::INVALID_POSTCODE);

    let resp = app()
        .oneshot(authorized("/addresses/postcode/2012ES/abc/"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: ServiceError = body_json(resp).await;
    assert_eq!(err.exception_id, mock_server::INVALID_HOUSE_NUMBER);
}

#[tokio::test]
async fn rate_limited_postcode_returns_plain_503() {
    let resp = app()
        .oneshot(authorized("/addresses/postcode/9999ZZ/1/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(&body_bytes(resp).await[..], b"Service Unavailable");
}

// --- authentication ---

#[tokio::test]
async fn missing_credentials_return_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/addresses/postcode/2012ES/30/")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ServiceError = body_json(resp).await;
    assert_eq!(err.exception_id, mock_server::NOT_AUTHORIZED);
}

#[tokio::test]
async fn wrong_key_returns_not_authorized() {
    let resp = app()
        .oneshot(lookup_request("/addresses/postcode/2012ES/30/", "nobody", API_SECRET))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ServiceError = body_json(resp).await;
    assert_eq!(err.exception_id, mock_server::NOT_AUTHORIZED);
}

#[tokio::test]
async fn wrong_secret_returns_password_not_correct() {
    let resp = app()
        .oneshot(lookup_request("/addresses/postcode/2012ES/30/", API_KEY, "guess"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let err: ServiceError = body_json(resp).await;
    assert_eq!(err.exception_id, mock_server::PASSWORD_NOT_CORRECT);
}

#[tokio::test]
async fn unknown_route_returns_404_without_body() {
    let resp = app()
        .oneshot(authorized("/addresses/2012ES/30/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_bytes(resp).await.is_empty());
}
