//! Routing, authentication and validation behaviour that is decided before
//! any query runs. Uses a pool that never connects, so no database is needed.

mod common;

use axum::http::{Method, StatusCode};
use common::{create_test_app, json_request, lazy_pool, parse_response_body, test_config};
use serde_json::json;
use tower::ServiceExt;
use translation_api::middleware::{init_metrics, REQUEST_ID_HEADER};

#[tokio::test]
async fn test_protected_routes_require_token() {
    let app = create_test_app(test_config(), lazy_pool());

    let requests = [
        (Method::GET, "/api/translations"),
        (Method::POST, "/api/translations"),
        (Method::GET, "/api/translations/1"),
        (Method::PUT, "/api/translations/1"),
        (Method::PATCH, "/api/translations/1"),
        (Method::DELETE, "/api/translations/1"),
        (Method::GET, "/api/translations/locale/en"),
    ];

    for (method, uri) in requests {
        let response = app
            .clone()
            .oneshot(json_request(method.clone(), uri, None, None))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{} {} should require a token",
            method,
            uri
        );

        let body = parse_response_body(response).await;
        assert_eq!(body["error"], "unauthenticated");
        assert_eq!(body["message"], "Unauthenticated.");
    }
}

#[tokio::test]
async fn test_malformed_token_rejected_without_lookup() {
    let app = create_test_app(test_config(), lazy_pool());

    let response = app
        .oneshot(json_request(
            Method::GET,
            "/api/translations",
            Some("not-a-real-token"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_missing_fields_is_validation_error() {
    let app = create_test_app(test_config(), lazy_pool());

    let response = app
        .oneshot(json_request(Method::POST, "/api/login", None, Some(json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "password"]);
}

#[tokio::test]
async fn test_login_served_without_api_prefix() {
    let app = create_test_app(test_config(), lazy_pool());

    let response = app
        .oneshot(json_request(Method::POST, "/login", None, Some(json!({}))))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_login_invalid_email_is_validation_error() {
    let app = create_test_app(test_config(), lazy_pool());

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/login",
            None,
            Some(json!({"email": "not-an-email", "password": "secret"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = parse_response_body(response).await;
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_login_malformed_json_is_validation_error() {
    let app = create_test_app(test_config(), lazy_pool());

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/login")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = parse_response_body(response).await;
    assert_eq!(body["details"][0]["field"], "body");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app(test_config(), lazy_pool());

    let mut request = json_request(Method::GET, "/api/translations", None, None);
    request
        .headers_mut()
        .insert(REQUEST_ID_HEADER, "test-request-42".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "test-request-42"
    );
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = create_test_app(test_config(), lazy_pool());

    let response = app
        .oneshot(json_request(Method::GET, "/api/translations", None, None))
        .await
        .unwrap();

    let id = response.headers().get(REQUEST_ID_HEADER).unwrap();
    assert!(!id.is_empty());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app(test_config(), lazy_pool());

    let response = app
        .oneshot(json_request(Method::GET, "/api/unknown", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_metrics_endpoint_renders_after_init() {
    init_metrics().unwrap();
    let app = create_test_app(test_config(), lazy_pool());

    let response = app
        .oneshot(json_request(Method::GET, "/metrics", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
