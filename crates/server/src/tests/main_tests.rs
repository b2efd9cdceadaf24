use super::*;
use axum::{body, body::Body, http::Request};
use server_api::identity::mint_session_token;
use shared::protocol::SessionProfile;
use tower::ServiceExt;

use crate::config::DEFAULT_SESSION_COOKIE;

fn test_app() -> Router {
    let state = build_state(&Settings::default()).expect("state");
    build_router(Arc::new(state))
}

fn signed_in(uri: &str, token: &str) -> Request<Body> {
    Request::get(uri)
        .header(
            header::COOKIE,
            format!("theme=dark; {DEFAULT_SESSION_COOKIE}={token}"),
        )
        .body(Body::empty())
        .expect("request")
}

fn anonymous(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request")
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
}

#[tokio::test]
async fn healthz_bypasses_the_gate() {
    let response = test_app().oneshot(anonymous("/healthz")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(bytes.as_ref(), b"ok");
}

#[tokio::test]
async fn anonymous_orders_request_redirects_to_landing() {
    let response = test_app()
        .oneshot(anonymous("/dashboard/orders"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn signed_in_landing_request_redirects_to_dashboard() {
    let response = test_app()
        .oneshot(signed_in("/", "opaque-token"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/dashboard");
}

#[tokio::test]
async fn anonymous_landing_is_served() {
    let response = test_app().oneshot(anonymous("/")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["signInUrl"], "/api/auth/signin");
}

#[tokio::test]
async fn blank_session_cookie_counts_as_anonymous() {
    let response = test_app()
        .oneshot(signed_in("/dashboard", "   "))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn dashboard_greets_profile_from_session_token() {
    let token = mint_session_token(
        DEV_SESSION_SECRET,
        "google-42",
        &SessionProfile {
            name: Some("Grace Hopper".into()),
            email: None,
            image: None,
        },
        600,
    )
    .expect("token");
    let response = test_app()
        .oneshot(signed_in("/dashboard", &token))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["greeting"], "Hello, Grace!");
    assert_eq!(json["stats"][0]["value"], "10");
    assert_eq!(json["navigation"][0]["active"], true);
}

#[tokio::test]
async fn unreadable_token_still_admits_but_without_profile() {
    let response = test_app()
        .oneshot(signed_in("/dashboard", "opaque-token"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["greeting"], "Hello, User!");
    assert_eq!(json["avatarInitial"], "U");
}

#[tokio::test]
async fn orders_filter_keeps_status_counts_over_full_catalog() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(signed_in("/dashboard/orders?status=Preparing", "t"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    let ids: Vec<_> = json["orders"]
        .as_array()
        .expect("orders")
        .iter()
        .map(|row| row["id"].as_str().expect("id").to_string())
        .collect();
    assert_eq!(ids, vec!["PZA010", "PZA006", "PZA003"]);
    assert_eq!(json["statusCounts"]["Preparing"], 3);

    let response = app
        .oneshot(signed_in(
            "/dashboard/orders?status=Preparing&search=Emily",
            "t",
        ))
        .await
        .expect("response");
    let json = json_body(response).await;
    assert_eq!(json["shown"], 1);
    assert_eq!(json["total"], 10);
    assert_eq!(json["statusCounts"]["Preparing"], 3);
    assert_eq!(json["caption"], "Showing 1 of 10 orders");
}

#[tokio::test]
async fn orders_sort_parameters_are_applied() {
    let response = test_app()
        .oneshot(signed_in("/dashboard/orders?sort=customerName&direction=asc", "t"))
        .await
        .expect("response");
    let json = json_body(response).await;
    assert_eq!(json["orders"][0]["customerName"], "Anna Taylor");
    assert_eq!(json["query"]["sortField"], "customerName");
    assert_eq!(json["query"]["sortDirection"], "asc");
}

#[tokio::test]
async fn unknown_sort_field_is_a_validation_error() {
    let response = test_app()
        .oneshot(signed_in("/dashboard/orders?sort=pizzaType", "t"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = json_body(response).await;
    assert_eq!(json["code"], "validation");
}

#[tokio::test]
async fn repeated_query_parameter_is_a_json_validation_error() {
    let response = test_app()
        .oneshot(signed_in("/dashboard/orders?search=a&search=b", "t"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .expect("content-type");
    assert!(content_type.starts_with("application/json"));
    let json = json_body(response).await;
    assert_eq!(json["code"], "validation");
    assert!(json["message"]
        .as_str()
        .expect("message")
        .contains("search"));
}

#[tokio::test]
async fn last_repeated_session_cookie_wins() {
    let request = Request::get("/dashboard")
        .header(
            header::COOKIE,
            format!("{DEFAULT_SESSION_COOKIE}=; {DEFAULT_SESSION_COOKIE}=abc"),
        )
        .body(Body::empty())
        .expect("request");
    let response = test_app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_pages_are_gated_then_not_found() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(anonymous("/dashboard/reports"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let response = app
        .oneshot(signed_in("/dashboard/reports", "t"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["path"], "/dashboard/reports");
    assert_eq!(json["homeUrl"], "/dashboard");
}

#[tokio::test]
async fn sign_out_expires_cookie_and_returns_to_landing() {
    let request = Request::post("/api/auth/signout")
        .body(Body::empty())
        .expect("request");
    let response = test_app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("set-cookie");
    assert!(cookie.starts_with(&format!("{DEFAULT_SESSION_COOKIE}=;")));
    assert!(cookie.contains("Max-Age=0"));
}

#[test]
fn build_state_rejects_bad_configuration() {
    let mut settings = Settings::default();
    settings.gate.bypass_patterns = vec!["[".into()];
    assert!(build_state(&settings).is_err());

    let mut settings = Settings::default();
    settings
        .status_styles
        .insert("Burnt".into(), "badge".into());
    assert!(build_state(&settings).is_err());

    let mut settings = Settings::default();
    settings.catalog_path = Some("/nonexistent/orders.toml".into());
    assert!(build_state(&settings).is_err());

    let mut settings = Settings::default();
    settings.gate.protected_home = "/home".into();
    assert!(build_state(&settings).is_err());
}

#[tokio::test]
async fn orders_page_can_be_the_protected_home() {
    let mut settings = Settings::default();
    settings.gate.protected_home = ORDERS_PATH.into();
    let app = build_router(Arc::new(build_state(&settings).expect("state")));
    let response = app
        .oneshot(signed_in("/", "t"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response), ORDERS_PATH);
}
