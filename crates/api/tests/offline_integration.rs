//! Routes exercised with the database unreachable.

mod common;

use axum::http::{header, Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use uuid::Uuid;

use common::{json_request, offline_app, parse_response_body, user_token};

#[tokio::test]
async fn test_liveness_and_security_headers() {
    let (app, _) = offline_app();
    let response = app
        .oneshot(json_request(Method::GET, "/api/health/live", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("strict-transport-security"));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_readiness_reports_database_down() {
    let (app, _) = offline_app();
    let response = app
        .oneshot(json_request(Method::GET, "/api/health/ready", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_catalog_is_public() {
    let (app, _) = offline_app();
    let response = app
        .oneshot(json_request(Method::GET, "/api/v1/templates/catalog", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["defaults"]["layout"]["style"], "elegant");
    assert!(body["fonts"].as_array().unwrap().len() > 3);
}

#[tokio::test]
async fn test_user_routes_require_token() {
    let (app, _) = offline_app();
    for uri in ["/api/v1/templates", "/api/v1/invitations", "/api/v1/profiles/me"] {
        let response = app
            .clone()
            .oneshot(json_request(Method::GET, uri, None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        let body = parse_response_body(response).await;
        assert_eq!(body["error"], "unauthorized");
    }
}

#[tokio::test]
async fn test_setup_requires_service_role() {
    let (app, state) = offline_app();
    let token = user_token(&state, Uuid::new_v4());
    let response = app
        .oneshot(json_request(Method::POST, "/api/v1/setup", None, Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_preview_json_and_html() {
    let (app, _) = offline_app();
    let request = json!({
        "draft": {"template_name": "Garden", "groom_name": "Aziz", "bride_name": "Malika"},
        "commands": [
            {"op": "apply_color_preset", "name": "romantic-pink"},
            {"op": "set_layout_style", "style": "modern"},
            {"op": "set_preview_device", "device": "mobile"}
        ]
    });

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/editor/preview",
            Some(request.clone()),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["editor"]["config"]["layout"]["style"], "modern");
    assert_eq!(body["editor"]["preview_device"], "mobile");
    assert!(body["html"].as_str().unwrap().contains("Malika"));

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/editor/preview?format=html",
            Some(request),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    assert!(response.headers().contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_preview_rejects_unknown_preset() {
    let (app, _) = offline_app();
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/editor/preview",
            Some(json!({"commands": [{"op": "apply_color_preset", "name": "neon"}]})),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_editor_save_without_token_is_unauthorized() {
    let (app, _) = offline_app();
    let response = app
        .oneshot(json_request(
            Method::POST,
            "/api/v1/editor/save",
            Some(json!({"draft": {"template_name": "Garden"}})),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_editor_save_falls_back_to_local_store() {
    let (app, state) = offline_app();
    let user_id = Uuid::new_v4();
    let token = user_token(&state, user_id);

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/api/v1/editor/save",
            Some(json!({"draft": {"template_name": "Garden"}})),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = parse_response_body(response).await;
    assert_eq!(body["is_local"], true);
    assert_eq!(body["editor"]["status"]["kind"], "success");
    assert!(body["local_id"].as_str().unwrap().starts_with("local_"));

    let response = app
        .oneshot(json_request(
            Method::GET,
            "/api/v1/templates/local",
            None,
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["payload"]["name"], "Garden");
}

#[tokio::test]
async fn test_public_rsvp_is_rate_limited() {
    let (app, _) = offline_app();
    let rsvp = json!({"guest_name": "", "will_attend": true});

    let mut statuses = Vec::new();
    for _ in 0..6 {
        let mut request = json_request(
            Method::POST,
            "/api/v1/public/invitations/some-slug/rsvps",
            Some(rsvp.clone()),
            None,
        );
        request
            .headers_mut()
            .insert("x-forwarded-for", "203.0.113.9".parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        statuses.push(response.status());
    }

    assert!(statuses[..5].iter().all(|s| *s == StatusCode::BAD_REQUEST));
    assert_eq!(statuses[5], StatusCode::TOO_MANY_REQUESTS);
}
