//! HTTP tests for the access evaluation API.
//!
//! Drives the full router through `tower::ServiceExt::oneshot`; no server or
//! external services required.

use std::path::Path;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use conclave_server::api::access::{CheckAccessResponse, ModerateResponse};
use conclave_server::api::{create_router, AppState};
use conclave_server::config::Config;
use conclave_server::permissions::{Permissions, RoleRegistry};

fn app() -> Router {
    let config = Config::default_for_test();
    let registry = config.load_registry().expect("built-in registry");
    create_router(AppState::new(config, registry))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("oneshot request failed");
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "roles": 7, "source": "built-in"}));
}

#[tokio::test]
async fn test_list_roles_highest_first() {
    let (status, body) = send(app(), get("/api/roles")).await;
    assert_eq!(status, StatusCode::OK);

    let roles = body.as_array().unwrap();
    assert_eq!(roles.len(), 7);
    assert_eq!(roles[0]["name"], "Owner");
    assert_eq!(roles[0]["level"], 100);
    assert_eq!(roles[0]["permissions"], json!(["*"]));
    assert_eq!(roles[6]["name"], "Member");
    assert_eq!(roles[6]["permissions"], json!(["submit_content"]));
}

#[tokio::test]
async fn test_check_guest_denied() {
    let request = post_json(
        "/api/access/check",
        &json!({"roles": [], "permissions": ["ban_members"], "require_all": false}),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let decision: CheckAccessResponse = serde_json::from_value(body).unwrap();
    assert_eq!(
        decision,
        CheckAccessResponse {
            allowed: false,
            message: "Missing required permission: ban_members".to_string(),
            level: 0,
        }
    );
}

#[tokio::test]
async fn test_check_owner_allowed() {
    let request = post_json(
        "/api/access/check",
        &json!({"roles": ["OWNER_ID"], "permissions": ["ban_members", "manage_roles"], "require_all": true}),
    );
    let (_, body) = send(app(), request).await;

    let decision: CheckAccessResponse = serde_json::from_value(body).unwrap();
    assert!(decision.allowed);
    assert!(decision.message.is_empty());
    assert_eq!(decision.level, 100);
}

#[tokio::test]
async fn test_check_require_all_defaults_to_any() {
    let request = post_json(
        "/api/access/check",
        &json!({"roles": ["MODERATOR_ID"], "permissions": ["manage_roles", "kick_members"]}),
    );
    let (_, body) = send(app(), request).await;
    assert_eq!(body["allowed"], true);
}

#[tokio::test]
async fn test_check_unknown_permission_fails_closed() {
    // Even the wildcard cannot satisfy a name outside the vocabulary under ALL
    let request = post_json(
        "/api/access/check",
        &json!({"roles": ["OWNER_ID"], "permissions": ["ban_members", "launch_rockets"], "require_all": true}),
    );
    let (_, body) = send(app(), request).await;
    assert_eq!(body["allowed"], false);
    assert_eq!(
        body["message"],
        "Missing required permissions: ban_members, launch_rockets"
    );

    // Under ANY the known name still counts
    let request = post_json(
        "/api/access/check",
        &json!({"roles": ["OWNER_ID"], "permissions": ["ban_members", "launch_rockets"]}),
    );
    let (_, body) = send(app(), request).await;
    assert_eq!(body["allowed"], true);
}

#[tokio::test]
async fn test_check_message_lists_each_name_once() {
    let request = post_json(
        "/api/access/check",
        &json!({"roles": ["GAMER_ID"], "permissions": ["kick_members", "ban_members", "kick_members"], "require_all": true}),
    );
    let (_, body) = send(app(), request).await;
    assert_eq!(body["allowed"], false);
    assert_eq!(
        body["message"],
        "Missing required permissions: ban_members, kick_members"
    );
}

#[tokio::test]
async fn test_moderate_hierarchy() {
    let request = post_json(
        "/api/access/moderate",
        &json!({"actor_roles": ["MODERATOR_ID"], "target_roles": ["ADMIN_ID"]}),
    );
    let (status, body) = send(app(), request).await;

    assert_eq!(status, StatusCode::OK);
    let decision: ModerateResponse = serde_json::from_value(body).unwrap();
    assert_eq!(
        decision,
        ModerateResponse {
            allowed: false,
            actor_level: 50,
            target_level: 70,
        }
    );
}

#[tokio::test]
async fn test_moderate_equal_rank_denied() {
    let request = post_json(
        "/api/access/moderate",
        &json!({"actor_roles": ["ADMIN_ID", "GAMER_ID"], "target_roles": ["ADMIN_ID"]}),
    );
    let (_, body) = send(app(), request).await;
    assert_eq!(body["allowed"], false);
}

#[tokio::test]
async fn test_malformed_body_rejected() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/access/check")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(app(), request).await;
    assert!(status.is_client_error());
}

#[test]
fn test_example_registry_file_matches_builtin_table() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/roles.example.json");
    let registry = RoleRegistry::from_file(&path).expect("example registry should load");

    assert_eq!(registry.len(), 7);
    let owner = registry.role("1180000000000000001").unwrap();
    assert!(owner.permissions.is_wildcard());

    let admin = registry.role("1180000000000000002").unwrap();
    assert!(admin.permissions.allows(Permissions::ADMIN_DEFAULT));

    let moderator = registry.role("1180000000000000003").unwrap();
    assert_eq!(moderator.permissions.resolve(), Permissions::MODERATOR_DEFAULT);
}
