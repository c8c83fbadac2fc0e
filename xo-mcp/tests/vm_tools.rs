mod common;

use std::sync::Arc;
use std::time::Duration;

use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use xo_mcp::config::ServerConfig;
use xo_mcp::tools::{init_registry, FailureKind};

use common::{call, config_for, cookie, registry_for};

#[tokio::test]
async fn test_list_vms_uses_default_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v0/vms")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded(
                "fields".into(),
                "name_label,name_description,power_state,uuid".into(),
            ),
            Matcher::UrlEncoded("filter".into(), "power_state:Running".into()),
            Matcher::UrlEncoded("limit".into(), "42".into()),
        ]))
        .match_header("cookie", cookie().as_str())
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {
                    "href": "/rest/v0/vms/a1",
                    "uuid": "a1",
                    "name_label": "web-01",
                    "power_state": "Running"
                },
                {
                    "href": "/rest/v0/vms/b2",
                    "uuid": "b2",
                    "name_label": "db-01",
                    "power_state": "Running"
                }
            ])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(&registry, "list_vms", json!({})).await;

    mock.assert_async().await;
    assert_eq!(
        response.to_value(),
        json!({
            "status": "success",
            "total": 2,
            "vms": [
                {"uuid": "a1", "name_label": "web-01", "power_state": "Running"},
                {"uuid": "b2", "name_label": "db-01", "power_state": "Running"}
            ]
        })
    );
}

#[tokio::test]
async fn test_list_vms_custom_fields_and_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v0/vms")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("fields".into(), "name_label,tags".into()),
            Matcher::UrlEncoded("filter".into(), "power_state:Halted tags:Critical".into()),
            Matcher::UrlEncoded("limit".into(), "999".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(
        &registry,
        "list_vms",
        json!({
            "fields": ["name_label", "tags"],
            "filter": {"tags": "Critical", "power_state": "Halted"},
            "limit": "999"
        }),
    )
    .await;

    mock.assert_async().await;
    assert!(response.is_success());
    assert_eq!(response.get("total"), Some(&json!(0)));
}

#[tokio::test]
async fn test_list_vms_http_error() {
    let mut server = Server::new_async().await;
    let long_body = "x".repeat(5000);
    let _mock = server
        .mock("GET", "/rest/v0/vms")
        .match_query(Matcher::Any)
        .with_status(401)
        .with_body(long_body.as_str())
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(&registry, "list_vms", json!({})).await;

    assert_eq!(response.kind(), Some(FailureKind::HttpError));
    assert_eq!(response.status_code(), Some(401));
    let message = response.message().unwrap();
    assert!(message.starts_with(&"x".repeat(2048)));
    assert!(message.len() < long_body.len());
}

#[tokio::test]
async fn test_list_vms_invalid_limit_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v0/vms")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    for limit in [json!(0), json!(-3), json!("many")] {
        let response = call(&registry, "list_vms", json!({ "limit": limit })).await;
        assert_eq!(response.kind(), Some(FailureKind::ValidationError));
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_token_is_configuration_error() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v0/vms")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let registry = init_registry(Arc::new(ServerConfig::default().with_base_url(&server.url())));
    let response = call(&registry, "list_vms", json!({})).await;

    mock.assert_async().await;
    assert_eq!(response.kind(), Some(FailureKind::ConfigurationError));
    assert_eq!(response.status_code(), None);
}

#[tokio::test]
async fn test_unreachable_host_is_exception() {
    let registry = registry_for("http://127.0.0.1:1");
    let response = call(&registry, "list_vms", json!({})).await;

    assert_eq!(response.kind(), Some(FailureKind::Exception));
    assert_eq!(response.status_code(), None);
    assert!(!response.message().unwrap().is_empty());
}

#[tokio::test]
async fn test_timeout_is_exception() {
    // Accepts connections but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let config = config_for(&base_url).with_request_timeout(Duration::from_millis(300));
    let registry = init_registry(Arc::new(config));
    let response = call(&registry, "list_vms", json!({})).await;

    assert_eq!(response.kind(), Some(FailureKind::Exception));
    drop(listener);
}

#[tokio::test]
async fn test_create_vm_posts_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v0/vms")
        .match_header("cookie", cookie().as_str())
        .match_body(Matcher::PartialJson(json!({
            "name_label": "web-01",
            "template": "tpl-1",
            "memory": 2147483648u64
        })))
        .with_status(201)
        .with_body(
            json!({"id": "vm-9", "name_label": "web-01", "href": "/rest/v0/vms/vm-9"}).to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(
        &registry,
        "create_vm",
        json!({"name": "web-01", "template_id": "tpl-1", "payload": "{\"memory\": 2147483648}"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(
        response.to_value(),
        json!({"status": "success", "vm": {"id": "vm-9", "name_label": "web-01"}})
    );
}

#[tokio::test]
async fn test_create_vm_malformed_payload_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server.mock("POST", "/rest/v0/vms").expect(0).create_async().await;

    let registry = registry_for(&server.url());
    let response = call(
        &registry,
        "create_vm",
        json!({"name_label": "web-01", "template": "tpl-1", "payload": "{memory: lots"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.kind(), Some(FailureKind::ValidationError));
}

#[tokio::test]
async fn test_delete_vm_accepts_path_like_id() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rest/v0/vms/a1")
        .match_header("cookie", cookie().as_str())
        .with_status(204)
        .expect(2)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let bare = call(&registry, "delete_vm", json!({"id": "a1"})).await;
    let path_like = call(&registry, "delete_vm", json!({"vm_id": "/rest/v0/vms/a1"})).await;

    mock.assert_async().await;
    assert_eq!(bare.to_value(), json!({"status": "success", "id": "a1"}));
    assert_eq!(path_like, bare);
}

#[tokio::test]
async fn test_delete_vm_not_found() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("DELETE", "/rest/v0/vms/missing")
        .with_status(404)
        .with_body("VM not found")
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(&registry, "delete_vm", json!({"id": "missing"})).await;

    assert_eq!(
        response.to_value(),
        json!({
            "status": "failure",
            "kind": "http-error",
            "status_code": 404,
            "message": "VM not found"
        })
    );
}

#[tokio::test]
async fn test_delete_vm_without_id() {
    let registry = registry_for("http://127.0.0.1:1");
    let response = call(&registry, "delete_vm", json!({"id": "  "})).await;
    assert_eq!(response.kind(), Some(FailureKind::ValidationError));
}

#[tokio::test]
async fn test_modify_vm_patches_supplied_fields() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("PATCH", "/rest/v0/vms/a1")
        .match_body(Matcher::Json(json!({"name_description": "frontend"})))
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(
        &registry,
        "modify_vm",
        json!({"id": "a1", "name_description": "frontend"}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(
        response.to_value(),
        json!({"status": "success", "id": "a1", "updated_fields": ["name_description"]})
    );
}

#[tokio::test]
async fn test_modify_vm_without_changes_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server.mock("PATCH", "/rest/v0/vms/a1").expect(0).create_async().await;

    let registry = registry_for(&server.url());
    let response = call(&registry, "modify_vm", json!({"id": "a1"})).await;

    mock.assert_async().await;
    assert_eq!(response.kind(), Some(FailureKind::ValidationError));
}
