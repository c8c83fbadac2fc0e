mod common;

use std::sync::Arc;

use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use serde_json::json;
use xo_mcp::config::ServerConfig;
use xo_mcp::tools::{init_registry, FailureKind};

use common::{call, cookie, registry_for};

#[tokio::test]
async fn test_list_backup_jobs_omits_empty_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v0/backup-jobs")
        .match_query(Matcher::Exact(
            "fields=name%2Cmode%2Ctype%2Cid&limit=42".to_string(),
        ))
        .match_header("cookie", cookie().as_str())
        .with_status(200)
        .with_body(
            json!([{
                "href": "/rest/v0/backup-jobs/j1",
                "id": "j1",
                "name": "nightly",
                "mode": "full",
                "type": "backup"
            }])
            .to_string(),
        )
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(&registry, "list_backup_jobs", json!({})).await;

    mock.assert_async().await;
    assert_eq!(
        response.to_value(),
        json!({
            "status": "success",
            "total": 1,
            "backup_jobs": [{"id": "j1", "name": "nightly", "mode": "full", "type": "backup"}]
        })
    );
}

#[tokio::test]
async fn test_list_backup_jobs_with_filter() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v0/backup-jobs")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter".into(), "mode:delta type:backup".into()),
            Matcher::UrlEncoded("limit".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(
        &registry,
        "list_backup_jobs",
        json!({"filter": {"type": "backup", "mode": "delta"}, "limit": 5}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(response.get("total"), Some(&json!(0)));
}

#[tokio::test]
async fn test_concurrent_details_do_not_share_state() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/rest/v0/backup-jobs/j1")
        .with_status(200)
        .with_body(
            json!({"id": "j1", "name": "nightly", "href": "/rest/v0/backup-jobs/j1"}).to_string(),
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/rest/v0/backup-jobs/j2")
        .with_status(200)
        .with_body(json!({"id": "j2", "name": "weekly"}).to_string())
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let (one, two) = tokio::join!(
        call(&registry, "get_backup_job_details", json!({"id": "j1"})),
        call(&registry, "get_backup_job_details", json!({"id": "backup-jobs/j2"})),
    );

    first.assert_async().await;
    second.assert_async().await;
    assert_eq!(one.get("details"), Some(&json!({"id": "j1", "name": "nightly"})));
    assert_eq!(two.get("details"), Some(&json!({"id": "j2", "name": "weekly"})));
}

#[tokio::test]
async fn test_details_require_id() {
    let registry = registry_for("http://127.0.0.1:1");
    let response = call(&registry, "get_backup_job_details", json!({})).await;
    assert_eq!(response.kind(), Some(FailureKind::ValidationError));
}

#[tokio::test]
async fn test_create_backup_job() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v0/backup-jobs")
        .match_body(Matcher::Json(json!({"name": "nightly", "mode": "full"})))
        .with_status(200)
        .with_body("\"/rest/v0/backup-jobs/j3\"")
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(
        &registry,
        "create_backup_job",
        json!({"payload": {"name": "nightly", "mode": "full"}}),
    )
    .await;

    mock.assert_async().await;
    assert_eq!(
        response.to_value(),
        json!({"status": "success", "backup_job": {"id": "j3"}})
    );
}

#[tokio::test]
async fn test_create_backup_job_malformed_payload_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/rest/v0/backup-jobs")
        .expect(0)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    for params in [json!({}), json!({"payload": "not json"}), json!({"payload": [1, 2]})] {
        let response = call(&registry, "create_backup_job", params).await;
        assert_eq!(response.kind(), Some(FailureKind::ValidationError));
    }

    mock.assert_async().await;
}

#[tokio::test]
async fn test_delete_backup_job() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/rest/v0/backup-jobs/j1")
        .with_status(200)
        .with_body("")
        .expect(1)
        .create_async()
        .await;

    let registry = registry_for(&server.url());
    let response = call(&registry, "delete_backup_job", json!({"id": "/backup-jobs/j1"})).await;

    mock.assert_async().await;
    assert_eq!(response.to_value(), json!({"status": "success", "id": "j1"}));
}

#[tokio::test]
async fn test_get_docs_without_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v0/docs/swagger.json")
        .match_header("cookie", Matcher::Missing)
        .with_status(200)
        .with_body(json!({"openapi": "3.0.0", "info": {"title": "XO"}, "paths": {}}).to_string())
        .expect(1)
        .create_async()
        .await;

    let registry = init_registry(Arc::new(ServerConfig::default().with_base_url(&server.url())));
    let response = call(&registry, "get_docs", json!({})).await;

    mock.assert_async().await;
    assert_eq!(response.get("total"), Some(&json!(3)));
    assert_eq!(response.get("swagger_docs").unwrap()["info"]["title"], json!("XO"));
}
