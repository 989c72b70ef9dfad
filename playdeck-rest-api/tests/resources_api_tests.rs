//! Hosts, templates, roles, files, notifications and cross-cutting HTTP behaviour

#![cfg(unix)]

mod common;

use axum::http::StatusCode;
use playdeck_api_types::NotificationKind;
use serde_json::json;

use common::test_app;

#[tokio::test]
async fn test_health_endpoint() {
    let t = test_app("exit 0").await;
    let (status, body) = t.send_json("GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_options_is_empty_ok_everywhere() {
    let t = test_app("exit 0").await;
    for uri in ["/run", "/tasks", "/notifications/read", "/templates/update"] {
        let (status, body) = t.send("OPTIONS", uri, None).await;
        assert_eq!(status, StatusCode::OK, "OPTIONS {uri}");
        assert!(body.is_empty());
    }
}

#[tokio::test]
async fn test_empty_collections_are_arrays() {
    let t = test_app("exit 0").await;
    for uri in ["/tasks", "/hosts", "/templates", "/roles", "/files", "/notifications"] {
        let (status, body) = t.send_json("GET", uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]), "GET {uri}");
    }
}

#[tokio::test]
async fn test_host_registration_and_health() {
    let t = test_app("exit 0").await;

    let (status, host) = t
        .send_json(
            "POST",
            "/hosts/add",
            Some(json!({"hostname": "web-01", "ip": "10.0.0.5", "group": "web"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(host["id"], 1);
    assert_eq!(host["status"], "unknown");
    t.send("POST", "/hosts/add", Some(json!({"hostname": "db-01"}))).await;

    let (status, hosts) = t.send_json("GET", "/hosts/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hosts[0]["status"], "healthy");
    assert_eq!(hosts[1]["status"], "unhealthy");

    let (_, listed) = t.send_json("GET", "/hosts", None).await;
    assert_eq!(listed, hosts);
}

#[tokio::test]
async fn test_host_without_hostname_is_rejected() {
    let t = test_app("exit 0").await;
    let (status, _) = t.send("POST", "/hosts/add", Some(json!({"ip": "10.0.0.5"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(t.send_json("GET", "/hosts", None).await.1, json!([]));
}

#[tokio::test]
async fn test_templates_are_written_and_filtered() {
    let t = test_app("exit 0").await;

    let (status, template) = t
        .send_json(
            "POST",
            "/templates/add",
            Some(json!({"name": "site", "type": "playbook", "content": "- hosts: all"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(template["filename"], "site.yml");
    let on_disk = std::fs::read_to_string(t.template_root.join("playbooks/site.yml")).unwrap();
    assert_eq!(on_disk, "- hosts: all");

    t.send(
        "POST",
        "/templates/add",
        Some(json!({"name": "prod", "type": "inventory", "content": "[web]\nweb-01"})),
    )
    .await;

    let (_, playbooks) = t.send_json("GET", "/templates?type=playbook", None).await;
    assert_eq!(playbooks.as_array().unwrap().len(), 1);
    assert_eq!(playbooks[0]["name"], "site");

    let (_, all) = t.send_json("GET", "/templates", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (status, _) = t.send("GET", "/templates?type=role", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_template_update() {
    let t = test_app("exit 0").await;
    t.send(
        "POST",
        "/templates/add",
        Some(json!({"name": "site", "type": "playbook", "content": "v1"})),
    )
    .await;

    let (status, updated) = t
        .send_json(
            "PUT",
            "/templates/update",
            Some(json!({"id": 1, "name": "site", "type": "playbook", "content": "v2"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "v2");
    assert_eq!(updated["filename"], "site.yml");
    let on_disk = std::fs::read_to_string(t.template_root.join("playbooks/site.yml")).unwrap();
    assert_eq!(on_disk, "v2");

    let (status, _) = t
        .send(
            "PUT",
            "/templates/update",
            Some(json!({"id": 9, "name": "ghost", "type": "playbook", "content": "x"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_template_input_validation() {
    let t = test_app("exit 0").await;

    let (status, _) = t
        .send(
            "POST",
            "/templates/add",
            Some(json!({"name": "../escape", "type": "playbook", "content": "x"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = t
        .send(
            "POST",
            "/templates/add",
            Some(json!({"name": "site", "type": "role", "content": "x"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_roles_and_files() {
    let t = test_app("exit 0").await;

    let (status, role) = t
        .send_json(
            "POST",
            "/roles/add",
            Some(json!({"name": "nginx", "tasks": [{"name": "install"}], "dependencies": ["common"]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(role["id"], 1);
    assert_eq!(t.send_json("GET", "/roles", None).await.1[0]["name"], "nginx");

    t.send("POST", "/files/add", Some(json!({"name": "hosts.ini", "type": "inventory"}))).await;
    t.send("POST", "/files/add", Some(json!({"name": "ansible.cfg", "type": "config"}))).await;

    let (_, configs) = t.send_json("GET", "/files?type=config", None).await;
    assert_eq!(configs.as_array().unwrap().len(), 1);
    assert_eq!(configs[0]["name"], "ansible.cfg");

    let (status, updated) = t
        .send_json(
            "PUT",
            "/files/update",
            Some(json!({"id": 2, "name": "ansible.cfg", "type": "config", "content": "[defaults]"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["content"], "[defaults]");

    let (status, _) = t
        .send("PUT", "/files/update", Some(json!({"id": 99, "name": "missing"})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mark_unknown_notification_read() {
    let t = test_app("exit 0").await;

    let (status, error) = t
        .send_json("PUT", "/notifications/read", Some(json!({"id": 999})))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["error"]["status"], 404);
    assert_eq!(t.send_json("GET", "/notifications", None).await.1, json!([]));
}

#[tokio::test]
async fn test_mark_notification_read() {
    let t = test_app("exit 0").await;
    t.notifications.push(NotificationKind::Info, "Inventory synced");

    let (status, notification) = t
        .send_json("PUT", "/notifications/read", Some(json!({"id": 1})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(notification["read"], true);
    assert_eq!(notification["type"], "info");
    assert_eq!(t.notifications.unread_count(), 0);

    let (status, _) = t
        .send("PUT", "/notifications/read", Some(json!({"id": "one"})))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_cors_headers() {
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    let t = test_app("exit 0").await;
    let request = Request::builder()
        .uri("/tasks")
        .header(header::ORIGIN, "http://dashboard.example")
        .body(Body::empty())
        .unwrap();
    let response = t.app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(playdeck_web::REQUEST_ID_HEADER));
    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}
