//! API documentation endpoints and the route table.

use std::sync::Arc;

use bookshelf::http::ROUTES;
use bookshelf::InMemoryStore;
use serde_json::{json, Value};

use crate::support::start_server;

#[tokio::test]
async fn serves_openapi_document() {
    let base = start_server(Arc::new(InMemoryStore::new())).await;

    let resp = reqwest::get(format!("{base}/api-docs/openapi.json"))
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let doc: Value = resp.json().await.unwrap();
    assert_eq!(doc["info"]["title"], "library API");
    assert_eq!(doc["servers"][0]["url"], "http://localhost:4000");
    assert!(doc["paths"]["/books/{id}"]["put"].is_object());
}

#[tokio::test]
async fn serves_swagger_ui() {
    let base = start_server(Arc::new(InMemoryStore::new())).await;

    let resp = reqwest::get(format!("{base}/api-docs")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    assert!(resp.text().await.unwrap().contains("/api-docs/openapi.json"));
}

#[tokio::test]
async fn every_documented_route_is_served() {
    let base = start_server(Arc::new(InMemoryStore::new())).await;
    let client = reqwest::Client::new();

    for route in ROUTES {
        let method = reqwest::Method::from_bytes(route.method.to_uppercase().as_bytes()).unwrap();
        let url = format!("{base}{}", route.path.replace("{id}", "missing"));
        let mut request = client.request(method, &url);
        if route.request.is_some() {
            request = request.json(&json!({ "title": "Dune", "author": "Herbert" }));
        }

        let resp = request.send().await.unwrap();
        let status = resp.status().as_u16();
        assert_ne!(status, 405, "{} {} not routed", route.method, route.path);
        if status == 404 {
            let body: Value = resp.json().await.unwrap();
            assert_eq!(body["error"], "book not found: missing");
        } else {
            assert_eq!(status, 200, "{} {}", route.method, route.path);
        }
    }
}

#[tokio::test]
async fn health_reports_count() {
    let base = start_server(Arc::new(InMemoryStore::new())).await;
    let client = reqwest::Client::new();

    client
        .post(format!("{base}/books"))
        .json(&json!({ "title": "Dune", "author": "Herbert" }))
        .send()
        .await
        .unwrap();

    let body: Value = reqwest::get(format!("{base}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "ok": true, "books": 1 }));
}
