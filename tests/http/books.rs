//! CRUD over `/books`.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use bookshelf::{FileStore, InMemoryStore};
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::support::{create, list, start_server};

async fn in_memory() -> (String, reqwest::Client) {
    let base = start_server(Arc::new(InMemoryStore::new())).await;
    (base, reqwest::Client::new())
}

#[tokio::test]
async fn list_starts_empty() {
    let (base, client) = in_memory().await;
    assert!(list(&client, &base).await.is_empty());
}

#[tokio::test]
async fn create_assigns_eight_character_id() {
    let (base, client) = in_memory().await;

    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let id = book["id"].as_str().unwrap();
    assert_eq!(id.len(), 8);
    assert_eq!(book["title"], "Dune");
    assert_eq!(book["author"], "Herbert");

    let books = list(&client, &base).await;
    assert_eq!(books, vec![book.clone()]);
}

#[tokio::test]
async fn created_book_is_retrievable() {
    let (base, client) = in_memory().await;

    create(&client, &base, &json!({ "title": "Emma", "author": "Austen" })).await;
    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let id = book["id"].as_str().unwrap();

    let resp = client
        .get(format!("{base}/books/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched, book);

    let books = list(&client, &base).await;
    assert_eq!(books.iter().filter(|b| b["id"] == id).count(), 1);
}

#[tokio::test]
async fn create_ignores_client_id_and_keeps_extra_fields() {
    let (base, client) = in_memory().await;

    let book = create(
        &client,
        &base,
        &json!({ "id": "mine", "title": "Dune", "author": "Herbert", "year": 1965, "tags": ["sf"] }),
    )
    .await;
    assert_ne!(book["id"], "mine");
    assert_eq!(book["year"], 1965);
    assert_eq!(book["tags"], json!(["sf"]));
}

#[tokio::test]
async fn create_without_author_returns_400() {
    let (base, client) = in_memory().await;

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({ "title": "Dune" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "validation failed: missing field 'author'");
    assert!(list(&client, &base).await.is_empty());
}

#[tokio::test]
async fn malformed_json_returns_400() {
    let (base, client) = in_memory().await;

    let resp = client
        .post(format!("{base}/books"))
        .header("content-type", "application/json")
        .body("{ oops")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("decode failed"));
}

#[tokio::test]
async fn missing_content_type_returns_400() {
    let (base, client) = in_memory().await;

    let resp = client
        .post(format!("{base}/books"))
        .body(r#"{ "title": "Dune", "author": "Herbert" }"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn get_unknown_returns_404_without_record() {
    let (base, client) = in_memory().await;

    let resp = client.get(format!("{base}/books/nope")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "book not found: nope" }));
}

#[tokio::test]
async fn update_merges_fields() {
    let (base, client) = in_memory().await;
    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let id = book["id"].as_str().unwrap();

    let resp = client
        .put(format!("{base}/books/{id}"))
        .json(&json!({ "author": "F. Herbert" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated, json!({ "id": id, "title": "Dune", "author": "F. Herbert" }));

    let fetched: Value = client
        .get(format!("{base}/books/{id}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn update_cannot_change_id() {
    let (base, client) = in_memory().await;
    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let id = book["id"].as_str().unwrap();

    let updated: Value = client
        .put(format!("{base}/books/{id}"))
        .json(&json!({ "id": "other", "title": "Dune Messiah" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["id"], id);
    assert_eq!(updated["title"], "Dune Messiah");
}

#[tokio::test]
async fn update_unknown_returns_404_and_changes_nothing() {
    let (base, client) = in_memory().await;
    create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let before = list(&client, &base).await;

    let resp = client
        .put(format!("{base}/books/nope"))
        .json(&json!({ "author": "Nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    assert_eq!(list(&client, &base).await, before);
}

#[tokio::test]
async fn delete_then_get_returns_404() {
    let (base, client) = in_memory().await;
    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let id = book["id"].as_str().unwrap();

    let resp = client
        .delete(format!("{base}/books/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().is_empty());

    let resp = client.get(format!("{base}/books/{id}")).send().await.unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn repeated_delete_never_errors() {
    let (base, client) = in_memory().await;
    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let id = book["id"].as_str().unwrap();

    let first = client
        .delete(format!("{base}/books/{id}"))
        .send()
        .await
        .unwrap();
    let second = client
        .delete(format!("{base}/books/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(first.status(), 200);
    assert_eq!(second.status(), 404);
    assert!(!second.status().is_server_error());
}

#[tokio::test]
async fn ids_stay_unique_across_mixed_operations() {
    let (base, client) = in_memory().await;

    let mut created = Vec::new();
    for i in 0..20 {
        let book = create(
            &client,
            &base,
            &json!({ "title": format!("Book {i}"), "author": "Anon" }),
        )
        .await;
        created.push(book["id"].as_str().unwrap().to_string());
    }
    for id in created.iter().step_by(3) {
        client
            .delete(format!("{base}/books/{id}"))
            .send()
            .await
            .unwrap();
    }
    for id in created.iter().skip(1).step_by(4) {
        client
            .put(format!("{base}/books/{id}"))
            .json(&json!({ "author": "Someone" }))
            .send()
            .await
            .unwrap();
    }

    let books = list(&client, &base).await;
    let ids: HashSet<&str> = books.iter().map(|b| b["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), books.len());
    assert!(ids.iter().all(|id| !id.is_empty()));
    assert_eq!(books.len(), 20 - created.iter().step_by(3).count());
}

#[tokio::test]
async fn file_store_survives_restart() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("db.json");
    let client = reqwest::Client::new();

    let base = start_server(Arc::new(FileStore::open(&path).unwrap())).await;
    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;

    let base = start_server(Arc::new(FileStore::open(&path).unwrap())).await;
    assert_eq!(list(&client, &base).await, vec![book]);
}

#[tokio::test]
async fn persistence_failure_returns_500() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let store = FileStore::open(data_dir.join("db.json")).unwrap();
    let base = start_server(Arc::new(store)).await;
    let client = reqwest::Client::new();

    let book = create(&client, &base, &json!({ "title": "Dune", "author": "Herbert" })).await;
    let id = book["id"].as_str().unwrap();

    fs::remove_dir_all(&data_dir).unwrap();
    fs::write(&data_dir, "blocker").unwrap();

    let resp = client
        .post(format!("{base}/books"))
        .json(&json!({ "title": "Emma", "author": "Austen" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let resp = client
        .put(format!("{base}/books/{id}"))
        .json(&json!({ "title": "changed" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    let resp = client
        .delete(format!("{base}/books/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);

    // Nothing leaked into memory.
    assert_eq!(list(&client, &base).await, vec![book]);
}
