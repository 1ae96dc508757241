//! Integration tests for [`HttpAnnotationStore`] against an in-process
//! annotation API.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use mp4label_core::{AnnotationDocument, Step};
use mp4label_sync::{AnnotationStore, HttpAnnotationStore, SyncClient, SyncError};

type Saved = Arc<Mutex<HashMap<String, AnnotationDocument>>>;

// ---------------------------------------------------------------------------
// Fake annotation API
// ---------------------------------------------------------------------------

fn stem(file: &str) -> String {
    file.trim_end_matches(".txt").to_string()
}

async fn get_annotation(State(saved): State<Saved>, Path(file): Path<String>) -> Response {
    match saved.lock().unwrap().get(&stem(&file)) {
        Some(doc) => Json(doc.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn post_annotation(
    State(saved): State<Saved>,
    Path(file): Path<String>,
    Json(doc): Json<AnnotationDocument>,
) -> Response {
    if doc.is_tutorial && doc.steps.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "Annotation validation failed: at least one step is required\n",
        )
            .into_response();
    }
    saved.lock().unwrap().insert(stem(&file), doc);
    Json(serde_json::json!({"status": "success"})).into_response()
}

async fn delete_annotation(State(saved): State<Saved>, Path(file): Path<String>) -> Response {
    match saved.lock().unwrap().remove(&stem(&file)) {
        Some(_) => Json(serde_json::json!({"status": "success"})).into_response(),
        None => (StatusCode::NOT_FOUND, "Annotation file does not exist").into_response(),
    }
}

async fn get_model(Path(file): Path<String>) -> Json<serde_json::Value> {
    if stem(&file) == "with_model" {
        Json(serde_json::json!({
            "available": true,
            "annotation": {"title": "Model", "is_tutorial": true, "steps": []},
        }))
    } else {
        Json(serde_json::json!({"available": false}))
    }
}

async fn spawn_api() -> (SocketAddr, Saved) {
    let saved: Saved = Arc::default();
    let app = Router::new()
        .route(
            "/api/annotation/{file}",
            get(get_annotation)
                .post(post_annotation)
                .delete(delete_annotation),
        )
        .route("/api/model-annotation/{file}", get(get_model))
        .with_state(saved.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, saved)
}

fn store_for(addr: SocketAddr) -> HttpAnnotationStore {
    HttpAnnotationStore::new(&format!("http://{addr}"), Duration::from_secs(5)).unwrap()
}

fn complete_doc() -> AnnotationDocument {
    let mut doc = AnnotationDocument::tutorial("Wire a plug");
    doc.steps.push(Step {
        number: 1,
        timestamp: "00:04.250".into(),
        description: "Strip the cable".into(),
    });
    doc
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_annotation_is_none() {
    let (addr, _) = spawn_api().await;
    let store = store_for(addr);
    assert!(store.fetch("lesson").await.unwrap().is_none());
}

#[tokio::test]
async fn upsert_then_fetch() {
    let (addr, saved) = spawn_api().await;
    let store = store_for(addr);

    store.upsert("lesson", &complete_doc()).await.unwrap();
    assert_eq!(saved.lock().unwrap().get("lesson"), Some(&complete_doc()));
    assert_eq!(store.fetch("lesson").await.unwrap(), Some(complete_doc()));

    // Repeating an identical save is harmless.
    store.upsert("lesson", &complete_doc()).await.unwrap();
    assert_eq!(saved.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn stems_with_url_delimiters_keep_separate_keys() {
    let (addr, saved) = spawn_api().await;
    let store = store_for(addr);

    let mut first = complete_doc();
    first.title = "First".into();
    let mut second = complete_doc();
    second.title = "Second".into();

    store.upsert("lesson#1", &first).await.unwrap();
    store.upsert("lesson#2", &second).await.unwrap();
    store.upsert("what?now", &complete_doc()).await.unwrap();

    {
        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(saved.get("lesson#1").map(|d| d.title.as_str()), Some("First"));
        assert!(saved.contains_key("what?now"));
    }
    assert_eq!(store.fetch("lesson#2").await.unwrap(), Some(second));
    assert!(store.fetch("lesson").await.unwrap().is_none());
}

#[tokio::test]
async fn rejected_save_carries_server_message() {
    let (addr, _) = spawn_api().await;
    let store = store_for(addr);

    let err = store
        .upsert("lesson", &AnnotationDocument::tutorial("No steps"))
        .await
        .unwrap_err();
    assert_matches!(err, SyncError::Api { status: 400, ref body } if body.contains("at least one step"));
}

#[tokio::test]
async fn delete_existing_and_missing() {
    let (addr, _) = spawn_api().await;
    let store = store_for(addr);

    store.upsert("lesson", &complete_doc()).await.unwrap();
    store.remove("lesson").await.unwrap();
    assert_matches!(store.remove("lesson").await, Err(SyncError::NotFound(_)));
}

#[tokio::test]
async fn model_annotation_availability() {
    let (addr, _) = spawn_api().await;
    let store = store_for(addr);

    let model = store.fetch_model("with_model").await.unwrap();
    assert_eq!(model.map(|d| d.title), Some("Model".to_string()));
    assert!(store.fetch_model("other").await.unwrap().is_none());
}

#[tokio::test]
async fn client_load_survives_unreachable_store() {
    // Nothing listens on port 9 of the loopback interface.
    let store = HttpAnnotationStore::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
    let client = SyncClient::new(Arc::new(store));

    assert_eq!(client.load("lesson").await, AnnotationDocument::default());
    assert_matches!(
        client.save("lesson", &complete_doc()).await,
        Err(SyncError::Request(_))
    );
}
