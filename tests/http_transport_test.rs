//! HttpTransport against a real HTTP listener

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use seraph::{ClientConfig, HttpTransport, Node, Operation, Seraph, SeraphError, Transport};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct AppState {
    created: Arc<Mutex<Vec<Value>>>,
}

async fn read_node(Path(id): Path<u64>, State(base): State<String>) -> impl IntoResponse {
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Cannot find node with id [404] in database." })),
        )
            .into_response();
    }
    Json(json!({
        "self": format!("{}/db/data/node/{}", base, id),
        "data": { "name": "Jon" },
    }))
    .into_response()
}

async fn create_node(State(state): State<AppState>, Json(body): Json<Value>) -> impl IntoResponse {
    state.created.lock().unwrap().push(body.clone());
    (
        StatusCode::CREATED,
        Json(json!({ "self": "http://ignored/db/data/node/77", "data": body })),
    )
}

async fn delete_node(Path(_id): Path<u64>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "store exploded")
}

/// Serve a tiny subset of the REST API on an ephemeral port
async fn spawn_store() -> (String, AppState) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let state = AppState::default();

    let app = Router::new()
        .route(
            "/db/data/node/:id",
            get(read_node).delete(delete_node).with_state(base.clone()),
        )
        .route("/db/data/node", post(create_node))
        .route("/db/data/broken", get(broken))
        .with_state(state.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (base, state)
}

#[tokio::test]
async fn test_read_through_http() {
    let (base, _state) = spawn_store().await;
    let db = Seraph::new(&base).unwrap();

    let node = db.read_one(3).await.unwrap();
    assert_eq!(node.id(), Some(3));
    assert_eq!(node.get_str("name"), Some("Jon"));
}

#[tokio::test]
async fn test_create_sends_json_body() {
    let (base, state) = spawn_store().await;
    let db = Seraph::new(&base).unwrap();

    let node = db.save_one(Node::new().with("name", "Helge")).await.unwrap();
    assert_eq!(node.id(), Some(77));
    assert_eq!(state.created.lock().unwrap().as_slice(), &[json!({ "name": "Helge" })]);
}

#[tokio::test]
async fn test_error_message_from_body() {
    let (base, _state) = spawn_store().await;
    let db = Seraph::new(&base).unwrap();

    match db.read_one(404).await.unwrap_err() {
        SeraphError::Request { status, message } => {
            assert_eq!(status, Some(404));
            assert!(message.contains("Cannot find node"));
        }
        other => panic!("expected request error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_plain_text_error_and_empty_success() {
    let (base, _state) = spawn_store().await;
    let transport = HttpTransport::new(ClientConfig::new(&base)).unwrap();

    let err = transport.request(&Operation::get("broken")).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("store exploded"));

    let body = transport.request(&Operation::delete("node/5")).await.unwrap();
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_unreachable_store_is_http_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let db = Seraph::new(&base).unwrap();
    assert!(matches!(db.read_one(1).await.unwrap_err(), SeraphError::Http(_)));
}
