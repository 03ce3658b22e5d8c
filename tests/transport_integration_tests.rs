//! Integration Tests over a real HTTP connection
//!
//! Starts a local axum server and talks to it through `ReqwestTransport`.
//! Multipart bodies are decoded by axum's own multipart parser.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    routing::post,
    Form, Json, Router,
};
use flickr_api::{
    multipart::{self, FilePart},
    rest::Params,
    PhotoFile, ReqwestTransport, RestClient, UploadOutcome, Uploader,
};
use serde_json::{json, Value};

// == Test Server ==

#[derive(Debug, Clone, PartialEq)]
struct ReceivedPart {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

#[derive(Clone, Default)]
struct ServerState {
    parts: Arc<Mutex<Vec<ReceivedPart>>>,
    content_length: Arc<Mutex<Option<String>>>,
    rest_calls: Arc<AtomicUsize>,
}

async fn receive_upload(
    State(state): State<ServerState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> String {
    *state.content_length.lock().unwrap() = headers
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.unwrap().to_vec();
        state.parts.lock().unwrap().push(ReceivedPart {
            name,
            filename,
            content_type,
            data,
        });
    }
    "<rsp stat=\"ok\">\n<photoid>99</photoid>\n</rsp>".to_string()
}

async fn receive_rest(
    State(state): State<ServerState>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    state.rest_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "method": {"_content": form.get("method").cloned().unwrap_or_default()},
        "text": {"_content": form.get("text").cloned().unwrap_or_default()},
        "stat": "ok"
    }))
}

async fn spawn_server() -> (SocketAddr, ServerState) {
    let state = ServerState::default();
    let app = Router::new()
        .route("/services/upload/", post(receive_upload))
        .route("/services/rest/", post(receive_rest))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
    list.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

// == Multipart Round Trip ==

#[tokio::test]
async fn test_multipart_round_trip_through_standard_parser() {
    let (addr, state) = spawn_server().await;
    let transport = ReqwestTransport::with_scheme("http");

    let fields = pairs(&[("title", "Sunset over the bay"), ("tags", "sea sky"), ("empty", "")]);
    let photo: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let files = vec![
        FilePart::new("photo", "sunset.jpg", photo.clone()),
        FilePart::new("extra", "notes.unknownext", b"line one\r\nline two".to_vec()),
    ];

    let response = multipart::post(&transport, &addr.to_string(), "/services/upload/", &fields, &files)
        .await
        .unwrap();
    assert_eq!(response.status, 200);

    let received = state.parts.lock().unwrap().clone();
    assert_eq!(received.len(), 5);

    for (i, (name, value)) in fields.iter().enumerate() {
        assert_eq!(&received[i].name, name);
        assert_eq!(received[i].filename, None);
        assert_eq!(received[i].data, value.as_bytes());
    }

    assert_eq!(received[3].name, "photo");
    assert_eq!(received[3].filename.as_deref(), Some("sunset.jpg"));
    assert_eq!(received[3].content_type.as_deref(), Some("image/jpeg"));
    assert_eq!(received[3].data, photo);

    assert_eq!(received[4].filename.as_deref(), Some("notes.unknownext"));
    assert_eq!(received[4].content_type.as_deref(), Some("application/octet-stream"));
    assert_eq!(received[4].data, b"line one\r\nline two");

    let expected_len = multipart::encode(&fields, &files).unwrap().len().to_string();
    assert_eq!(state.content_length.lock().unwrap().as_deref(), Some(expected_len.as_str()));
}

#[tokio::test]
async fn test_uploader_against_server() {
    let (addr, state) = spawn_server().await;
    let url = format!("http://{}/services/upload/", addr);
    let uploader = Uploader::new(Arc::new(ReqwestTransport::with_scheme("http")), "test-key")
        .with_urls(url.clone(), url);

    let outcome = uploader
        .upload(
            PhotoFile::new("/tmp/été.png", b"PNGDATA".to_vec()),
            Params::new().with("title", "Été").with("is_public", false),
        )
        .await
        .unwrap();

    assert_eq!(outcome.id(), "99");
    assert!(matches!(outcome, UploadOutcome::Photo { .. }));

    let received = state.parts.lock().unwrap().clone();
    let by_name: HashMap<&str, &ReceivedPart> =
        received.iter().map(|p| (p.name.as_str(), p)).collect();
    assert_eq!(by_name["api_key"].data, b"test-key");
    assert_eq!(by_name["async"].data, b"0");
    assert_eq!(by_name["is_public"].data, b"0");
    assert_eq!(by_name["title"].data, "Été".as_bytes());
    assert_eq!(by_name["photo"].filename.as_deref(), Some("été.png"));
    assert_eq!(by_name["photo"].content_type.as_deref(), Some("image/png"));
}

#[tokio::test]
async fn test_upload_to_missing_route_is_http_error() {
    let (addr, _state) = spawn_server().await;
    let url = format!("http://{}/nowhere/", addr);
    let uploader = Uploader::new(Arc::new(ReqwestTransport::with_scheme("http")), "k")
        .with_urls(url.clone(), url);

    let err = uploader
        .upload(PhotoFile::new("a.jpg", b"x".to_vec()), Params::new())
        .await
        .unwrap_err();

    assert!(err.to_string().starts_with("HTTP Error 404"), "{}", err);
}

#[tokio::test]
async fn test_connection_refused_propagates() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = ReqwestTransport::with_scheme("http");
    let result = multipart::post(&transport, &addr.to_string(), "/", &[], &[]).await;

    assert!(matches!(result, Err(flickr_api::FlickrError::Transport(_))));
}

// == REST Client ==

#[tokio::test]
async fn test_rest_call_with_cache() {
    let (addr, state) = spawn_server().await;
    let mut client = RestClient::new(Arc::new(ReqwestTransport::with_scheme("http")))
        .with_keys("key", "secret")
        .with_endpoint(addr.to_string(), "/services/rest/");
    client.enable_cache();

    let params = Params::new().with("text", "red & blue");
    let first = client.call("flickr.test.echo", params.clone()).await.unwrap();
    let second = client.call("flickr.test.echo", params).await.unwrap();
    let other = client
        .call("flickr.test.echo", Params::new().with("text", "green"))
        .await
        .unwrap();

    assert_eq!(first, json!({"method": "flickr.test.echo", "text": "red & blue", "stat": "ok"}));
    assert_eq!(first, second);
    assert_eq!(other["text"], "green");
    assert_eq!(state.rest_calls.load(Ordering::SeqCst), 2);
}
