#![allow(dead_code)]

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::mpsc::UnboundedReceiver;
use voxroom_backend::BackendClient;
use voxroom_client::config::UploadConfig;
use voxroom_client::{App, AppEvent};
use voxroom_voice::{
    MediaConfig, MediaConnector, MediaEventSender, MediaSession, RoomOptions, VoiceError,
};

pub const MEDIA_URL: &str = "ws://localhost:7880";

/// How the mock answers `POST /api/token`.
#[derive(Debug, Clone)]
pub enum TokenMode {
    Issue { token: String, url: Option<String> },
    Fail(StatusCode),
}

#[derive(Debug)]
pub struct MockState {
    pub token_mode: TokenMode,
    pub documents_fail: bool,
    pub upload_error: Option<String>,
    pub upload_delay: Duration,
    pub token_calls: AtomicUsize,
    pub document_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub token_bodies: Mutex<Vec<Value>>,
    pub documents: Mutex<Vec<String>>,
}

impl MockState {
    pub fn issuing(token: &str) -> Self {
        Self {
            token_mode: TokenMode::Issue {
                token: token.to_string(),
                url: None,
            },
            documents_fail: false,
            upload_error: None,
            upload_delay: Duration::ZERO,
            token_calls: AtomicUsize::new(0),
            document_calls: AtomicUsize::new(0),
            upload_calls: AtomicUsize::new(0),
            token_bodies: Mutex::new(Vec::new()),
            documents: Mutex::new(vec!["pricing.pdf".to_string()]),
        }
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    pub fn document_calls(&self) -> usize {
        self.document_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

async fn token_handler(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    state.token_calls.fetch_add(1, Ordering::SeqCst);
    state.token_bodies.lock().unwrap().push(body);
    match &state.token_mode {
        TokenMode::Issue { token, url } => {
            let mut body = json!({ "token": token });
            if let Some(url) = url {
                body["url"] = json!(url);
            }
            Json(body).into_response()
        }
        TokenMode::Fail(status) => {
            (*status, Json(json!({ "error": "token service down" }))).into_response()
        }
    }
}

async fn documents_handler(State(state): State<Arc<MockState>>) -> Response {
    state.document_calls.fetch_add(1, Ordering::SeqCst);
    if state.documents_fail {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "index offline" })),
        )
            .into_response();
    }
    let docs: Vec<Value> = state
        .documents
        .lock()
        .unwrap()
        .iter()
        .map(|name| json!({ "name": name }))
        .collect();
    Json(json!({ "documents": docs })).into_response()
}

async fn upload_handler(State(state): State<Arc<MockState>>, mut multipart: Multipart) -> Response {
    state.upload_calls.fetch_add(1, Ordering::SeqCst);
    if !state.upload_delay.is_zero() {
        tokio::time::sleep(state.upload_delay).await;
    }

    let mut uploaded = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("unnamed").to_string();
        let _ = field.bytes().await;
        uploaded = Some(name);
    }

    if let Some(error) = &state.upload_error {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": error }))).into_response();
    }
    match uploaded {
        Some(name) => {
            state.documents.lock().unwrap().push(name.clone());
            Json(json!({ "message": format!("Successfully uploaded {name}") })).into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No file provided" })),
        )
            .into_response(),
    }
}

/// Starts the mock backend and returns its base URL.
pub async fn spawn_backend(state: Arc<MockState>) -> String {
    let router = Router::new()
        .route("/api/token", post(token_handler))
        .route("/api/documents", get(documents_handler))
        .route("/api/upload", post(upload_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Connector that records what it was asked to mount and keeps a sender for
/// every session so tests can play the media SDK.
#[derive(Debug, Clone, Default)]
pub struct RecordingConnector {
    pub mounted: Arc<Mutex<Vec<RoomOptions>>>,
    pub senders: Arc<Mutex<Vec<MediaEventSender>>>,
}

impl RecordingConnector {
    pub fn mounted(&self) -> Vec<RoomOptions> {
        self.mounted.lock().unwrap().clone()
    }

    pub fn last_sender(&self) -> MediaEventSender {
        self.senders
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("a session should be mounted")
    }
}

impl MediaConnector for RecordingConnector {
    fn connect(&self, options: RoomOptions) -> Result<MediaSession, VoiceError> {
        self.mounted.lock().unwrap().push(options.clone());
        let session = MediaSession::new(options);
        self.senders.lock().unwrap().push(session.event_sender()?);
        Ok(session)
    }
}

pub fn new_app(
    backend_url: &str,
    media: MediaConfig,
) -> (
    App<RecordingConnector>,
    UnboundedReceiver<AppEvent>,
    RecordingConnector,
) {
    let connector = RecordingConnector::default();
    let (app, rx) = App::new(
        BackendClient::new(backend_url),
        connector.clone(),
        media,
        UploadConfig::default(),
    );
    (app, rx, connector)
}

/// Feeds background results into the app until `done` holds.
pub async fn pump_until<C: MediaConnector>(
    app: &mut App<C>,
    rx: &mut UnboundedReceiver<AppEvent>,
    mut done: impl FnMut(&App<C>) -> bool,
) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while !done(app) {
        let event = tokio::time::timeout_at(deadline, rx.recv())
            .await
            .expect("timed out waiting for app state")
            .expect("event channel closed");
        app.handle(event);
    }
}

/// Joins `room` and waits until the media session is mounted.
pub async fn join_live<C: MediaConnector>(
    app: &mut App<C>,
    rx: &mut UnboundedReceiver<AppEvent>,
    room: &str,
) {
    app.connect_screen_mut().set_room_name(room);
    assert!(app.join(), "join should be accepted");
    pump_until(app, rx, |app| app.chat().is_some_and(|chat| chat.is_live())).await;
}
