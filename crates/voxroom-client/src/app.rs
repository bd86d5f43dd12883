//! Application model: which screen is showing and everything the user can do
//! on it.
//!
//! All state is owned by [`App`] and changed only by the loop that owns it.
//! Network requests run as spawned tasks and report back as [`AppEvent`]s
//! tagged with the session they belong to; results for a session that has
//! since been torn down are dropped.

use crate::chat::{ChatScreen, LiveRoom, Session};
use crate::config::UploadConfig;
use crate::connect::ConnectScreen;
use crate::upload::UploadRejection;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use voxroom_backend::{BackendClient, BackendError, DocumentUpload};
use voxroom_types::wire::{TokenRequest, TokenResponse};
use voxroom_types::DocumentRef;
use voxroom_voice::{MediaConfig, MediaConnector, MediaEvent, MediaSession, RoomOptions};

/// Result of background work, delivered to the owning loop.
#[derive(Debug)]
pub enum AppEvent {
    TokenLoaded {
        session: Uuid,
        result: Result<TokenResponse, BackendError>,
    },
    DocumentsLoaded {
        session: Uuid,
        result: Result<Vec<DocumentRef>, BackendError>,
    },
    UploadFinished {
        session: Uuid,
        result: Result<String, String>,
    },
    UploadMessageExpired {
        session: Uuid,
        generation: u64,
    },
    Media {
        session: Uuid,
        event: MediaEvent,
    },
}

/// Which screen is showing.
#[derive(Debug)]
pub enum Screen {
    Connect,
    Chat(ChatScreen),
}

/// The whole client.
pub struct App<C> {
    backend: BackendClient,
    connector: C,
    media: MediaConfig,
    upload: UploadConfig,
    connect: ConnectScreen,
    screen: Screen,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    should_quit: bool,
}

/// Text of the alert raised when the join token cannot be obtained.
pub fn backend_unreachable_alert(base_url: &str) -> String {
    format!("Cannot connect to server. Make sure backend is running on {base_url}")
}

fn chat_for(screen: &mut Screen, session: Uuid) -> Option<&mut ChatScreen> {
    match screen {
        Screen::Chat(chat) if chat.session().id == session => Some(chat),
        _ => None,
    }
}

impl<C: MediaConnector> App<C> {
    /// Creates the app on the connect screen. Background results arrive on
    /// the returned receiver and must be passed to [`App::handle`].
    pub fn new(
        backend: BackendClient,
        connector: C,
        media: MediaConfig,
        upload: UploadConfig,
    ) -> (Self, mpsc::UnboundedReceiver<AppEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let app = Self {
            backend,
            connector,
            media,
            upload,
            connect: ConnectScreen::new(),
            screen: Screen::Connect,
            events_tx,
            should_quit: false,
        };
        (app, events_rx)
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn connect_screen(&self) -> &ConnectScreen {
        &self.connect
    }

    pub fn connect_screen_mut(&mut self) -> &mut ConnectScreen {
        &mut self.connect
    }

    pub fn chat(&self) -> Option<&ChatScreen> {
        match &self.screen {
            Screen::Chat(chat) => Some(chat),
            Screen::Connect => None,
        }
    }

    pub fn chat_mut(&mut self) -> Option<&mut ChatScreen> {
        match &mut self.screen {
            Screen::Chat(chat) => Some(chat),
            Screen::Connect => None,
        }
    }

    pub fn backend(&self) -> &BackendClient {
        &self.backend
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Moves to the chat screen and starts the session bootstrap. Returns
    /// `false` (and does nothing) if the join gate is closed or a session is
    /// already open.
    pub fn join(&mut self) -> bool {
        if !matches!(self.screen, Screen::Connect) {
            return false;
        }
        let Some(room_name) = self.connect.submit() else {
            return false;
        };

        let session = Session::new(room_name);
        info!(
            session = %session.id,
            room = %session.room_name,
            participant = %session.participant_name,
            "joining room"
        );

        self.spawn_token_request(&session);
        self.spawn_document_fetch(session.id);
        self.screen = Screen::Chat(ChatScreen::new(session, self.upload.max_bytes));
        true
    }

    /// Tears down the session and returns to the connect screen. The room
    /// name field keeps its last value.
    pub fn disconnect(&mut self) {
        if let Screen::Chat(chat) = std::mem::replace(&mut self.screen, Screen::Connect) {
            info!(
                session = %chat.session().id,
                room = %chat.session().room_name,
                entries = chat.transcript().len(),
                "ending session"
            );
            drop(chat);
        }
    }

    pub fn dismiss_alert(&mut self) {
        if let Some(chat) = self.chat_mut() {
            chat.dismiss_alert();
        }
    }

    /// Validates the typed path and, if accepted, starts the upload.
    ///
    /// Uploads are only offered once the room is mounted; at most one runs
    /// at a time.
    pub fn submit_upload(&mut self) -> Result<(), UploadRejection> {
        let Screen::Chat(chat) = &mut self.screen else {
            return Err(UploadRejection::NothingSelected);
        };
        if !chat.is_live() {
            return Err(UploadRejection::NothingSelected);
        }

        let selected = match chat.upload_mut().begin() {
            Ok(selected) => selected,
            Err(rejection) => {
                info!(%rejection, "upload rejected locally");
                return Err(rejection);
            }
        };

        let session = chat.session().id;
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = match tokio::fs::read(&selected.path).await {
                Ok(bytes) => backend
                    .upload_document(DocumentUpload {
                        file_name: selected.name.clone(),
                        content_type: selected.content_type_or_default().to_string(),
                        bytes,
                    })
                    .await
                    .map_err(|e| {
                        warn!(file = %selected.name, error = %e, "upload failed");
                        e.user_message()
                    }),
                Err(e) => {
                    warn!(file = %selected.name, error = %e, "could not read file for upload");
                    Err(e.to_string())
                }
            };
            let _ = tx.send(AppEvent::UploadFinished { session, result });
        });
        Ok(())
    }

    /// Applies one background result.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::TokenLoaded { session, result } => self.on_token(session, result),
            AppEvent::DocumentsLoaded { session, result } => {
                let Some(chat) = chat_for(&mut self.screen, session) else {
                    debug!(%session, "dropping document list for closed session");
                    return;
                };
                match result {
                    Ok(documents) => chat.set_documents(documents),
                    Err(e) => warn!(error = %e, "failed to fetch documents"),
                }
            }
            AppEvent::UploadFinished { session, result } => {
                let Some(chat) = chat_for(&mut self.screen, session) else {
                    debug!(%session, "dropping upload result for closed session");
                    return;
                };
                let succeeded = result.is_ok();
                if let Some(generation) = chat.upload_mut().finish(result) {
                    self.spawn_message_expiry(session, generation);
                }
                if succeeded {
                    self.spawn_document_fetch(session);
                }
            }
            AppEvent::UploadMessageExpired {
                session,
                generation,
            } => {
                if let Some(chat) = chat_for(&mut self.screen, session) {
                    chat.upload_mut().expire(generation);
                }
            }
            AppEvent::Media { session, event } => {
                if let Some(chat) = chat_for(&mut self.screen, session) {
                    chat.apply_media_event(event);
                }
            }
        }
    }

    fn on_token(&mut self, session: Uuid, result: Result<TokenResponse, BackendError>) {
        let Some(chat) = chat_for(&mut self.screen, session) else {
            debug!(%session, "dropping token for closed session");
            return;
        };
        if !chat.is_loading() {
            return;
        }

        let token = match result {
            Ok(token) => token,
            Err(e) => {
                error!(%session, error = %e, "error generating token");
                chat.fail(backend_unreachable_alert(self.backend.base_url()));
                return;
            }
        };

        let Some(server_url) = self.media.resolve_url(token.url.as_deref()) else {
            error!(%session, "no media server URL configured or advertised");
            chat.fail("Cannot join the room: no media server URL is configured");
            return;
        };

        match self
            .connector
            .connect(RoomOptions::audio_only(server_url, token.token))
        {
            Ok(media) => {
                let forwarder = spawn_media_forwarder(&media, session, self.events_tx.clone());
                chat.go_live(LiveRoom::new(media, forwarder));
                info!(%session, "media session mounted");
            }
            Err(e) => {
                error!(%session, error = %e, "failed to mount media session");
                chat.fail(format!("Cannot join the room: {e}"));
            }
        }
    }

    fn spawn_token_request(&self, session: &Session) {
        let request = TokenRequest {
            room_name: session.room_name.clone(),
            participant_name: session.participant_name.clone(),
        };
        let id = session.id;
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.request_token(&request).await;
            let _ = tx.send(AppEvent::TokenLoaded {
                session: id,
                result,
            });
        });
    }

    fn spawn_document_fetch(&self, session: Uuid) {
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.list_documents().await;
            let _ = tx.send(AppEvent::DocumentsLoaded { session, result });
        });
    }

    fn spawn_message_expiry(&self, session: Uuid, generation: u64) {
        let ttl = self.upload.message_ttl();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            let _ = tx.send(AppEvent::UploadMessageExpired {
                session,
                generation,
            });
        });
    }
}

/// Forwards media events into the app channel until the session goes away.
fn spawn_media_forwarder(
    media: &MediaSession,
    session: Uuid,
    tx: mpsc::UnboundedSender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    let mut rx = media.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if tx.send(AppEvent::Media { session, event }).is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(%session, skipped, "media events lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}
