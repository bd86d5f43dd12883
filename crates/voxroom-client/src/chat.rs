//! The chat screen: session-scoped state created on join and dropped on
//! disconnect.

use crate::panel::PanelView;
use crate::transcript::Transcript;
use crate::upload::UploadPanel;
use rand::Rng;
use tokio::task::JoinHandle;
use uuid::Uuid;
use voxroom_types::{DocumentRef, Speaker, VoiceActivity};
use voxroom_voice::{MediaEvent, MediaSession};

const PARTICIPANT_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const PARTICIPANT_SUFFIX_LEN: usize = 6;

/// Random display label for the local participant, e.g. `User-k3j9x1`.
///
/// Only used as a name in the room; it carries no security meaning.
pub fn participant_label() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..PARTICIPANT_SUFFIX_LEN)
        .map(|_| PARTICIPANT_ALPHABET[rng.gen_range(0..PARTICIPANT_ALPHABET.len())] as char)
        .collect();
    format!("User-{suffix}")
}

/// Identity of one join attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub room_name: String,
    pub participant_name: String,
}

impl Session {
    pub fn new(room_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            room_name: room_name.into(),
            participant_name: participant_label(),
        }
    }
}

/// A mounted room plus the task forwarding its events to the app.
#[derive(Debug)]
pub struct LiveRoom {
    media: MediaSession,
    forwarder: JoinHandle<()>,
}

impl LiveRoom {
    pub fn new(media: MediaSession, forwarder: JoinHandle<()>) -> Self {
        Self { media, forwarder }
    }

    pub fn media(&self) -> &MediaSession {
        &self.media
    }
}

impl Drop for LiveRoom {
    fn drop(&mut self) {
        self.forwarder.abort();
        self.media.disconnect();
    }
}

/// Where the session bootstrap stands.
#[derive(Debug)]
pub enum ChatPhase {
    /// Waiting for the join token.
    Loading,
    /// The token request or the room mount failed. Nothing is mounted.
    Failed { reason: String },
    /// The room is mounted.
    Live(LiveRoom),
}

/// State that exists for exactly one session.
#[derive(Debug)]
pub struct ChatScreen {
    session: Session,
    phase: ChatPhase,
    alert: Option<String>,
    transcript: Transcript,
    activity: VoiceActivity,
    documents: Vec<DocumentRef>,
    upload: UploadPanel,
}

impl ChatScreen {
    pub fn new(session: Session, max_upload_bytes: u64) -> Self {
        Self {
            session,
            phase: ChatPhase::Loading,
            alert: None,
            transcript: Transcript::new(),
            activity: VoiceActivity::default(),
            documents: Vec::new(),
            upload: UploadPanel::new(max_upload_bytes),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> &ChatPhase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, ChatPhase::Loading)
    }

    pub fn is_live(&self) -> bool {
        matches!(self.phase, ChatPhase::Live(_))
    }

    /// The mounted media session, if any.
    pub fn media(&self) -> Option<&MediaSession> {
        match &self.phase {
            ChatPhase::Live(room) => Some(room.media()),
            _ => None,
        }
    }

    /// Alert waiting to be acknowledged.
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn activity(&self) -> VoiceActivity {
        self.activity
    }

    pub fn documents(&self) -> &[DocumentRef] {
        &self.documents
    }

    pub fn upload(&self) -> &UploadPanel {
        &self.upload
    }

    pub fn upload_mut(&mut self) -> &mut UploadPanel {
        &mut self.upload
    }

    /// Leaves the loading state without mounting anything and raises an
    /// alert.
    pub fn fail(&mut self, alert: impl Into<String>) {
        let alert = alert.into();
        self.phase = ChatPhase::Failed {
            reason: alert.clone(),
        };
        self.alert = Some(alert);
    }

    pub fn go_live(&mut self, room: LiveRoom) {
        self.phase = ChatPhase::Live(room);
    }

    pub fn set_documents(&mut self, documents: Vec<DocumentRef>) {
        self.documents = documents;
    }

    pub fn add_to_transcript(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.transcript.push(speaker, text);
    }

    pub fn apply_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::VoiceActivity(activity) => self.activity = activity,
            MediaEvent::Transcript { speaker, text } => self.add_to_transcript(speaker, text),
        }
    }

    /// The status/transcript/upload panel for this session.
    pub fn panel(&self) -> PanelView<'_> {
        PanelView {
            transcript: &self.transcript,
            activity: self.activity,
            documents: &self.documents,
            upload: &self.upload,
        }
    }
}
