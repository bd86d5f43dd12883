use crate::error::VoiceError;
use tokio::sync::broadcast;
use tracing::info;
use voxroom_types::{Speaker, VoiceActivity};

/// Default capacity for the per-session media event broadcast channel.
const DEFAULT_MEDIA_EVENT_CAPACITY: usize = 256;

/// What the client asks for when it mounts a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomOptions {
    pub server_url: String,
    pub token: String,
    pub audio: bool,
    pub video: bool,
}

impl RoomOptions {
    /// Options for a voice room: microphone on, camera off.
    pub fn audio_only(server_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            token: token.into(),
            audio: true,
            video: false,
        }
    }
}

/// Event pushed by the media SDK binding while a room is mounted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaEvent {
    /// Voice-activity detection changed.
    VoiceActivity(VoiceActivity),
    /// A finished utterance was transcribed.
    Transcript { speaker: Speaker, text: String },
}

/// Cloneable handle the SDK binding uses to report events into a session.
#[derive(Debug, Clone)]
pub struct MediaEventSender {
    tx: broadcast::Sender<MediaEvent>,
}

impl MediaEventSender {
    /// Publishes an event. Returns `false` if nobody is subscribed.
    pub fn send(&self, event: MediaEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn voice_activity(&self, listening: bool, speaking: bool) -> bool {
        self.send(MediaEvent::VoiceActivity(VoiceActivity {
            listening,
            speaking,
        }))
    }

    pub fn transcript(&self, speaker: Speaker, text: impl Into<String>) -> bool {
        self.send(MediaEvent::Transcript {
            speaker,
            text: text.into(),
        })
    }
}

/// A mounted room.
///
/// Dropping the session disconnects it.
#[derive(Debug)]
pub struct MediaSession {
    options: RoomOptions,
    connected: bool,
    events: broadcast::Sender<MediaEvent>,
}

impl MediaSession {
    pub fn new(options: RoomOptions) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_MEDIA_EVENT_CAPACITY);
        Self {
            options,
            connected: true,
            events,
        }
    }

    pub fn options(&self) -> &RoomOptions {
        &self.options
    }

    pub fn token(&self) -> &str {
        &self.options.token
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Returns the sender the SDK binding reports through.
    pub fn event_sender(&self) -> Result<MediaEventSender, VoiceError> {
        if !self.connected {
            return Err(VoiceError::NotConnected);
        }
        Ok(MediaEventSender {
            tx: self.events.clone(),
        })
    }

    /// Subscribes to events from this session.
    pub fn subscribe(&self) -> broadcast::Receiver<MediaEvent> {
        self.events.subscribe()
    }

    pub fn disconnect(&mut self) {
        if self.connected {
            info!(server_url = %self.options.server_url, "disconnecting media session");
            self.connected = false;
        }
    }
}

impl Drop for MediaSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}
