use crate::error::VoiceError;
use crate::session::{MediaSession, RoomOptions};
use tracing::info;

/// Mounts rooms.
///
/// Implementations own the transport; the client only keeps the returned
/// [`MediaSession`] alive for as long as the chat screen exists.
pub trait MediaConnector: Send + Sync {
    fn connect(&self, options: RoomOptions) -> Result<MediaSession, VoiceError>;
}

impl<C: MediaConnector + ?Sized> MediaConnector for std::sync::Arc<C> {
    fn connect(&self, options: RoomOptions) -> Result<MediaSession, VoiceError> {
        (**self).connect(options)
    }
}

/// Connector for LiveKit-compatible media servers.
///
/// Checks the options the SDK will be handed and produces the session handle
/// the SDK binding reports through.
#[derive(Debug, Default, Clone)]
pub struct LiveKitConnector;

impl LiveKitConnector {
    pub fn new() -> Self {
        Self
    }
}

/// Accepted URL schemes for the media server.
const MEDIA_URL_SCHEMES: &[&str] = &["ws://", "wss://", "http://", "https://"];

fn validate_server_url(url: &str) -> Result<(), VoiceError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(VoiceError::MissingServerUrl);
    }
    let Some(scheme) = MEDIA_URL_SCHEMES.iter().find(|s| url.starts_with(**s)) else {
        return Err(VoiceError::InvalidServerUrl(url.to_string()));
    };
    if url.len() == scheme.len() {
        return Err(VoiceError::InvalidServerUrl(url.to_string()));
    }
    Ok(())
}

impl MediaConnector for LiveKitConnector {
    fn connect(&self, options: RoomOptions) -> Result<MediaSession, VoiceError> {
        validate_server_url(&options.server_url)?;
        if options.token.trim().is_empty() {
            return Err(VoiceError::EmptyToken);
        }

        info!(
            server_url = %options.server_url,
            token_len = options.token.len(),
            audio = options.audio,
            video = options.video,
            "mounting media session"
        );

        Ok(MediaSession::new(options))
    }
}
