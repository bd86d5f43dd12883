use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("no media server URL configured or advertised")]
    MissingServerUrl,

    #[error("invalid media server URL: {0}")]
    InvalidServerUrl(String),

    #[error("join token is empty")]
    EmptyToken,

    #[error("media session is not connected")]
    NotConnected,
}
