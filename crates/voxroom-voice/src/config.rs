use serde::{Deserialize, Serialize};

/// Media server settings.
///
/// `server_url` may be left empty, in which case the URL advertised by the
/// token endpoint is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default)]
    pub server_url: String,
}

impl MediaConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.server_url.trim().is_empty()
    }

    /// Picks the media server URL for a session: the configured one first,
    /// then the one the backend advertised alongside the token.
    pub fn resolve_url(&self, advertised: Option<&str>) -> Option<String> {
        if self.is_configured() {
            return Some(self.server_url.trim().to_string());
        }
        advertised
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(str::to_string)
    }
}
