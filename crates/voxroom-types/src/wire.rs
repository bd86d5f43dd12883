//! JSON bodies exchanged with the backend service.

use crate::DocumentRef;
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    #[serde(rename = "roomName")]
    pub room_name: String,
    #[serde(rename = "participantName")]
    pub participant_name: String,
}

/// Response body for `POST /api/token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Opaque join token for the media server.
    pub token: String,
    /// Media server URL, when the backend advertises one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response body for `GET /api/documents`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DocumentsResponse {
    #[serde(default)]
    pub documents: Vec<DocumentRef>,
}

/// Response body for `POST /api/upload`.
///
/// A successful upload carries `message`; a failed one carries `error`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Generic `{error}` body returned by the backend on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
