use crate::error::BackendError;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use voxroom_types::wire::{
    DocumentsResponse, ErrorBody, HealthResponse, TokenRequest, TokenResponse, UploadResponse,
};
use voxroom_types::DocumentRef;

/// Message shown when the backend accepts an upload without saying anything.
const DEFAULT_UPLOAD_MESSAGE: &str = "File uploaded";

/// A file ready to be posted to `/api/upload`.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Client for the backend REST surface.
///
/// Cheap to clone; clones share the underlying connection pool. Requests
/// carry no timeout and are never retried.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Requests a join token for `request.room_name`.
    pub async fn request_token(
        &self,
        request: &TokenRequest,
    ) -> Result<TokenResponse, BackendError> {
        debug!(room = %request.room_name, participant = %request.participant_name, "requesting join token");
        let resp = self
            .http
            .post(self.endpoint("/api/token"))
            .json(request)
            .send()
            .await?;
        let token: TokenResponse = decode(resp).await?;
        info!(room = %request.room_name, "received join token");
        Ok(token)
    }

    /// Fetches the full list of indexed documents.
    pub async fn list_documents(&self) -> Result<Vec<DocumentRef>, BackendError> {
        let resp = self
            .http
            .get(self.endpoint("/api/documents"))
            .send()
            .await?;
        let body: DocumentsResponse = decode(resp).await?;
        debug!(count = body.documents.len(), "fetched document list");
        Ok(body.documents)
    }

    /// Posts a document as multipart field `file`. Returns the backend's
    /// success message.
    pub async fn upload_document(&self, upload: DocumentUpload) -> Result<String, BackendError> {
        let size = upload.bytes.len();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| {
                BackendError::InvalidRequest(format!(
                    "content type {:?}: {}",
                    upload.content_type, e
                ))
            })?;
        let form = Form::new().part("file", part);

        info!(file = %upload.file_name, size, "uploading document");
        let resp = self
            .http
            .post(self.endpoint("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = decode(resp).await?;
        Ok(body
            .message
            .unwrap_or_else(|| DEFAULT_UPLOAD_MESSAGE.to_string()))
    }

    pub async fn health(&self) -> Result<HealthResponse, BackendError> {
        let resp = self.http.get(self.endpoint("/health")).send().await?;
        decode(resp).await
    }
}

/// Decodes a 2xx JSON body, or turns a non-2xx response into
/// [`BackendError::Status`] carrying the backend's `error` text if present.
async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, BackendError> {
    let status = resp.status();
    let body = resp.bytes().await?;

    if !status.is_success() {
        let message = match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(err) => err.error,
            Err(_) => {
                let text = String::from_utf8_lossy(&body).trim().to_string();
                if text.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    text
                }
            }
        };
        return Err(BackendError::Status {
            status: status.as_u16(),
            message,
        });
    }

    Ok(serde_json::from_slice(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:5000/");
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(
            client.endpoint("/api/token"),
            "http://localhost:5000/api/token"
        );
    }

    #[test]
    fn base_url_path_prefix_is_kept() {
        let client = BackendClient::new("https://example.com/voice");
        assert_eq!(
            client.endpoint("/api/documents"),
            "https://example.com/voice/api/documents"
        );
    }
}
