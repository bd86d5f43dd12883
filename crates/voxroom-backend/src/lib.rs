//! HTTP client for the voxroom backend service.
//!
//! The backend issues room join tokens, lists the documents in its index and
//! accepts new documents for indexing. Everything behind those endpoints is
//! opaque to the client; this crate only speaks the REST surface:
//!
//! - `POST /api/token` → [`BackendClient::request_token`]
//! - `GET /api/documents` → [`BackendClient::list_documents`]
//! - `POST /api/upload` → [`BackendClient::upload_document`]
//! - `GET /health` → [`BackendClient::health`]

pub mod client;
pub mod error;

pub use client::{BackendClient, DocumentUpload};
pub use error::BackendError;
