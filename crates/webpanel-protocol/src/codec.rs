//! Decoding of sync responses.
//!
//! The server side never builds a [`SyncResponse`] value: the engine streams
//! the JSON straight into the transport buffer. Clients, tools and tests go
//! the other way and decode it here.

use crate::messages::SyncResponse;
use thiserror::Error;

/// Errors that can occur while decoding a response.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The body was empty.
    #[error("Empty response body")]
    EmptyBody,

    /// The body was not a valid sync response.
    #[error("Failed to decode sync response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode a sync response body.
pub fn decode_sync_response(text: &str) -> Result<SyncResponse, CodecError> {
    if text.trim().is_empty() {
        return Err(CodecError::EmptyBody);
    }
    serde_json::from_str(text).map_err(CodecError::from)
}

/// Encode a sync response, e.g. for a transport that replays one.
pub fn encode_sync_response(response: &SyncResponse) -> Result<String, CodecError> {
    serde_json::to_string(response).map_err(CodecError::from)
}
