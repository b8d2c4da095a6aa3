//! # webpanel-protocol
//!
//! Message types and codec for the browser poll protocol.
//!
//! The browser posts form-encoded [`PollRequest`]s and receives
//! [`SyncResponse`] JSON documents. The engine in `webpanel-core` writes the
//! responses directly into the transport buffer; the types here describe the
//! same wire format for transports, tools and tests.

pub mod codec;
pub mod messages;

pub use codec::{decode_sync_response, encode_sync_response, CodecError};
pub use messages::*;
