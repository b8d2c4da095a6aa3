//! Protocol message types.
//!
//! - Browser → Server: [`PollRequest`], form-encoded
//!   (`id=<elementId|empty>&value=<string>&revision=<uint>`)
//! - Server → Browser: [`SyncResponse`], JSON
//!
//! # Example response
//! ```json
//! {"revision":1,"updates":[{"id":"s1","changes":[["value","75"]]}]}
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use webpanel_core::driver::{ARG_ID, ARG_REVISION, ARG_VALUE};
use webpanel_core::Revision;

/// A request posted by the browser: optional element update plus poll.
///
/// All fields are kept as text so that malformed input never fails
/// extraction; the engine parses them permissively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRequest {
    /// Target element id, empty for a pure poll.
    #[serde(default)]
    pub id: String,
    /// Value submitted for the target.
    #[serde(default)]
    pub value: String,
    /// Last revision the browser has seen.
    #[serde(default)]
    pub revision: String,
}

impl PollRequest {
    /// A pure poll from a client that has seen `revision`.
    pub fn poll(revision: Revision) -> Self {
        Self {
            revision: revision.to_string(),
            ..Default::default()
        }
    }

    /// Submit `value` for element `id`.
    pub fn update(id: impl Into<String>, value: impl Into<String>, revision: Revision) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
            revision: revision.to_string(),
        }
    }

    /// True if the request carries no element update.
    pub fn is_poll(&self) -> bool {
        self.id.is_empty()
    }

    /// The client revision, parsed permissively.
    pub fn client_revision(&self) -> Revision {
        Revision::parse_lenient(&self.revision)
    }

    /// Argument map for a driver.
    pub fn into_args(self) -> HashMap<String, String> {
        HashMap::from([
            (ARG_ID.to_string(), self.id),
            (ARG_VALUE.to_string(), self.value),
            (ARG_REVISION.to_string(), self.revision),
        ])
    }
}

/// One `[propertyName, propertyValue]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change(pub String, pub String);

impl Change {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self(name.into(), value.into())
    }

    /// Property name, possibly dotted (`style.display`).
    pub fn name(&self) -> &str {
        &self.0
    }

    pub fn value(&self) -> &str {
        &self.1
    }
}

/// All changes reported for one element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementUpdate {
    pub id: String,
    pub changes: Vec<Change>,
}

impl ElementUpdate {
    /// Value reported for the named property, if any.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.changes
            .iter()
            .find(|change| change.name() == name)
            .map(Change::value)
    }
}

/// Response to a [`PollRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Revision to send with the next request.
    pub revision: Revision,
    /// Elements changed since the client's revision, in tree order.
    pub updates: Vec<ElementUpdate>,
}

impl SyncResponse {
    /// The update for element `id`, if it was reported.
    pub fn update_for(&self, id: &str) -> Option<&ElementUpdate> {
        self.updates.iter().find(|update| update.id == id)
    }

    /// Ids of all reported elements, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.updates.iter().map(|update| update.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_request_defaults() {
        let req: PollRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_poll());
        assert_eq!(req.client_revision(), Revision(0));
    }

    #[test]
    fn test_poll_request_into_args() {
        let args = PollRequest::update("s1", "75", Revision(3)).into_args();
        assert_eq!(args.get("id").map(String::as_str), Some("s1"));
        assert_eq!(args.get("value").map(String::as_str), Some("75"));
        assert_eq!(args.get("revision").map(String::as_str), Some("3"));
    }

    #[test]
    fn test_lenient_revision() {
        let req = PollRequest {
            revision: "garbage".to_string(),
            ..Default::default()
        };
        assert_eq!(req.client_revision(), Revision(0));
        assert_eq!(PollRequest::poll(Revision(12)).client_revision(), Revision(12));
    }

    #[test]
    fn test_sync_response_deserialization() {
        let json = r#"{
            "revision": 6,
            "updates": [
                {"id": "a", "changes": [["checked", ""]]},
                {"id": "b", "changes": [["style.display", "none"], ["checked", "true"]]}
            ]
        }"#;

        let response: SyncResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.revision, Revision(6));
        assert_eq!(response.ids(), ["a", "b"]);

        let b = response.update_for("b").unwrap();
        assert_eq!(b.property("style.display"), Some("none"));
        assert_eq!(b.property("checked"), Some("true"));
        assert_eq!(b.property("value"), None);
        assert!(response.update_for("c").is_none());
    }

    #[test]
    fn test_sync_response_serialization() {
        let response = SyncResponse {
            revision: Revision(1),
            updates: vec![ElementUpdate {
                id: "s1".to_string(),
                changes: vec![Change::new("value", "75")],
            }],
        };
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(
            json,
            r#"{"revision":1,"updates":[{"id":"s1","changes":[["value","75"]]}]}"#
        );
    }
}
