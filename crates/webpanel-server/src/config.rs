//! Server configuration.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use serde::{Deserialize, Serialize};

/// Configuration for the panel server.
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```json
/// { "bindAddr": "127.0.0.1:8080", "title": "Greenhouse" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Server name, used in logs.
    pub name: String,
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Page title.
    pub title: String,
    /// Extra markup for the page `<head>` (stylesheets, meta tags).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_extra: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "webpanel".to_string(),
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080)),
            title: "webpanel".to_string(),
            head_extra: None,
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.title, "webpanel");
        assert!(config.head_extra.is_none());
    }

    #[test]
    fn test_partial_json() {
        let config =
            ServerConfig::from_json(r#"{"bindAddr": "127.0.0.1:9000", "headExtra": "<meta>"}"#)
                .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.head_extra.as_deref(), Some("<meta>"));
        assert_eq!(config.name, "webpanel");
    }

    #[test]
    fn test_invalid_json() {
        assert!(ServerConfig::from_json(r#"{"bindAddr": "nowhere"}"#).is_err());
    }
}
