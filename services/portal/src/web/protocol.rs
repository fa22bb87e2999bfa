//! services/portal/src/web/protocol.rs
//!
//! Defines the WebSocket message protocol between the browser client and the
//! portal service for navigation tracking.

use portal_core::domain::{ContentMetadata, PageMeta, UserSnapshot, UserType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//=========================================================================================
// Messages Sent FROM the Client (Browser) TO the Server
//=========================================================================================

/// Represents the structured text messages a client can send to the server.
#[derive(Deserialize, Debug)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// A committed navigation. The router fires this exactly once per
    /// transition, including query-only changes.
    Navigate {
        pathname: String,
        #[serde(default)]
        query: BTreeMap<String, String>,
        #[serde(default)]
        metadata: Option<ContentMetadata>,
        #[serde(default)]
        user_type: UserType,
        /// The already-resolved session snapshot, when one exists.
        #[serde(default)]
        user: Option<UserSnapshot>,
    },
}

//=========================================================================================
// Messages Sent FROM the Server TO the Client (Browser)
//=========================================================================================

/// Represents the structured text messages the server can send to the client.
#[derive(Serialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The generated page identity. The client applies `meta.title` to the
    /// document chrome.
    PageMeta { meta: PageMeta },

    /// Instructs the client to navigate elsewhere (confirmation flow).
    Redirect { to: String },

    /// Reports a fatal error to the client, which should display an error message.
    Error { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigate_parses_with_minimal_fields() {
        let raw = r#"{ "type": "navigate", "pathname": "/beneficios" }"#;
        let msg: ClientMessage = serde_json::from_str(raw).unwrap();
        let ClientMessage::Navigate {
            pathname,
            query,
            metadata,
            user_type,
            user,
        } = msg;
        assert_eq!(pathname, "/beneficios");
        assert!(query.is_empty());
        assert!(metadata.is_none());
        assert_eq!(user_type, UserType::Guest);
        assert!(user.is_none());
    }

    #[test]
    fn navigate_parses_full_payload() {
        let raw = r#"{
            "type": "navigate",
            "pathname": "/curso/robotica",
            "query": { "page": "2" },
            "metadata": { "title": "Robótica Jr", "name": null, "commerce": null, "category": null, "type": null },
            "user_type": "member"
        }"#;
        let ClientMessage::Navigate {
            pathname,
            query,
            metadata,
            user_type,
            ..
        } = serde_json::from_str(raw).unwrap();
        assert_eq!(pathname, "/curso/robotica");
        assert_eq!(query.get("page").unwrap(), "2");
        assert_eq!(metadata.unwrap().title.as_deref(), Some("Robótica Jr"));
        assert_eq!(user_type, UserType::Member);
    }

    #[test]
    fn server_messages_tag_their_variant() {
        let msg = ServerMessage::Redirect {
            to: "/pago-exitoso?order=42".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"redirect""#));
        assert!(json.contains("/pago-exitoso?order=42"));
    }
}
