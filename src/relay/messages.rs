//! Wire Protocol Types
//!
//! Defines all message types exchanged between browser clients and the
//! Switchboard relay. Event names and field names follow the signaling
//! vocabulary clients already speak (`join room`, `signal`, `toggle-mute`,
//! `chat message`, and the matching server-side announcements).
//!
//! SDP and ICE payloads are carried as raw JSON values. The relay forwards
//! them verbatim and never inspects their contents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::registry::ConnectionId;

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Enter a named room, leaving any previous room
    #[serde(rename = "join room")]
    JoinRoom {
        /// Free-form room name, not validated beyond non-empty
        room: String,
    },
    /// Forward a negotiation payload to exactly one peer
    ///
    /// A `sender` field supplied by the client has no counterpart here and
    /// is dropped during deserialization; the relay stamps the true sender.
    #[serde(rename = "signal")]
    Signal {
        /// Identity of the addressed peer
        target: ConnectionId,
        /// Opaque session description, relayed untouched
        #[serde(default)]
        sdp: Option<Value>,
        /// Opaque ICE candidate, relayed untouched
        #[serde(default)]
        ice: Option<Value>,
    },
    /// Announce the sender's mute state to the rest of the room
    #[serde(rename = "toggle-mute")]
    ToggleMute {
        #[serde(rename = "isMuted")]
        is_muted: bool,
    },
    /// Room-scoped chat text
    #[serde(rename = "chat message")]
    Chat {
        /// Chat text, rendered locally by the sender
        message: String,
    },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Session established; tells the client its own identity
    #[serde(rename = "connected")]
    Connected {
        #[serde(rename = "connectionId")]
        connection_id: ConnectionId,
    },
    /// A new member entered the room (sent to pre-existing members only)
    #[serde(rename = "user-joined")]
    UserJoined {
        #[serde(rename = "userId")]
        user_id: ConnectionId,
    },
    /// A relayed negotiation payload (sent only to the stamped target)
    #[serde(rename = "signal")]
    Signal {
        /// True identity of the sending connection, stamped by the relay
        sender: ConnectionId,
        #[serde(skip_serializing_if = "Option::is_none")]
        sdp: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        ice: Option<Value>,
    },
    /// A room member changed its mute state
    #[serde(rename = "user-muted")]
    UserMuted {
        #[serde(rename = "userId")]
        user_id: ConnectionId,
        #[serde(rename = "isMuted")]
        is_muted: bool,
    },
    /// Room-scoped chat text from another member
    #[serde(rename = "chat message")]
    Chat { message: String },
    /// A member left the room (disconnect or replaced membership)
    #[serde(rename = "user-left")]
    UserLeft {
        #[serde(rename = "userId")]
        user_id: ConnectionId,
    },
}
