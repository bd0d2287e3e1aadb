//! # Switchboard
//!
//! A signaling relay for browser-to-browser media sessions: clients
//! discover each other inside named rooms and exchange the session
//! descriptions and ICE candidates needed to establish direct peer links,
//! plus room-scoped chat and mute notifications. Media never passes
//! through the relay.
//!
//! ## Design
//!
//! - **Unicast by identity** for negotiation payloads: the offer/answer/
//!   candidate handshake is strictly pairwise, so `signal` events are
//!   forwarded to exactly the addressed connection with the true sender
//!   stamped server-side.
//! - **Room fan-out** for membership, chat, and mute events: every member
//!   must keep a consistent peer roster, so these broadcast to the whole
//!   room except the originator.
//! - **Best-effort relay**: malformed events, stale targets, and roomless
//!   mutations degrade silently to no-ops; the end-to-end negotiation
//!   layer recovers from lost messages by renegotiating.
//!
//! ## Modules
//!
//! - [`relay`]: registry, room directory, hub, router, and the WebSocket
//!   transport
//! - [`api`]: HTTP surface (signaling endpoint, health, static assets)
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use switchboard::api::{serve, AppState};
//! use switchboard::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = AppState::new(Config::default());
//!     serve(state).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod relay;

// Re-export top-level types for convenience
pub use api::{build_router, serve, ApiError, ApiResult, AppState};

pub use config::{Config, ConfigError, LoggingConfig, RelayConfig, ServerConfig};

pub use relay::{
    websocket_handler, ClientMessage, ConnectionId, ConnectionRegistry, HubConfig, HubError,
    MessageRouter, RelayHub, RoomDirectory, ServerMessage,
};
