//! Signaling Relay Core
//!
//! Tracks which connection belongs to which room, fans membership events
//! out to room members, and forwards opaque negotiation payloads to
//! exactly one addressed recipient.
//!
//! ## Architecture
//!
//! - **ConnectionRegistry**: identity allocation and per-connection
//!   bookkeeping
//! - **RoomDirectory**: room name → member set
//! - **RelayHub**: single-writer owner of registry + directory; unicast
//!   and room fan-out delivery
//! - **MessageRouter**: inbound event dispatch
//! - **Handler**: WebSocket upgrade and the per-connection socket pump
//! - **Messages**: the wire protocol
//!
//! ## Usage
//!
//! Clients connect to `/ws`, receive a `connected` event carrying their
//! identity, then join a room and signal peers by identity:
//!
//! ```javascript
//! // Browser
//! const ws = new WebSocket('ws://localhost:3000/ws');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'join room', room: 'standup'}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'user-joined') {
//!     ws.send(JSON.stringify({type: 'signal', target: msg.userId, sdp: offer}));
//!   }
//! };
//! ```

mod handler;
mod hub;
mod messages;
mod registry;
mod rooms;
mod router;

pub use handler::websocket_handler;
pub use hub::{HubConfig, HubError, RelayHub};
pub use messages::{ClientMessage, ServerMessage};
pub use registry::{ConnectionHandle, ConnectionId, ConnectionRegistry};
pub use rooms::RoomDirectory;
pub use router::MessageRouter;
