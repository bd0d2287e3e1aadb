//! Data Transfer Objects
//!
//! Response types for the HTTP endpoints, serialized to JSON.

use serde::Serialize;

/// Full health status document
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "healthy"
    pub status: String,
    /// Live signaling connections
    pub connections: usize,
    /// Non-empty rooms
    pub rooms: usize,
    /// Seconds since the server started
    pub uptime_seconds: u64,
    /// Server version
    pub version: String,
}
