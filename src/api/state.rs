//! Application State
//!
//! Shared state accessible by all HTTP handlers, wrapped in Arc for
//! sharing across async tasks.

use crate::config::Config;
use crate::relay::{HubConfig, MessageRouter, RelayHub};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
pub struct AppState {
    /// Router dispatching inbound signaling events
    pub router: Arc<MessageRouter>,
    /// Relay hub owning connection and room state
    pub hub: Arc<RelayHub>,
    /// Server configuration
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create application state from configuration
    pub fn new(config: Config) -> Self {
        let hub = Arc::new(RelayHub::new(HubConfig {
            max_connections: config.relay.max_connections,
        }));
        let router = Arc::new(MessageRouter::new(Arc::clone(&hub)));

        Self {
            router,
            hub,
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
