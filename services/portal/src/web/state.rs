//! services/portal/src/web/state.rs
//!
//! Defines the application's shared and connection-specific states.

use crate::config::Config;
use portal_core::ports::{AnalyticsSink, Clock, SessionService};
use portal_core::tracker::NavigationTracker;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

//=========================================================================================
// AppState (Shared Across All Connections)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analytics: Arc<dyn AnalyticsSink>,
    pub sessions: Option<Arc<dyn SessionService>>,
    pub clock: Arc<dyn Clock>,
}

//=========================================================================================
// ConnectionState (Specific to One WebSocket Connection)
//=========================================================================================

/// The state for a single, active WebSocket connection. Navigation callbacks
/// arrive serially on the connection's message loop, so the tracker memory
/// is never accessed concurrently.
pub struct ConnectionState {
    pub tracker: NavigationTracker,
    /// Cancels the pending confirmation redirect, if any. Replaced on every
    /// navigation and cancelled on disconnect, so a timer can never fire for
    /// a page the user already left.
    pub pending_redirect: CancellationToken,
}

impl ConnectionState {
    /// Creates fresh per-connection state with empty tracker memory.
    pub fn new(app_state: &AppState) -> Self {
        Self {
            tracker: NavigationTracker::new(
                app_state.analytics.clone(),
                app_state.clock.clone(),
                app_state.config.site_base_url.clone(),
            ),
            pending_redirect: CancellationToken::new(),
        }
    }
}
