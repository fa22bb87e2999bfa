//! crates/portal_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the navigation core.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the concrete analytics transport, session
//! backend, and time source.

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::UserSnapshot;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., the
/// analytics transport or the session backend).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The analytics sink the tracker emits to. Implementations are best-effort
/// transports; the tracker isolates every failure from the navigation path.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Prepares the sink for use. Must be idempotent; the tracker calls it
    /// at most once per process lifetime.
    async fn initialize(&self) -> PortResult<()>;

    fn is_initialized(&self) -> bool;

    /// Declares the session's user identity. Replace-not-append; safe to
    /// call on every navigation.
    async fn set_user_id(&self, user_id: &str) -> PortResult<()>;

    /// Attaches user properties to the session. Replace-not-append.
    async fn set_user_properties(&self, properties: BTreeMap<String, String>) -> PortResult<()>;

    async fn track_page_view(
        &self,
        path: &str,
        title: &str,
        location: &str,
        referrer: &str,
        user_type: &str,
    ) -> PortResult<()>;

    /// Dwell time spent on `path`, reported when the user navigates away.
    async fn track_time_on_page(&self, elapsed_millis: i64, path: &str) -> PortResult<()>;

    async fn track_search(&self, term: &str, module: &str) -> PortResult<()>;

    async fn track_filter_applied(
        &self,
        kind: &str,
        values: &[String],
        module: &str,
    ) -> PortResult<()>;

    async fn track_page_change(
        &self,
        page_number: u32,
        total_pages: Option<u32>,
        module: &str,
    ) -> PortResult<()>;

    async fn track_view_item(
        &self,
        item_id: &str,
        item_name: &str,
        item_type: &str,
    ) -> PortResult<()>;

    /// A named conversion marker with no payload.
    async fn track_event(&self, name: &str) -> PortResult<()>;

    async fn track_item_click(
        &self,
        item_id: &str,
        item_name: &str,
        item_type: &str,
        position: usize,
        list_name: &str,
    ) -> PortResult<()>;
}

/// Resolves a browser session token into the current user snapshot. The
/// snapshot arrives already resolved; this core performs no authentication.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Returns the user for the given session token, or `None` for a guest
    /// or expired session.
    async fn resolve_session(&self, session_token: &str) -> PortResult<Option<UserSnapshot>>;
}

/// The tracker's time source. Injected so dwell-time computation is
/// deterministic under test.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_millis(&self) -> i64;
}
