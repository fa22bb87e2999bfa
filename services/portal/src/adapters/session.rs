//! services/portal/src/adapters/session.rs
//!
//! This module contains the session adapter, the concrete implementation of
//! the `SessionService` port. It fetches the already-resolved user snapshot
//! from the upstream session provider over HTTP.

use async_trait::async_trait;
use portal_core::domain::UserSnapshot;
use portal_core::ports::{PortError, PortResult, SessionService};
use serde::Deserialize;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A session adapter that implements the `SessionService` port against the
/// upstream session provider's REST interface.
#[derive(Clone)]
pub struct HttpSessionAdapter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSessionAdapter {
    /// Creates a new `HttpSessionAdapter`.
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

/// The session provider's response shape. The user is absent for guest or
/// expired sessions.
#[derive(Deserialize)]
struct SessionPayload {
    user: Option<UserSnapshot>,
}

//=========================================================================================
// `SessionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionService for HttpSessionAdapter {
    async fn resolve_session(&self, session_token: &str) -> PortResult<Option<UserSnapshot>> {
        let url = format!("{}/sessions/{}", self.base_url, session_token);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PortError::Unauthorized);
        }

        let payload: SessionPayload = response
            .error_for_status()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .json()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        Ok(payload.user)
    }
}
