//! services/portal/src/adapters/analytics.rs
//!
//! Adapters implementing the `AnalyticsSink` port. The measurement adapter
//! posts event batches to a measurement-protocol endpoint over HTTP; the
//! logging adapter is the fallback when no analytics credentials are
//! configured, so local development still sees the event stream.

use async_trait::async_trait;
use portal_core::ports::{AnalyticsSink, PortError, PortResult};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

//=========================================================================================
// The Measurement-Protocol Adapter
//=========================================================================================

/// An adapter that implements the `AnalyticsSink` port against an HTTP
/// measurement endpoint. User identity and properties are held locally and
/// attached to every event batch (replace-not-append semantics).
pub struct MeasurementAnalyticsAdapter {
    client: reqwest::Client,
    endpoint: String,
    measurement_id: String,
    api_secret: String,
    /// Anonymous client identifier for this process.
    client_id: Uuid,
    initialized: AtomicBool,
    user_id: Mutex<Option<String>>,
    user_properties: Mutex<BTreeMap<String, String>>,
}

impl MeasurementAnalyticsAdapter {
    /// Creates a new `MeasurementAnalyticsAdapter`.
    pub fn new(endpoint: String, measurement_id: String, api_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            measurement_id,
            api_secret,
            client_id: Uuid::new_v4(),
            initialized: AtomicBool::new(false),
            user_id: Mutex::new(None),
            user_properties: Mutex::new(BTreeMap::new()),
        }
    }

    /// Posts a single named event with its parameters to the endpoint.
    async fn post_event(&self, name: &str, params: Value) -> PortResult<()> {
        let mut body = json!({
            "client_id": self.client_id.to_string(),
            "events": [{ "name": name, "params": params }],
        });

        let user_id = self.user_id.lock().unwrap().clone();
        if let Some(user_id) = user_id {
            body["user_id"] = Value::String(user_id);
        }
        let properties = self.user_properties.lock().unwrap().clone();
        if !properties.is_empty() {
            body["user_properties"] = properties
                .into_iter()
                .map(|(k, v)| (k, json!({ "value": v })))
                .collect::<serde_json::Map<String, Value>>()
                .into();
        }

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("measurement_id", self.measurement_id.as_str()),
                ("api_secret", self.api_secret.as_str()),
            ])
            .json(&body)
            .send()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl AnalyticsSink for MeasurementAnalyticsAdapter {
    async fn initialize(&self) -> PortResult<()> {
        if self.measurement_id.is_empty() || self.api_secret.is_empty() {
            return Err(PortError::Unexpected(
                "analytics credentials are not configured".to_string(),
            ));
        }
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn set_user_id(&self, user_id: &str) -> PortResult<()> {
        *self.user_id.lock().unwrap() = Some(user_id.to_string());
        Ok(())
    }

    async fn set_user_properties(&self, properties: BTreeMap<String, String>) -> PortResult<()> {
        *self.user_properties.lock().unwrap() = properties;
        Ok(())
    }

    async fn track_page_view(
        &self,
        path: &str,
        title: &str,
        location: &str,
        referrer: &str,
        user_type: &str,
    ) -> PortResult<()> {
        self.post_event(
            "page_view",
            json!({
                "page_path": path,
                "page_title": title,
                "page_location": location,
                "page_referrer": referrer,
                "user_type": user_type,
            }),
        )
        .await
    }

    async fn track_time_on_page(&self, elapsed_millis: i64, path: &str) -> PortResult<()> {
        self.post_event(
            "time_on_page",
            json!({ "engagement_time_msec": elapsed_millis, "page_path": path }),
        )
        .await
    }

    async fn track_search(&self, term: &str, module: &str) -> PortResult<()> {
        self.post_event("search", json!({ "search_term": term, "module": module }))
            .await
    }

    async fn track_filter_applied(
        &self,
        kind: &str,
        values: &[String],
        module: &str,
    ) -> PortResult<()> {
        self.post_event(
            "filter_applied",
            json!({ "filter_type": kind, "filter_values": values.join(","), "module": module }),
        )
        .await
    }

    async fn track_page_change(
        &self,
        page_number: u32,
        total_pages: Option<u32>,
        module: &str,
    ) -> PortResult<()> {
        self.post_event(
            "page_change",
            json!({ "page_number": page_number, "total_pages": total_pages, "module": module }),
        )
        .await
    }

    async fn track_view_item(
        &self,
        item_id: &str,
        item_name: &str,
        item_type: &str,
    ) -> PortResult<()> {
        self.post_event(
            "view_item",
            json!({
                "items": [{ "item_id": item_id, "item_name": item_name, "item_category": item_type }],
            }),
        )
        .await
    }

    async fn track_event(&self, name: &str) -> PortResult<()> {
        self.post_event(name, json!({})).await
    }

    async fn track_item_click(
        &self,
        item_id: &str,
        item_name: &str,
        item_type: &str,
        position: usize,
        list_name: &str,
    ) -> PortResult<()> {
        self.post_event(
            "select_item",
            json!({
                "item_list_name": list_name,
                "items": [{
                    "item_id": item_id,
                    "item_name": item_name,
                    "item_category": item_type,
                    "index": position,
                }],
            }),
        )
        .await
    }
}

//=========================================================================================
// The Logging Fallback Adapter
//=========================================================================================

/// A sink that writes every event to the tracing log instead of a remote
/// endpoint. Used when no analytics credentials are configured.
#[derive(Default)]
pub struct LogAnalyticsAdapter {
    initialized: AtomicBool,
}

impl LogAnalyticsAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalyticsSink for LogAnalyticsAdapter {
    async fn initialize(&self) -> PortResult<()> {
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    async fn set_user_id(&self, user_id: &str) -> PortResult<()> {
        debug!(user_id, "analytics user identity");
        Ok(())
    }

    async fn set_user_properties(&self, properties: BTreeMap<String, String>) -> PortResult<()> {
        debug!(?properties, "analytics user properties");
        Ok(())
    }

    async fn track_page_view(
        &self,
        path: &str,
        title: &str,
        _location: &str,
        referrer: &str,
        user_type: &str,
    ) -> PortResult<()> {
        debug!(path, title, referrer, user_type, "page_view");
        Ok(())
    }

    async fn track_time_on_page(&self, elapsed_millis: i64, path: &str) -> PortResult<()> {
        debug!(elapsed_millis, path, "time_on_page");
        Ok(())
    }

    async fn track_search(&self, term: &str, module: &str) -> PortResult<()> {
        debug!(term, module, "search");
        Ok(())
    }

    async fn track_filter_applied(
        &self,
        kind: &str,
        values: &[String],
        module: &str,
    ) -> PortResult<()> {
        debug!(kind, ?values, module, "filter_applied");
        Ok(())
    }

    async fn track_page_change(
        &self,
        page_number: u32,
        total_pages: Option<u32>,
        module: &str,
    ) -> PortResult<()> {
        debug!(page_number, ?total_pages, module, "page_change");
        Ok(())
    }

    async fn track_view_item(
        &self,
        item_id: &str,
        item_name: &str,
        item_type: &str,
    ) -> PortResult<()> {
        debug!(item_id, item_name, item_type, "view_item");
        Ok(())
    }

    async fn track_event(&self, name: &str) -> PortResult<()> {
        debug!(name, "conversion marker");
        Ok(())
    }

    async fn track_item_click(
        &self,
        item_id: &str,
        item_name: &str,
        _item_type: &str,
        position: usize,
        list_name: &str,
    ) -> PortResult<()> {
        debug!(item_id, item_name, position, list_name, "select_item");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn measurement_adapter_requires_credentials() {
        let adapter = MeasurementAnalyticsAdapter::new(
            "https://example.invalid/mp/collect".to_string(),
            String::new(),
            String::new(),
        );
        assert!(adapter.initialize().await.is_err());
        assert!(!adapter.is_initialized());
    }

    #[tokio::test]
    async fn log_adapter_initializes_idempotently() {
        let adapter = LogAnalyticsAdapter::new();
        assert!(!adapter.is_initialized());
        adapter.initialize().await.unwrap();
        adapter.initialize().await.unwrap();
        assert!(adapter.is_initialized());
    }

    #[tokio::test]
    async fn user_identity_is_replace_not_append() {
        let adapter = MeasurementAnalyticsAdapter::new(
            "https://example.invalid/mp/collect".to_string(),
            "G-TEST".to_string(),
            "secret".to_string(),
        );
        adapter.set_user_id("first").await.unwrap();
        adapter.set_user_id("second").await.unwrap();
        assert_eq!(
            adapter.user_id.lock().unwrap().as_deref(),
            Some("second")
        );

        let mut props = BTreeMap::new();
        props.insert("is_member".to_string(), "true".to_string());
        adapter.set_user_properties(props).await.unwrap();
        let mut replaced = BTreeMap::new();
        replaced.insert("is_member".to_string(), "false".to_string());
        adapter.set_user_properties(replaced.clone()).await.unwrap();
        assert_eq!(*adapter.user_properties.lock().unwrap(), replaced);
    }
}
