//! crates/portal_core/src/tracker.rs
//!
//! The stateful navigation-tracking controller. Invoked once per committed
//! navigation, it computes dwell time for the page being left, generates the
//! new page's identity, and emits the analytics event sequence in a fixed
//! order. The analytics sink is best-effort: every sink failure is logged
//! and swallowed so it can never block navigation or title assignment.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::warn;

use crate::classify::classify;
use crate::domain::{PageMeta, RouteSnapshot, UserSnapshot, UserType};
use crate::ports::{AnalyticsSink, Clock};
use crate::titles;

/// Routes whose entry marks a business-significant funnel step, with the
/// event name emitted for each. Matched by exact pathname; at most one
/// marker fires per navigation.
const CONVERSION_ROUTES: &[(&str, &str)] = &[
    ("/login", "login"),
    ("/registro", "sign_up"),
    ("/checkout", "begin_checkout"),
    ("/pago-membresia", "membership_payment_started"),
    ("/inscripcion-alumnos", "student_enrollment_started"),
    ("/pago-exitoso", "purchase_completed"),
];

/// Detail-page prefixes and the noun used in synthetic content identifiers.
const DETAIL_NOUNS: &[(&str, &str)] = &[
    ("/beneficio/", "beneficio"),
    ("/comercio/", "comercio"),
    ("/evento/", "evento"),
    ("/sorteo/", "sorteo"),
    ("/curso/", "curso"),
    ("/noticia/", "noticia"),
];

/// Mutable tracking state, owned by a single navigation observer and reset
/// only when that observer is recreated.
///
/// Invariant: `page_entered_at` is refreshed exactly once per distinct path
/// transition and is never rewound.
#[derive(Debug, Default)]
struct TrackerMemory {
    previous_path: String,
    page_entered_at: i64,
}

/// Tracks navigation transitions for one mounted observer (in this service,
/// one client connection). Not shared across connections; the host delivers
/// navigations serially.
pub struct NavigationTracker {
    sink: Arc<dyn AnalyticsSink>,
    clock: Arc<dyn Clock>,
    site_base: String,
    memory: TrackerMemory,
}

impl NavigationTracker {
    /// Creates a tracker with fresh memory. `site_base` is the public origin
    /// used to build full page-view URLs (e.g. `https://portal.apacg.org`).
    pub fn new(sink: Arc<dyn AnalyticsSink>, clock: Arc<dyn Clock>, site_base: String) -> Self {
        Self {
            sink,
            clock,
            site_base,
            memory: TrackerMemory::default(),
        }
    }

    /// Processes one committed navigation and returns the generated page
    /// identity for the document chrome. Must be called exactly once per
    /// navigation, including query-only changes.
    pub async fn on_navigate(
        &mut self,
        snapshot: &RouteSnapshot,
        user: Option<&UserSnapshot>,
    ) -> PageMeta {
        // 1. Lazily initialize the sink, at most once per process lifetime.
        if !self.sink.is_initialized() {
            if let Err(e) = self.sink.initialize().await {
                warn!("analytics initialization failed: {}", e);
            }
        }

        // 2. (Re)declare the session identity. Replace-not-append, so this
        // is safe on every navigation.
        if let Some(user) = user {
            if let Err(e) = self.sink.set_user_id(&user.id.to_string()).await {
                warn!("analytics set_user_id failed: {}", e);
            }
            if let Err(e) = self.sink.set_user_properties(user_properties(user)).await {
                warn!("analytics set_user_properties failed: {}", e);
            }
        }

        // 3. Report dwell time for the page being left.
        let current_key = snapshot.tracking_key();
        let now = self.clock.now_millis();
        let referrer = self.memory.previous_path.clone();
        if !referrer.is_empty() && referrer != current_key {
            let elapsed = now - self.memory.page_entered_at;
            if let Err(e) = self.sink.track_time_on_page(elapsed, &referrer).await {
                warn!("analytics track_time_on_page failed: {}", e);
            }
        }

        // 4. Generate the page identity for this route.
        let meta = titles::generate(snapshot);

        // 5. Page view.
        let location = format!("{}{}", self.site_base, current_key.trim_end_matches('?'));
        if let Err(e) = self
            .sink
            .track_page_view(
                &snapshot.pathname,
                &meta.title,
                &location,
                &referrer,
                user_type_label(snapshot.user_type),
            )
            .await
        {
            warn!("analytics track_page_view failed: {}", e);
        }

        // 6. Route-specific events, in fixed order.
        self.emit_route_events(snapshot).await;

        // 7. Refresh memory. `page_entered_at` moves only on a distinct
        // transition so a duplicate commit cannot rewind it.
        if self.memory.previous_path != current_key {
            self.memory.page_entered_at = now;
        }
        self.memory.previous_path = current_key;

        // 8. The caller pushes `meta.title` to the document chrome.
        meta
    }

    async fn emit_route_events(&self, snapshot: &RouteSnapshot) {
        let module = classify(&snapshot.pathname);

        // (a) Search.
        if let Some(term) = snapshot.query_param("search") {
            if let Err(e) = self.sink.track_search(term, module.as_str()).await {
                warn!("analytics track_search failed: {}", e);
            }
        }

        // (b) Category filter. Blanks are dropped; an empty result skips the
        // event entirely.
        if let Some(raw) = snapshot.query.get("categories") {
            let values: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            if !values.is_empty() {
                if let Err(e) = self
                    .sink
                    .track_filter_applied("categories", &values, module.as_str())
                    .await
                {
                    warn!("analytics track_filter_applied failed: {}", e);
                }
            }
        }

        // (c) Pagination, skipping the default first page.
        if let Some(page) = snapshot.query_param("page") {
            if page != "1" {
                if let Ok(number) = page.parse::<u32>() {
                    if let Err(e) = self
                        .sink
                        .track_page_change(number, None, module.as_str())
                        .await
                    {
                        warn!("analytics track_page_change failed: {}", e);
                    }
                }
            }
        }

        // (d) Content view on detail pages.
        if let Some(metadata) = snapshot.metadata.as_ref() {
            if let Some((_, noun)) = DETAIL_NOUNS
                .iter()
                .find(|(prefix, _)| snapshot.pathname.starts_with(prefix))
            {
                let item_id = format!("{}_{}", noun, snapshot.last_segment());
                let item_name = metadata.display_name().unwrap_or(noun);
                if let Err(e) = self.sink.track_view_item(&item_id, item_name, noun).await {
                    warn!("analytics track_view_item failed: {}", e);
                }
            }
        }

        // (e) Conversion marker, exact match, no fallback.
        if let Some((_, name)) = CONVERSION_ROUTES
            .iter()
            .find(|(path, _)| *path == snapshot.pathname)
        {
            if let Err(e) = self.sink.track_event(name).await {
                warn!("analytics track_event failed: {}", e);
            }
        }
    }
}

fn user_properties(user: &UserSnapshot) -> BTreeMap<String, String> {
    let mut properties = BTreeMap::new();
    properties.insert(
        "is_member".to_string(),
        user.member.is_some().to_string(),
    );
    properties.insert(
        "membership_status".to_string(),
        user.member
            .as_ref()
            .map(|m| m.status.clone())
            .unwrap_or_else(|| "none".to_string()),
    );
    properties.insert(
        "student_count".to_string(),
        user.member
            .as_ref()
            .map(|m| m.students.len())
            .unwrap_or(0)
            .to_string(),
    );
    properties
}

fn user_type_label(user_type: UserType) -> &'static str {
    match user_type {
        UserType::Guest => "guest",
        UserType::Member => "member",
        UserType::Admin => "admin",
    }
}
