//! services/portal/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::web::state::AppState;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use portal_core::domain::{EligibilityVerdict, RouteSnapshot, UserType};
use portal_core::{eligibility, titles};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::error;
use utoipa::{IntoParams, OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        meta_handler,
        eligibility_handler,
    ),
    components(
        schemas(PageMetaResponse, EligibilityResponse)
    ),
    tags(
        (name = "Portal Navigation API", description = "SEO metadata and access-eligibility endpoints for the membership portal.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// Query parameters describing the route to generate metadata for.
#[derive(Deserialize, IntoParams)]
pub struct MetaQuery {
    /// The pathname being rendered, e.g. `/curso/robotica`.
    pub path: String,
    pub search: Option<String>,
    pub categories: Option<String>,
    pub page: Option<String>,
    /// `guest`, `member`, or `admin`; defaults to `guest`.
    pub user_type: Option<String>,
    /// Content title shown on a detail page, when known.
    pub title: Option<String>,
    pub name: Option<String>,
    pub commerce: Option<String>,
}

/// The generated page identity for a route.
#[derive(Serialize, ToSchema)]
pub struct PageMetaResponse {
    title: String,
    description: String,
    keywords: String,
}

/// The admission verdict for a protected route.
#[derive(Serialize, ToSchema)]
pub struct EligibilityResponse {
    /// One of `allow`, `loading`, `redirect_home`.
    verdict: String,
    /// Whether the client should show the incomplete-enrollment notice.
    notice: bool,
}

impl From<EligibilityVerdict> for EligibilityResponse {
    fn from(verdict: EligibilityVerdict) -> Self {
        match verdict {
            EligibilityVerdict::Allow => Self {
                verdict: "allow".to_string(),
                notice: false,
            },
            EligibilityVerdict::Loading => Self {
                verdict: "loading".to_string(),
                notice: false,
            },
            EligibilityVerdict::RedirectHome { notice } => Self {
                verdict: "redirect_home".to_string(),
                notice,
            },
        }
    }
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate the SEO title, description, and keywords for a route.
///
/// Pure and deterministic: identical query parameters always return
/// identical metadata.
#[utoipa::path(
    get,
    path = "/meta",
    params(MetaQuery),
    responses(
        (status = 200, description = "Metadata generated", body = PageMetaResponse)
    )
)]
pub async fn meta_handler(Query(params): Query<MetaQuery>) -> impl IntoResponse {
    let mut query = BTreeMap::new();
    if let Some(search) = params.search {
        query.insert("search".to_string(), search);
    }
    if let Some(categories) = params.categories {
        query.insert("categories".to_string(), categories);
    }
    if let Some(page) = params.page {
        query.insert("page".to_string(), page);
    }

    let metadata = if params.title.is_some() || params.name.is_some() || params.commerce.is_some()
    {
        Some(portal_core::domain::ContentMetadata {
            title: params.title,
            name: params.name,
            commerce: params.commerce,
            ..Default::default()
        })
    } else {
        None
    };

    let user_type = match params.user_type.as_deref() {
        Some("member") => UserType::Member,
        Some("admin") => UserType::Admin,
        _ => UserType::Guest,
    };

    let snapshot = RouteSnapshot {
        pathname: params.path,
        query,
        metadata,
        user_type,
    };

    let meta = titles::generate(&snapshot);
    Json(PageMetaResponse {
        title: meta.title,
        description: meta.description,
        keywords: meta.keywords,
    })
}

/// Evaluate whether the current session may enter a protected route.
///
/// Resolves the `portal_session` cookie against the session provider and
/// runs the eligibility gate. Guests are always allowed.
#[utoipa::path(
    get,
    path = "/eligibility",
    responses(
        (status = 200, description = "Verdict computed", body = EligibilityResponse),
        (status = 500, description = "Session provider unavailable")
    )
)]
pub async fn eligibility_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let session_token = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies
                .split(';')
                .find_map(|c| c.trim().strip_prefix("portal_session="))
        });

    let (logged_in, user) = match (&app_state.sessions, session_token) {
        (Some(sessions), Some(token)) => {
            let user = sessions.resolve_session(token).await.map_err(|e| {
                error!("Failed to resolve session: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to resolve session".to_string(),
                )
            })?;
            (user.is_some(), user)
        }
        // No provider or no cookie: the visitor is a guest.
        _ => (false, None),
    };

    let verdict = eligibility::evaluate(false, logged_in, user.as_ref());
    Ok(Json(EligibilityResponse::from(verdict)))
}
