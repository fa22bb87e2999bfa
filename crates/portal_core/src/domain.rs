//! crates/portal_core/src/domain.rs
//!
//! Defines the pure, core data structures for the portal's navigation and
//! eligibility logic. These structs are independent of any transport or
//! analytics backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Semantic category a route belongs to. Every path classifies into exactly
/// one of these; anything unrecognized is `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleTag {
    Benefits,
    Commerces,
    Events,
    Raffles,
    Courses,
    News,
    General,
}

impl ModuleTag {
    /// The label sent to the analytics sink for this module.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleTag::Benefits => "beneficios",
            ModuleTag::Commerces => "comercios",
            ModuleTag::Events => "eventos",
            ModuleTag::Raffles => "sorteos",
            ModuleTag::Courses => "cursos",
            ModuleTag::News => "noticias",
            ModuleTag::General => "general",
        }
    }
}

/// The viewer classification attached to every navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Guest,
    Member,
    Admin,
}

impl Default for UserType {
    fn default() -> Self {
        UserType::Guest
    }
}

/// Metadata for the content a detail page is showing. All fields are
/// optional; the title generator falls back through them in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub title: Option<String>,
    pub name: Option<String>,
    pub commerce: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl ContentMetadata {
    /// The display name for this content: `title`, else `name`, else none.
    pub fn display_name(&self) -> Option<&str> {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Everything known about a single committed navigation. Created fresh on
/// every route change and consumed by the tracker and title generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSnapshot {
    pub pathname: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default)]
    pub metadata: Option<ContentMetadata>,
    #[serde(default)]
    pub user_type: UserType,
}

impl RouteSnapshot {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Default::default()
        }
    }

    /// A query parameter by name, only if it is non-blank.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// The serialized query string (no leading `?`), deterministic because
    /// the map is ordered.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// The key the tracker uses to tell navigations apart. Query-only
    /// changes produce a different key for the same pathname.
    pub fn tracking_key(&self) -> String {
        format!("{}?{}", self.pathname, self.query_string())
    }

    /// The last path segment, used to build synthetic content identifiers.
    pub fn last_segment(&self) -> &str {
        self.pathname.rsplit('/').next().unwrap_or_default()
    }
}

/// A student registered under a membership. `ci` is the national
/// identification number and may be empty while enrollment is incomplete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub full_name: String,
    #[serde(default)]
    pub ci: String,
}

impl Student {
    pub fn has_complete_ci(&self) -> bool {
        !self.ci.trim().is_empty()
    }
}

/// Membership data attached to a user's session snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub status: String,
    #[serde(default)]
    pub students: Vec<Student>,
}

/// Closed set of role labels the portal understands. Unknown strings
/// deserialize to `Unknown` instead of failing, so a malformed session
/// snapshot degrades to a non-privileged user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoleName {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "Administrador")]
    Administrador,
    #[serde(rename = "member")]
    Member,
    #[serde(other)]
    Unknown,
}

impl RoleName {
    /// Both accepted admin spellings count as administrative.
    pub fn is_admin(&self) -> bool {
        matches!(self, RoleName::Admin | RoleName::Administrador)
    }
}

/// The already-resolved user snapshot supplied by the session layer. The
/// core only reads it, never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: Uuid,
    #[serde(default)]
    pub member: Option<Membership>,
    #[serde(default)]
    pub roles: Vec<RoleName>,
}

impl UserSnapshot {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(RoleName::is_admin)
    }
}

/// Generated page identity: the visible document title plus the SEO
/// description and keywords for the same route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
    pub keywords: String,
}

/// The admission verdict for a protected route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum EligibilityVerdict {
    /// Render the route.
    Allow,
    /// Session resolution still pending; the caller must suspend rendering.
    Loading,
    /// Send the user back home, optionally showing a notice about
    /// incomplete enrollment data.
    RedirectHome { notice: bool },
}
