pub mod classify;
pub mod domain;
pub mod eligibility;
pub mod ports;
pub mod titles;
pub mod tracker;

pub use classify::classify;
pub use domain::{
    ContentMetadata, EligibilityVerdict, Membership, ModuleTag, PageMeta, RoleName, RouteSnapshot,
    Student, UserSnapshot, UserType,
};
pub use ports::{AnalyticsSink, Clock, PortError, PortResult, SessionService};
pub use tracker::NavigationTracker;
