pub mod analytics;
pub mod clock;
pub mod session;

pub use analytics::{LogAnalyticsAdapter, MeasurementAnalyticsAdapter};
pub use clock::SystemClock;
pub use session::HttpSessionAdapter;
