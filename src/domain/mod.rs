pub mod status;
pub mod summary;

pub use status::{DashboardResponse, HealthResponse, PlatformStatus, RowStatus};
pub use summary::SummaryCounts;
