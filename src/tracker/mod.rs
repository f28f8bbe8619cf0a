//! Application tracking

pub mod csv_sink;
pub mod record;

pub use csv_sink::CsvTracker;
pub use record::{ApplicationRecord, ApplicationStatus};

use crate::error::Result;

/// Durable store for application records, idempotent on `job_id`
pub trait TrackerSink: Send + Sync {
    fn name(&self) -> &str;

    /// Where records end up, for the run summary
    fn location(&self) -> String;

    /// Store `records`, returning how many job ids were new
    fn record(&self, records: &[ApplicationRecord]) -> Result<usize>;
}
