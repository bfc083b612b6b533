/// Data Transfer Objects for the application layer
mod run_report;
mod sync_request;

pub use run_report::{EngagementSyncSummary, OutcomeStatus, ProjectOutcome, RunReport};
pub use sync_request::{SyncRequest, DEFAULT_CONCURRENCY};
