use crate::application::dto::{RunReport, SyncRequest};
use crate::shared::Result;
use async_trait::async_trait;

/// SyncPort - Inbound port for a full synchronization run
///
/// This port defines the interface that driving adapters (the CLI today)
/// use to trigger a run. It represents the application's public API.
#[async_trait]
pub trait SyncPort {
    /// Runs login, catalog reads, engagement sync and the per-project imports
    ///
    /// # Arguments
    /// * `request` - Per-run options (reimport flag, dry run, paging, concurrency)
    ///
    /// # Returns
    /// A report of every engagement created and every project handled
    ///
    /// # Errors
    /// Returns an error only for fatal failures:
    /// - The Dependency-Track login is rejected
    /// - The project listing or the engagement listing cannot be read
    ///
    /// Per-project and per-engagement failures are part of the report instead.
    async fn run(&self, request: SyncRequest) -> Result<RunReport>;
}
