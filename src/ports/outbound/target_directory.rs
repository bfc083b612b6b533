use crate::reconciliation::domain::{
    Engagement, EngagementId, NewEngagement, ScanArtifact, Test, TestId,
};
use crate::shared::Result;
use async_trait::async_trait;

/// TargetDirectory port - DefectDojo engagements, tests and scan imports
///
/// Implementations must be `Send + Sync`; a single instance is shared by
/// every concurrent project task.
#[async_trait]
pub trait TargetDirectory: Send + Sync {
    /// Lists every engagement. An absent or empty result list is zero engagements.
    ///
    /// # Errors
    /// Returns `SyncError::Fetch` on a non-success response
    async fn list_engagements(&self) -> Result<Vec<Engagement>>;

    /// Creates one engagement.
    ///
    /// # Errors
    /// Returns `SyncError::Create` on a non-success response
    async fn create_engagement(&self, engagement: &NewEngagement) -> Result<()>;

    /// Lists the tests of one engagement. An absent or empty result list is zero tests.
    ///
    /// # Errors
    /// Returns `SyncError::Fetch` on a non-success response
    async fn list_tests(&self, engagement_id: EngagementId) -> Result<Vec<Test>>;

    /// Uploads `artifact` as a new test titled with its version label.
    ///
    /// Not idempotent: a retry after an ambiguous failure may create a duplicate test.
    ///
    /// # Errors
    /// Returns `SyncError::Upload` on a non-success response
    async fn import_scan(&self, engagement_id: EngagementId, artifact: &ScanArtifact)
        -> Result<()>;

    /// Replaces the findings of an existing test with `artifact`.
    ///
    /// # Errors
    /// Returns `SyncError::Reimport` on a non-success response
    async fn reimport_scan(
        &self,
        engagement_id: EngagementId,
        test_id: TestId,
        artifact: &ScanArtifact,
    ) -> Result<()>;
}
