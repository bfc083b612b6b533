use crate::application::dto::{OutcomeStatus, ProjectOutcome, RunReport, SyncRequest};
use crate::application::use_cases::{ImportScansUseCase, SyncEngagementsUseCase};
use crate::ports::inbound::SyncPort;
use crate::ports::outbound::{
    Credentials, ProductLookup, ProgressReporter, ProjectListing, RejectedProject,
    SourceAuthenticator, SourceCatalog, TargetDirectory,
};
use crate::reconciliation::domain::{Engagement, EngagementTemplate, NameIndex, UNKNOWN_VERSION};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::{debug, info};

/// RunSyncUseCase - Core use case for one synchronization run
///
/// This use case orchestrates the whole pipeline using generic dependency
/// injection for all infrastructure dependencies:
///
/// 1. Log in to Dependency-Track (fatal on failure)
/// 2. Read the project catalog and the engagement list in parallel (fatal on failure)
/// 3. Create missing engagements (failures isolated per name)
/// 4. Re-read the engagement list and index it by name
/// 5. Decide and execute import/reimport/skip per project (failures isolated per project)
///
/// # Type Parameters
/// * `A` - SourceAuthenticator implementation
/// * `T` - TargetDirectory implementation
/// * `L` - ProductLookup implementation
/// * `PR` - ProgressReporter implementation
pub struct RunSyncUseCase<A, T, L, PR> {
    authenticator: A,
    credentials: Credentials,
    target: T,
    products: L,
    progress_reporter: PR,
    template: EngagementTemplate,
}

impl<A, T, L, PR> RunSyncUseCase<A, T, L, PR>
where
    A: SourceAuthenticator,
    T: TargetDirectory,
    L: ProductLookup,
    PR: ProgressReporter,
{
    /// Creates a new RunSyncUseCase with injected dependencies
    pub fn new(
        authenticator: A,
        credentials: Credentials,
        target: T,
        products: L,
        progress_reporter: PR,
        template: EngagementTemplate,
    ) -> Self {
        Self {
            authenticator,
            credentials,
            target,
            products,
            progress_reporter,
            template,
        }
    }

    /// Executes the synchronization run
    ///
    /// # Arguments
    /// * `request` - Per-run options
    ///
    /// # Returns
    /// RunReport with the engagement summary and one outcome per project
    pub async fn execute(&self, request: SyncRequest) -> Result<RunReport> {
        // Step 1: Authenticate
        self.progress_reporter
            .report("🔐 Logging in to Dependency-Track...");
        let source = self.authenticator.authenticate(&self.credentials).await?;

        // Step 2: Read both catalogs
        let (listing, engagements) = self.read_catalogs(&source, &request).await?;
        let ProjectListing { projects, rejected } = listing;

        // Step 3: Create missing engagements
        let source_names: HashSet<String> =
            projects.iter().map(|p| p.name().to_string()).collect();
        let engagement_summary = SyncEngagementsUseCase::new(
            &self.target,
            &self.products,
            &self.progress_reporter,
            &self.template,
        )
        .execute(
            &source_names,
            &engagements.names(),
            request.concurrency,
            request.dry_run,
        )
        .await;

        // Step 4: Refresh the engagement index so new engagements get their ids.
        // A dry run created nothing, so planned names stand in for them.
        let pending: HashSet<String> = if request.dry_run {
            engagement_summary.attempted.iter().cloned().collect()
        } else {
            HashSet::new()
        };
        let engagements = if request.dry_run {
            engagements
        } else {
            self.index_engagements().await?
        };

        // Step 5: Per-project processing
        self.progress_reporter.report(&format!(
            "🚚 Processing {} project(s), up to {} at a time...",
            projects.len(),
            request.concurrency
        ));
        let mut outcomes = ImportScansUseCase::new(&source, &self.target, &self.progress_reporter)
            .with_pending_engagements(&pending)
            .execute(&projects, &engagements, &request)
            .await;
        outcomes.extend(rejected.iter().map(|entry| self.reject_outcome(entry)));

        let report = RunReport {
            dry_run: request.dry_run,
            source_projects: projects.len() + rejected.len(),
            engagements: engagement_summary,
            outcomes,
        };
        info!(
            imported = report.imported(),
            reimported = report.reimported(),
            skipped = report.skipped(),
            unlinked = report.unlinked(),
            failed = report.failed(),
            "run finished"
        );
        self.progress_reporter
            .report_completion(&format!("🏁 {}", report.summary_line()));

        Ok(report)
    }

    /// Reads the project catalog and the engagement index concurrently
    ///
    /// Either failure aborts the run: diffing and deciding have no valid input without both.
    async fn read_catalogs<S: SourceCatalog>(
        &self,
        source: &S,
        request: &SyncRequest,
    ) -> Result<(ProjectListing, NameIndex<Engagement>)> {
        self.progress_reporter
            .report("📥 Reading Dependency-Track projects and DefectDojo engagements...");

        let (projects, engagements) = futures::try_join!(
            source.fetch_all_projects(request.page_size, request.sort.as_ref()),
            self.index_engagements(),
        )?;

        self.progress_reporter.report(&format!(
            "✅ Found {} project(s) and {} engagement(s)",
            projects.len(),
            engagements.len()
        ));
        Ok((projects, engagements))
    }

    /// Reports a listing entry that could not be processed as a failed project
    fn reject_outcome(&self, entry: &RejectedProject) -> ProjectOutcome {
        let version = entry.version.as_deref().unwrap_or(UNKNOWN_VERSION);
        self.progress_reporter.report_error(&format!(
            "❌ [ERROR] {} (version {}): {}",
            entry.display_name(),
            version,
            entry.reason
        ));
        ProjectOutcome::new(
            entry.display_name(),
            version,
            None,
            OutcomeStatus::Failed(entry.reason.clone()),
        )
    }

    /// Lists engagements and builds the name index, warning about duplicate names
    async fn index_engagements(&self) -> Result<NameIndex<Engagement>> {
        let index: NameIndex<Engagement> =
            self.target.list_engagements().await?.into_iter().collect();
        debug!(engagements = index.len(), "engagement index built");

        for (name, count) in index.duplicates() {
            self.progress_reporter.report_error(&format!(
                "⚠️  {} engagements are named '{}'; projects with this name will not be imported",
                count, name
            ));
        }
        Ok(index)
    }
}

#[async_trait]
impl<A, T, L, PR> SyncPort for RunSyncUseCase<A, T, L, PR>
where
    A: SourceAuthenticator,
    T: TargetDirectory,
    L: ProductLookup,
    PR: ProgressReporter,
{
    async fn run(&self, request: SyncRequest) -> Result<RunReport> {
        self.execute(request).await
    }
}
