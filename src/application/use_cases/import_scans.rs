use crate::application::dto::{OutcomeStatus, ProjectOutcome, SyncRequest};
use crate::ports::outbound::{ProgressReporter, SourceCatalog, TargetDirectory};
use crate::reconciliation::domain::{Engagement, NameIndex, Project, Test};
use crate::reconciliation::policies::{ImportDecision, ImportDecisionPolicy, LinkState};
use crate::shared::error::MatchKind;
use crate::shared::Result;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info_span, Instrument};

/// ImportScansUseCase - decides and executes the import for every project
///
/// One unit of work per project, run concurrently up to the request's limit.
/// Within a project the steps are strictly sequential:
/// list tests → decide → download → import/reimport → report.
/// A failing project is reported and recorded; it never affects its siblings.
///
/// # Type Parameters
/// * `S` - SourceCatalog implementation (already authenticated)
/// * `T` - TargetDirectory implementation
/// * `PR` - ProgressReporter implementation
pub struct ImportScansUseCase<'a, S, T, PR> {
    source: &'a S,
    target: &'a T,
    progress_reporter: &'a PR,
    pending_engagements: Option<&'a HashSet<String>>,
}

impl<'a, S, T, PR> ImportScansUseCase<'a, S, T, PR>
where
    S: SourceCatalog,
    T: TargetDirectory,
    PR: ProgressReporter,
{
    pub fn new(source: &'a S, target: &'a T, progress_reporter: &'a PR) -> Self {
        Self {
            source,
            target,
            progress_reporter,
            pending_engagements: None,
        }
    }

    /// Names whose engagement a dry run would create; those projects are
    /// planned as imports instead of being reported as unlinked.
    pub fn with_pending_engagements(mut self, names: &'a HashSet<String>) -> Self {
        self.pending_engagements = Some(names);
        self
    }

    /// Processes every project and returns one outcome per project
    ///
    /// Outcomes are returned in completion order, not input order.
    pub async fn execute(
        &self,
        projects: &[Project],
        engagements: &NameIndex<Engagement>,
        request: &SyncRequest,
    ) -> Vec<ProjectOutcome> {
        let total = projects.len();
        let finished = AtomicUsize::new(0);

        let tasks: Vec<_> = projects
            .iter()
            .map(|project| self.run_one(project, engagements, request, &finished, total))
            .collect();

        stream::iter(tasks)
            .buffer_unordered(request.concurrency.max(1))
            .collect()
            .await
    }

    async fn run_one(
        &self,
        project: &Project,
        engagements: &NameIndex<Engagement>,
        request: &SyncRequest,
        finished: &AtomicUsize,
        total: usize,
    ) -> ProjectOutcome {
        let span = info_span!("project", project = %project.name(), version = %project.version());
        let outcome = self
            .process_project(project, engagements, request)
            .instrument(span)
            .await;
        let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
        self.progress_reporter
            .report_progress(done, total, Some(project.name()));
        outcome
    }

    /// Runs the full pipeline for a single project
    pub async fn process_project(
        &self,
        project: &Project,
        engagements: &NameIndex<Engagement>,
        request: &SyncRequest,
    ) -> ProjectOutcome {
        let decision = match self
            .decide(project, engagements, request.reimport_enabled)
            .await
        {
            Ok(decision) => decision,
            Err(e) => {
                let outcome = ProjectOutcome::new(
                    project.name(),
                    project.version(),
                    None,
                    OutcomeStatus::Failed(format!("{:#}", e)),
                );
                self.report_outcome(&outcome);
                return outcome;
            }
        };
        debug!(?decision, "decision made");

        let status = if !decision.requires_transfer() {
            OutcomeStatus::Completed
        } else if request.dry_run {
            OutcomeStatus::Planned
        } else {
            match self.transfer(project, decision).await {
                Ok(()) => OutcomeStatus::Completed,
                Err(e) => OutcomeStatus::Failed(format!("{:#}", e)),
            }
        };

        let outcome =
            ProjectOutcome::new(project.name(), project.version(), Some(decision), status);
        self.report_outcome(&outcome);
        outcome
    }

    /// Resolves the project's engagement and matching test, then applies the policy
    ///
    /// # Errors
    /// Fails when the name or version matches more than one engagement/test,
    /// or when the test listing fails.
    async fn decide(
        &self,
        project: &Project,
        engagements: &NameIndex<Engagement>,
        reimport_enabled: bool,
    ) -> Result<ImportDecision> {
        let Some(engagement) = engagements.resolve(project.name(), MatchKind::Engagement)? else {
            let pending = self
                .pending_engagements
                .is_some_and(|names| names.contains(project.name()));
            let state = if pending {
                LinkState::EngagementPending
            } else {
                LinkState::Unlinked
            };
            return Ok(ImportDecisionPolicy::decide(state, reimport_enabled));
        };

        let tests: NameIndex<Test> = self
            .target
            .list_tests(engagement.id)
            .await?
            .into_iter()
            .collect();
        let matching_test = tests
            .resolve(project.version(), MatchKind::Test)?
            .map(|test| test.id);

        Ok(ImportDecisionPolicy::decide(
            ImportDecisionPolicy::link_state(engagement.id, matching_test),
            reimport_enabled,
        ))
    }

    /// Downloads the export and forwards it according to `decision`
    async fn transfer(&self, project: &Project, decision: ImportDecision) -> Result<()> {
        match decision {
            ImportDecision::Import { engagement_id } => {
                let artifact = self.source.download_findings(project).await?;
                self.target.import_scan(engagement_id, &artifact).await
            }
            ImportDecision::Reimport {
                engagement_id,
                test_id,
            } => {
                let artifact = self.source.download_findings(project).await?;
                self.target
                    .reimport_scan(engagement_id, test_id, &artifact)
                    .await
            }
            ImportDecision::ImportIntoPendingEngagement => {
                anyhow::bail!("engagement '{}' has not been created yet", project.name())
            }
            ImportDecision::SkipUnlinked | ImportDecision::SkipReimportDisabled { .. } => Ok(()),
        }
    }

    fn report_outcome(&self, outcome: &ProjectOutcome) {
        let head = format!(
            "[{}] {} (version {})",
            outcome.label(),
            outcome.project_name,
            outcome.version
        );

        match (&outcome.status, outcome.decision) {
            (OutcomeStatus::Failed(message), _) => {
                self.progress_reporter
                    .report_error(&format!("❌ {}: {}", head, message));
            }
            (_, Some(ImportDecision::SkipUnlinked)) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  {}: no engagement named '{}' in DefectDojo",
                    head, outcome.project_name
                ));
            }
            (_, Some(ImportDecision::SkipReimportDisabled { test_id, .. })) => {
                self.progress_reporter.report_error(&format!(
                    "⚠️  {}: test {} already exists and reimport is disabled",
                    head, test_id
                ));
            }
            (OutcomeStatus::Planned, Some(decision)) => {
                self.progress_reporter.report(&format!(
                    "📝 {}: {} (dry run)",
                    head,
                    describe(decision)
                ));
            }
            (_, Some(decision)) => {
                self.progress_reporter
                    .report(&format!("✅ {}: {}", head, describe(decision)));
            }
            (_, None) => {}
        }
    }
}

fn describe(decision: ImportDecision) -> String {
    match decision {
        ImportDecision::Import { engagement_id } => {
            format!("new test in engagement {}", engagement_id)
        }
        ImportDecision::Reimport {
            engagement_id,
            test_id,
        } => format!(
            "test {} in engagement {} refreshed",
            test_id, engagement_id
        ),
        ImportDecision::ImportIntoPendingEngagement => {
            "new test in the engagement created for it".to_string()
        }
        ImportDecision::SkipUnlinked => "no engagement".to_string(),
        ImportDecision::SkipReimportDisabled { test_id, .. } => {
            format!("test {} left unchanged", test_id)
        }
    }
}
