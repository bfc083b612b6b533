use crate::reconciliation::policies::ImportDecision;

/// How a project's handling ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// The decided action was executed (or needed no network call)
    Completed,
    /// Dry run: the action was decided but not executed
    Planned,
    /// Something failed; the message is the error chain
    Failed(String),
}

/// Result of handling one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOutcome {
    pub project_name: String,
    pub version: String,
    /// `None` when the run failed before a decision could be made
    pub decision: Option<ImportDecision>,
    pub status: OutcomeStatus,
}

impl ProjectOutcome {
    pub fn new(
        project_name: impl Into<String>,
        version: impl Into<String>,
        decision: Option<ImportDecision>,
        status: OutcomeStatus,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            version: version.into(),
            decision,
            status,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed(_))
    }

    /// Short label for the log line: the action, or ERROR when it failed
    pub fn label(&self) -> &'static str {
        match (&self.status, &self.decision) {
            (OutcomeStatus::Failed(_), _) => "ERROR",
            (_, Some(decision)) => decision.label(),
            (_, None) => "ERROR",
        }
    }
}

/// Outcome of the engagement creation phase
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngagementSyncSummary {
    /// Names for which creation was attempted (or planned in a dry run)
    pub attempted: Vec<String>,
    /// Names whose creation failed, with the error message
    pub failed: Vec<(String, String)>,
}

impl EngagementSyncSummary {
    pub fn attempted_count(&self) -> usize {
        self.attempted.len()
    }

    pub fn created_count(&self) -> usize {
        self.attempted.len() - self.failed.len()
    }
}

/// RunReport - everything a run did, for the final summary
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub dry_run: bool,
    pub source_projects: usize,
    pub engagements: EngagementSyncSummary,
    pub outcomes: Vec<ProjectOutcome>,
}

impl RunReport {
    fn count_where(&self, predicate: impl Fn(&ProjectOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|&o| predicate(o)).count()
    }

    pub fn imported(&self) -> usize {
        self.count_where(|o| {
            !o.is_failure()
                && matches!(
                    o.decision,
                    Some(ImportDecision::Import { .. } | ImportDecision::ImportIntoPendingEngagement)
                )
        })
    }

    pub fn reimported(&self) -> usize {
        self.count_where(|o| {
            !o.is_failure() && matches!(o.decision, Some(ImportDecision::Reimport { .. }))
        })
    }

    pub fn skipped(&self) -> usize {
        self.count_where(|o| {
            !o.is_failure()
                && matches!(
                    o.decision,
                    Some(ImportDecision::SkipReimportDisabled { .. })
                )
        })
    }

    pub fn unlinked(&self) -> usize {
        self.count_where(|o| matches!(o.decision, Some(ImportDecision::SkipUnlinked)))
    }

    pub fn failed(&self) -> usize {
        self.count_where(ProjectOutcome::is_failure)
    }

    /// One-line summary printed at the end of the run
    pub fn summary_line(&self) -> String {
        let prefix = if self.dry_run { "Dry run: " } else { "" };
        format!(
            "{}{} project(s): {} imported, {} reimported, {} skipped, {} unlinked, {} failed; {} engagement(s) created, {} failed",
            prefix,
            self.source_projects,
            self.imported(),
            self.reimported(),
            self.skipped(),
            self.unlinked(),
            self.failed(),
            self.engagements.created_count(),
            self.engagements.failed.len()
        )
    }
}
