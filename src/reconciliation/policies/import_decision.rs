use crate::reconciliation::domain::{EngagementId, TestId};

/// Where a project stands in DefectDojo before anything is uploaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No engagement carries the project's name
    Unlinked,
    /// No engagement exists yet, but this run creates one (dry run only)
    EngagementPending,
    /// The engagement exists but has no test titled with the project's version
    NoTest { engagement_id: EngagementId },
    /// A test titled with the project's version already exists
    TestExists {
        engagement_id: EngagementId,
        test_id: TestId,
    },
}

/// Action chosen for one project in one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportDecision {
    /// Nothing to attach the scan to; reported as a warning
    SkipUnlinked,
    /// Create a new test in the engagement
    Import { engagement_id: EngagementId },
    /// Create a new test in an engagement this run would create first
    ImportIntoPendingEngagement,
    /// Refresh the findings of an existing test
    Reimport {
        engagement_id: EngagementId,
        test_id: TestId,
    },
    /// The test exists and reimport was not requested
    SkipReimportDisabled {
        engagement_id: EngagementId,
        test_id: TestId,
    },
}

impl ImportDecision {
    /// Whether executing this decision needs the findings export
    pub fn requires_transfer(&self) -> bool {
        matches!(
            self,
            ImportDecision::Import { .. }
                | ImportDecision::ImportIntoPendingEngagement
                | ImportDecision::Reimport { .. }
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            ImportDecision::SkipUnlinked => "WARNING",
            ImportDecision::Import { .. } | ImportDecision::ImportIntoPendingEngagement => "IMPORT",
            ImportDecision::Reimport { .. } => "REIMPORT",
            ImportDecision::SkipReimportDisabled { .. } => "SKIP",
        }
    }
}

/// ImportDecisionPolicy - decides import, reimport or skip for a project
///
/// The decision is a pure function of the link state and the reimport flag.
/// It runs exactly once per project per run.
pub struct ImportDecisionPolicy;

impl ImportDecisionPolicy {
    pub fn decide(state: LinkState, reimport_enabled: bool) -> ImportDecision {
        match state {
            LinkState::Unlinked => ImportDecision::SkipUnlinked,
            LinkState::EngagementPending => ImportDecision::ImportIntoPendingEngagement,
            LinkState::NoTest { engagement_id } => ImportDecision::Import { engagement_id },
            LinkState::TestExists {
                engagement_id,
                test_id,
            } if reimport_enabled => ImportDecision::Reimport {
                engagement_id,
                test_id,
            },
            LinkState::TestExists {
                engagement_id,
                test_id,
            } => ImportDecision::SkipReimportDisabled {
                engagement_id,
                test_id,
            },
        }
    }

    /// Builds the link state for a linked engagement from the matching test, if any.
    pub fn link_state(engagement_id: EngagementId, matching_test: Option<TestId>) -> LinkState {
        match matching_test {
            Some(test_id) => LinkState::TestExists {
                engagement_id,
                test_id,
            },
            None => LinkState::NoTest { engagement_id },
        }
    }
}
