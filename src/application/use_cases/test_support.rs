//! In-memory port implementations shared by the use case unit tests.

use crate::ports::outbound::{
    Credentials, PageRequest, ProductLookup, ProgressReporter, ProjectListing, RejectedProject,
    SourceAuthenticator, SourceCatalog, TargetDirectory,
};
use crate::reconciliation::domain::{
    Engagement, EngagementId, NewEngagement, Project, ScanArtifact, Test, TestId,
};
use crate::shared::error::SyncError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

pub fn project(name: &str, version: &str) -> Project {
    Project::new(
        format!("uuid-{}", name),
        name.to_string(),
        Some(version.to_string()),
        Some(1_710_498_600_000),
    )
    .unwrap()
}

#[derive(Clone, Default)]
pub struct FakeSource {
    pub projects: Vec<Project>,
    /// Returned alongside the first page
    pub rejected: Vec<RejectedProject>,
    pub page_size_seen: Arc<Mutex<Vec<u32>>>,
    pub failing_downloads: HashSet<String>,
    pub downloads: Arc<Mutex<Vec<String>>>,
    pub fail_listing: bool,
}

impl FakeSource {
    pub fn with_projects(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Self::default()
        }
    }
}

#[async_trait]
impl SourceCatalog for FakeSource {
    async fn fetch_project_page(&self, page: &PageRequest) -> Result<ProjectListing> {
        self.page_size_seen.lock().unwrap().push(page.page_size);
        if self.fail_listing {
            return Err(SyncError::Fetch {
                resource: format!("projects page {}", page.page_number),
                status: 503,
                body: "unavailable".to_string(),
            }
            .into());
        }
        let start = ((page.page_number - 1) * page.page_size) as usize;
        let projects = self
            .projects
            .iter()
            .skip(start)
            .take(page.page_size as usize)
            .cloned()
            .collect();
        let rejected = if page.page_number == 1 {
            self.rejected.clone()
        } else {
            Vec::new()
        };
        Ok(ProjectListing { projects, rejected })
    }

    async fn download_findings(&self, project: &Project) -> Result<ScanArtifact> {
        self.downloads
            .lock()
            .unwrap()
            .push(project.name().to_string());
        if self.failing_downloads.contains(project.name()) {
            return Err(SyncError::Download {
                project_id: project.id().to_string(),
                status: 500,
                body: "export failed".to_string(),
            }
            .into());
        }
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        Ok(ScanArtifact::for_project(project, b"{\"findings\":[]}".to_vec(), today))
    }
}

pub struct FakeAuthenticator {
    pub source: FakeSource,
    pub reject: bool,
}

#[async_trait]
impl SourceAuthenticator for FakeAuthenticator {
    type Catalog = FakeSource;

    async fn authenticate(&self, _credentials: &Credentials) -> Result<FakeSource> {
        if self.reject {
            return Err(SyncError::Auth {
                url: "http://dtrack.test/api/v1/user/login".to_string(),
                status: 401,
                body: "INVALID_CREDENTIALS".to_string(),
            }
            .into());
        }
        Ok(self.source.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCall {
    Create(String, u64),
    Import(EngagementId, String),
    Reimport(EngagementId, TestId, String),
}

#[derive(Clone, Default)]
pub struct FakeTarget {
    pub engagements: Arc<Mutex<Vec<Engagement>>>,
    pub tests: Arc<Mutex<HashMap<EngagementId, Vec<Test>>>>,
    pub calls: Arc<Mutex<Vec<TargetCall>>>,
    pub failing_creates: HashSet<String>,
    pub failing_imports: HashSet<EngagementId>,
    pub failing_test_listings: HashSet<EngagementId>,
    pub engagement_listings: Arc<Mutex<usize>>,
}

impl FakeTarget {
    pub fn with_engagements(engagements: Vec<Engagement>) -> Self {
        let target = Self::default();
        *target.engagements.lock().unwrap() = engagements;
        target
    }

    pub fn add_test(&self, engagement_id: EngagementId, test: Test) {
        self.tests
            .lock()
            .unwrap()
            .entry(engagement_id)
            .or_default()
            .push(test);
    }

    pub fn calls(&self) -> Vec<TargetCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                TargetCall::Create(name, _) => Some(name),
                _ => None,
            })
            .collect();
        names.sort();
        names
    }
}

#[async_trait]
impl TargetDirectory for FakeTarget {
    async fn list_engagements(&self) -> Result<Vec<Engagement>> {
        *self.engagement_listings.lock().unwrap() += 1;
        Ok(self.engagements.lock().unwrap().clone())
    }

    async fn create_engagement(&self, engagement: &NewEngagement) -> Result<()> {
        self.calls.lock().unwrap().push(TargetCall::Create(
            engagement.name.clone(),
            engagement.product_id,
        ));
        if self.failing_creates.contains(&engagement.name) {
            return Err(SyncError::Create {
                name: engagement.name.clone(),
                status: 400,
                body: "invalid product".to_string(),
            }
            .into());
        }
        let mut engagements = self.engagements.lock().unwrap();
        let id = 1000 + engagements.len() as u64;
        engagements.push(Engagement::new(id, engagement.name.clone()));
        Ok(())
    }

    async fn list_tests(&self, engagement_id: EngagementId) -> Result<Vec<Test>> {
        if self.failing_test_listings.contains(&engagement_id) {
            return Err(SyncError::Fetch {
                resource: format!("tests of engagement {}", engagement_id),
                status: 502,
                body: String::new(),
            }
            .into());
        }
        Ok(self
            .tests
            .lock()
            .unwrap()
            .get(&engagement_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn import_scan(&self, engagement_id: EngagementId, artifact: &ScanArtifact) -> Result<()> {
        self.calls.lock().unwrap().push(TargetCall::Import(
            engagement_id,
            artifact.version_label().to_string(),
        ));
        if self.failing_imports.contains(&engagement_id) {
            return Err(SyncError::Upload {
                engagement_id,
                status: 500,
                body: "import failed".to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn reimport_scan(
        &self,
        engagement_id: EngagementId,
        test_id: TestId,
        artifact: &ScanArtifact,
    ) -> Result<()> {
        self.calls.lock().unwrap().push(TargetCall::Reimport(
            engagement_id,
            test_id,
            artifact.version_label().to_string(),
        ));
        Ok(())
    }
}

pub struct FixedProducts(pub u64);

impl ProductLookup for FixedProducts {
    fn product_id_for(&self, _project_name: &str) -> u64 {
        self.0
    }
}

#[derive(Clone, Default)]
pub struct RecordingReporter {
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_progress(&self, _current: usize, _total: usize, _message: Option<&str>) {}

    fn report_error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("Error: {}", message));
    }

    fn report_completion(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("Completed: {}", message));
    }
}
