use async_trait::async_trait;
use chrono::NaiveDate;
use dtrack_dojo_sync::ports::outbound::{PageRequest, ProjectListing, RejectedProject};
use dtrack_dojo_sync::prelude::*;
use dtrack_dojo_sync::shared::error::SyncError;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock SourceCatalog serving an in-memory project list page by page
#[derive(Clone, Default)]
pub struct MockCatalog {
    pub projects: Vec<Project>,
    pub rejected: Vec<RejectedProject>,
    pub failing_downloads: HashSet<String>,
    pub fail_listing: bool,
    pub pages_requested: Arc<Mutex<Vec<PageRequest>>>,
    pub downloads: Arc<Mutex<Vec<String>>>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, id: &str, name: &str, version: Option<&str>) -> Self {
        self.projects.push(
            Project::new(
                id.to_string(),
                name.to_string(),
                version.map(str::to_string),
                Some(1_710_498_600_000),
            )
            .unwrap(),
        );
        self
    }

    /// Adds a listing entry the source returns but that is not a valid project
    pub fn with_rejected(mut self, id: &str, name: &str, reason: &str) -> Self {
        self.rejected.push(RejectedProject {
            id: id.to_string(),
            name: name.to_string(),
            version: None,
            reason: reason.to_string(),
        });
        self
    }

    pub fn with_failing_download(mut self, name: &str) -> Self {
        self.failing_downloads.insert(name.to_string());
        self
    }

    pub fn with_listing_failure(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    pub fn downloaded(&self) -> Vec<String> {
        let mut names = self.downloads.lock().unwrap().clone();
        names.sort();
        names
    }
}

#[async_trait]
impl SourceCatalog for MockCatalog {
    async fn fetch_project_page(&self, page: &PageRequest) -> Result<ProjectListing> {
        self.pages_requested.lock().unwrap().push(page.clone());
        if self.fail_listing {
            return Err(SyncError::Fetch {
                resource: format!("project page {}", page.page_number),
                status: 500,
                body: "Internal Server Error".to_string(),
            }
            .into());
        }

        let skip = (page.page_number as usize - 1) * page.page_size as usize;
        let mut listing: ProjectListing = self
            .projects
            .iter()
            .skip(skip)
            .take(page.page_size as usize)
            .cloned()
            .collect::<Vec<_>>()
            .into();
        if page.page_number == 1 {
            listing.rejected = self.rejected.clone();
        }
        Ok(listing)
    }

    async fn download_findings(&self, project: &Project) -> Result<ScanArtifact> {
        if self.failing_downloads.contains(project.name()) {
            return Err(SyncError::Download {
                project_id: project.id().to_string(),
                status: 404,
                body: "Not Found".to_string(),
            }
            .into());
        }
        self.downloads
            .lock()
            .unwrap()
            .push(project.name().to_string());
        Ok(ScanArtifact::for_project(
            project,
            br#"{"version":"1.2","findings":[]}"#.to_vec(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        ))
    }
}

/// Mock SourceAuthenticator that hands out the configured catalog
#[derive(Clone, Default)]
pub struct MockAuthenticator {
    pub catalog: MockCatalog,
    pub reject: bool,
    pub logins: Arc<Mutex<Vec<String>>>,
}

impl MockAuthenticator {
    pub fn new(catalog: MockCatalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Default::default()
        }
    }
}

#[async_trait]
impl SourceAuthenticator for MockAuthenticator {
    type Catalog = MockCatalog;

    async fn authenticate(&self, credentials: &Credentials) -> Result<MockCatalog> {
        self.logins
            .lock()
            .unwrap()
            .push(credentials.username.clone());
        if self.reject {
            return Err(SyncError::Auth {
                url: "http://dtrack.test/api/v1/user/login".to_string(),
                status: 401,
                body: "Unauthorized".to_string(),
            }
            .into());
        }
        Ok(self.catalog.clone())
    }
}
