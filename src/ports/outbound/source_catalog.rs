use crate::reconciliation::domain::{Project, ScanArtifact};
use crate::shared::security::redact;
use crate::shared::Result;
use async_trait::async_trait;

/// Default number of projects requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on pages read in one run; a source that never returns an
/// empty page would otherwise loop forever.
const MAX_PAGES: u32 = 100_000;

/// Username/password pair exchanged for a bearer token
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .finish()
    }
}

/// Opaque bearer credential returned by the login exchange
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw login response, trimming surrounding whitespace.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken({})", redact(&self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(format!(
                "Invalid sort order: {}. Please specify 'asc' or 'desc'",
                s
            )),
        }
    }
}

/// Sort parameters forwarded to the project listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSort {
    pub field: String,
    pub order: SortOrder,
}

/// One page of the project listing, numbered from 1
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort: Option<ProjectSort>,
}

/// A listing entry that could not become a [`Project`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedProject {
    pub id: String,
    pub name: String,
    pub version: Option<String>,
    pub reason: String,
}

impl RejectedProject {
    /// Name shown in the run report; falls back to the id for blank names
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Projects read from the source, plus the entries that were rejected
///
/// Rejected entries are carried along so the run report accounts for every
/// project the source returned.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectListing {
    pub projects: Vec<Project>,
    pub rejected: Vec<RejectedProject>,
}

impl ProjectListing {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.rejected.is_empty()
    }

    /// Number of entries the source returned, valid or not
    pub fn len(&self) -> usize {
        self.projects.len() + self.rejected.len()
    }

    pub fn append(&mut self, other: ProjectListing) {
        self.projects.extend(other.projects);
        self.rejected.extend(other.rejected);
    }
}

impl From<Vec<Project>> for ProjectListing {
    fn from(projects: Vec<Project>) -> Self {
        Self {
            projects,
            rejected: Vec::new(),
        }
    }
}

/// SourceAuthenticator port - logs into Dependency-Track
///
/// Authentication yields the catalog handle used for the rest of the run,
/// so an unauthenticated catalog cannot be constructed by the core.
#[async_trait]
pub trait SourceAuthenticator: Send + Sync {
    type Catalog: SourceCatalog;

    /// Exchanges credentials for a bearer token.
    ///
    /// # Errors
    /// Returns `SyncError::Auth` when the login response is not a success.
    /// There is no retry; the caller treats this as fatal.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Self::Catalog>;
}

/// SourceCatalog port - read side of Dependency-Track
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Fetches a single page of projects. An empty page marks the end.
    ///
    /// # Errors
    /// Returns `SyncError::Fetch` on a non-success response
    async fn fetch_project_page(&self, page: &PageRequest) -> Result<ProjectListing>;

    /// Downloads the findings export of `project`.
    ///
    /// # Errors
    /// Returns `SyncError::Download` on a non-success response
    async fn download_findings(&self, project: &Project) -> Result<ScanArtifact>;

    /// Reads every page until the first empty one and concatenates them.
    ///
    /// Any page failure aborts the read; partial results are discarded.
    async fn fetch_all_projects(
        &self,
        page_size: u32,
        sort: Option<&ProjectSort>,
    ) -> Result<ProjectListing> {
        if page_size == 0 {
            anyhow::bail!("Page size must be at least 1");
        }

        let mut listing = ProjectListing::default();
        for page_number in 1..=MAX_PAGES {
            let page = PageRequest {
                page_number,
                page_size,
                sort: sort.cloned(),
            };
            let batch = self.fetch_project_page(&page).await?;
            if batch.is_empty() {
                return Ok(listing);
            }
            listing.append(batch);
        }

        anyhow::bail!(
            "Project listing did not end after {} pages; aborting the read",
            MAX_PAGES
        )
    }
}
