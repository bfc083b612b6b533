use super::http::{failure_parts, normalize_base_url};
use crate::ports::outbound::{
    BearerToken, Credentials, PageRequest, ProjectListing, RejectedProject, SourceAuthenticator,
    SourceCatalog,
};
use crate::reconciliation::domain::{Project, ScanArtifact};
use crate::shared::error::SyncError;
use crate::shared::security::validate_path_segment;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DtProject {
    #[serde(alias = "id")]
    uuid: String,
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    last_bom_import: Option<i64>,
}

/// DependencyTrackClient adapter for the Dependency-Track REST API (v1)
///
/// Implements the SourceAuthenticator port. A successful login yields a
/// [`DependencyTrackCatalog`] that carries the bearer token for every later call.
pub struct DependencyTrackClient {
    client: reqwest::Client,
    base_url: String,
}

impl DependencyTrackClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
        }
    }

    fn login_url(&self) -> String {
        format!("{}/api/v1/user/login", self.base_url)
    }

    /// Form-encoded login body; the login endpoint does not accept JSON
    fn login_body(credentials: &Credentials) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("username", &credentials.username)
            .append_pair("password", &credentials.password)
            .finish()
    }
}

#[async_trait]
impl SourceAuthenticator for DependencyTrackClient {
    type Catalog = DependencyTrackCatalog;

    async fn authenticate(&self, credentials: &Credentials) -> Result<DependencyTrackCatalog> {
        let url = self.login_url();
        debug!(url = %url, username = %credentials.username, "logging in");

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Self::login_body(credentials))
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(SyncError::Auth { url, status, body }.into());
        }

        // The response body is the raw token, not JSON
        let status = response.status().as_u16();
        let token = BearerToken::new(&response.text().await?);
        if token.as_str().is_empty() {
            return Err(SyncError::Auth {
                url,
                status,
                body: "<empty token>".to_string(),
            }
            .into());
        }

        Ok(DependencyTrackCatalog {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token,
        })
    }
}

/// Authenticated read access to Dependency-Track
pub struct DependencyTrackCatalog {
    client: reqwest::Client,
    base_url: String,
    token: BearerToken,
}

impl DependencyTrackCatalog {
    fn projects_url(&self, page: &PageRequest) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/v1/project", self.base_url))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("pageSize", &page.page_size.to_string())
                .append_pair("pageNumber", &page.page_number.to_string());
            if let Some(sort) = &page.sort {
                query
                    .append_pair("sortName", &sort.field)
                    .append_pair("sortOrder", sort.order.as_str());
            }
        }
        Ok(url)
    }

    fn export_url(&self, project_id: &str) -> Result<String> {
        // Security: the id comes from the server but still ends up in a path
        validate_path_segment(project_id, "Project id")?;
        Ok(format!(
            "{}/api/v1/finding/project/{}/export",
            self.base_url,
            urlencoding::encode(project_id)
        ))
    }
}

/// Converts one page of the project listing into domain projects.
///
/// Entries that cannot form a valid project (blank name or id) are logged
/// and returned as rejected so the run report can account for them.
fn parse_project_page(body: &[u8]) -> Result<ProjectListing> {
    let wire: Vec<DtProject> = serde_json::from_slice(body)?;
    let mut listing = ProjectListing::default();
    for p in wire {
        let rejected = RejectedProject {
            id: p.uuid.clone(),
            name: p.name.clone(),
            version: p.version.clone(),
            reason: String::new(),
        };
        match Project::new(p.uuid, p.name, p.version, p.last_bom_import) {
            Ok(project) => listing.projects.push(project),
            Err(e) => {
                warn!(uuid = %rejected.id, error = %e, "rejecting malformed project");
                listing.rejected.push(RejectedProject {
                    reason: e.to_string(),
                    ..rejected
                });
            }
        }
    }
    Ok(listing)
}

#[async_trait]
impl SourceCatalog for DependencyTrackCatalog {
    async fn fetch_project_page(&self, page: &PageRequest) -> Result<ProjectListing> {
        let url = self.projects_url(page)?;
        debug!(page = page.page_number, size = page.page_size, "fetching project page");

        let response = self
            .client
            .get(url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(SyncError::Fetch {
                resource: format!("project page {}", page.page_number),
                status,
                body,
            }
            .into());
        }

        let body = response.bytes().await?;
        parse_project_page(&body)
    }

    async fn download_findings(&self, project: &Project) -> Result<ScanArtifact> {
        let url = self.export_url(project.id())?;

        let response = self
            .client
            .get(&url)
            .bearer_auth(self.token.as_str())
            .send()
            .await?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(SyncError::Download {
                project_id: project.id().to_string(),
                status,
                body,
            }
            .into());
        }

        let payload = response.bytes().await?.to_vec();
        debug!(project = project.name(), bytes = payload.len(), "findings downloaded");
        Ok(ScanArtifact::for_project(
            project,
            payload,
            Utc::now().date_naive(),
        ))
    }
}
