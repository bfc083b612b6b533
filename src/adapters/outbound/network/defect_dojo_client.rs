use super::http::{failure_parts, normalize_base_url};
use crate::ports::outbound::TargetDirectory;
use crate::reconciliation::domain::{
    Engagement, EngagementId, NewEngagement, ScanArtifact, Test, TestId,
};
use crate::reconciliation::policies::ReleaseTag;
use crate::shared::error::SyncError;
use crate::shared::security::redact;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use tracing::debug;
use url::Url;

/// Scan type DefectDojo uses to parse Dependency-Track FPF exports
pub const FPF_SCAN_TYPE: &str = "Dependency Track Finding Packaging Format (FPF) Export";

/// Default `limit` for the engagement listing; later pages are followed via `next`
pub const DEFAULT_ENGAGEMENT_PAGE_LIMIT: u32 = 500;

/// `limit` for the test listing of one engagement
const TEST_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
struct Paginated<T> {
    #[serde(default)]
    next: Option<String>,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

/// DefectDojo answers writes with 201, some versions with 200
fn is_accepted(status: StatusCode) -> bool {
    matches!(status.as_u16(), 200 | 201)
}

/// Builds the URL of the next page from a `next` link.
///
/// Only the query (`limit`/`offset`) is taken from the link; scheme, host and
/// path stay those of the first request, so the token is never sent elsewhere
/// and a proxy that rewrites the advertised host does not break paging.
fn next_page_url(first: &Url, next: &str) -> Result<Url> {
    let link = first.join(next)?;
    let mut url = first.clone();
    url.set_query(link.query());
    Ok(url)
}

/// Reads a paginated listing by following `next` links until there are none.
///
/// Any page failure aborts the listing; a link that repeats a page already
/// read is an error rather than an endless loop.
async fn collect_pages<T, F, Fut>(first: Url, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<Paginated<T>>>,
{
    let mut results = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(first.clone());

    while let Some(url) = current {
        if !seen.insert(url.to_string()) {
            anyhow::bail!("Paginated listing repeats page {}", url);
        }
        let page = fetch(url).await?;
        results.extend(page.results);
        current = page
            .next
            .as_deref()
            .map(|next| next_page_url(&first, next))
            .transpose()?;
    }

    debug!(pages = seen.len(), items = results.len(), "listing read");
    Ok(results)
}

#[derive(Debug, Deserialize)]
struct DdEngagement {
    id: u64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DdTest {
    id: u64,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Serialize)]
struct EngagementPayload<'a> {
    name: &'a str,
    product: u64,
    status: &'a str,
    engagement_type: &'a str,
    target_start: NaiveDate,
    target_end: NaiveDate,
    deduplication_on_engagement: bool,
}

impl<'a> From<&'a NewEngagement> for EngagementPayload<'a> {
    fn from(engagement: &'a NewEngagement) -> Self {
        Self {
            name: &engagement.name,
            product: engagement.product_id,
            status: engagement.status,
            engagement_type: engagement.engagement_type,
            target_start: engagement.target_start,
            target_end: engagement.target_end,
            deduplication_on_engagement: engagement.deduplication_on_engagement,
        }
    }
}

/// Options attached to every import and reimport upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    pub tags: Vec<String>,
    pub close_old_findings: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            tags: vec!["dependency-track".to_string()],
            close_old_findings: true,
        }
    }
}

/// DefectDojoClient adapter for the DefectDojo REST API (v2)
///
/// Implements the TargetDirectory port using token authentication.
pub struct DefectDojoClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    engagement_page_limit: u32,
    options: ImportOptions,
}

impl std::fmt::Debug for DefectDojoClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefectDojoClient")
            .field("base_url", &self.base_url)
            .field("token", &redact(&self.token))
            .field("engagement_page_limit", &self.engagement_page_limit)
            .field("options", &self.options)
            .finish()
    }
}

impl DefectDojoClient {
    pub fn new(client: reqwest::Client, base_url: &str, token: &str) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            token: token.trim().to_string(),
            engagement_page_limit: DEFAULT_ENGAGEMENT_PAGE_LIMIT,
            options: ImportOptions::default(),
        }
    }

    pub fn with_engagement_page_limit(mut self, limit: u32) -> Self {
        self.engagement_page_limit = limit.max(1);
        self
    }

    pub fn with_import_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(
            reqwest::header::AUTHORIZATION,
            format!("Token {}", self.token),
        )
    }

    fn engagements_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/v2/engagements/", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("limit", &self.engagement_page_limit.to_string());
        Ok(url)
    }

    fn tests_url(&self, engagement_id: EngagementId) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/v2/tests/", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("engagement", &engagement_id.to_string())
            .append_pair("limit", &TEST_PAGE_LIMIT.to_string());
        Ok(url)
    }

    /// Text fields shared by import and reimport uploads
    fn common_fields(&self, artifact: &ScanArtifact) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("scan_type", FPF_SCAN_TYPE.to_string()),
            ("scan_date", artifact.scan_date().to_string()),
            ("test_title", artifact.version_label().to_string()),
            (
                "close_old_findings",
                self.options.close_old_findings.to_string(),
            ),
        ];
        fields.extend(self.options.tags.iter().map(|tag| ("tags", tag.clone())));
        if let Some(tag) = ReleaseTag::parse(artifact.version_label()) {
            fields.push(("version", tag.build_number().to_string()));
            fields.push(("service", tag.service().to_string()));
        }
        fields
    }

    fn import_fields(
        &self,
        engagement_id: EngagementId,
        artifact: &ScanArtifact,
    ) -> Vec<(&'static str, String)> {
        let mut fields = vec![("engagement", engagement_id.to_string())];
        fields.extend(self.common_fields(artifact));
        fields
    }

    fn reimport_fields(
        &self,
        engagement_id: EngagementId,
        test_id: TestId,
        artifact: &ScanArtifact,
    ) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("engagement", engagement_id.to_string()),
            ("test", test_id.to_string()),
        ];
        fields.extend(self.common_fields(artifact));
        fields
    }

    /// Builds the multipart body: the payload as a JSON file part plus text fields
    fn upload_form(fields: Vec<(&'static str, String)>, artifact: &ScanArtifact) -> Result<Form> {
        let file = Part::bytes(artifact.payload().to_vec())
            .file_name(artifact.file_name())
            .mime_str("application/json")?;
        let form = fields
            .into_iter()
            .fold(Form::new().part("file", file), |form, (name, value)| {
                form.text(name, value)
            });
        Ok(form)
    }

    /// Reads every page of a listing starting at `url`
    async fn get_results<T: DeserializeOwned>(&self, url: Url, resource: &str) -> Result<Vec<T>> {
        collect_pages(url, |page_url| self.get_page(page_url, resource)).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        url: Url,
        resource: &str,
    ) -> Result<Paginated<T>> {
        let response = self.authorized(self.client.get(url)).send().await?;

        if !response.status().is_success() {
            let (status, body) = failure_parts(response).await;
            return Err(SyncError::Fetch {
                resource: resource.to_string(),
                status,
                body,
            }
            .into());
        }

        Ok(response.json().await?)
    }
}

/// Engagements without a name cannot be matched and are left out
fn engagements_from_wire(wire: Vec<DdEngagement>) -> Vec<Engagement> {
    wire.into_iter()
        .filter_map(|e| e.name.map(|name| Engagement::new(e.id, name)))
        .collect()
}

fn tests_from_wire(wire: Vec<DdTest>) -> Vec<Test> {
    wire.into_iter()
        .filter_map(|t| t.title.map(|title| Test::new(t.id, title)))
        .collect()
}

#[async_trait]
impl TargetDirectory for DefectDojoClient {
    async fn list_engagements(&self) -> Result<Vec<Engagement>> {
        let wire: Vec<DdEngagement> = self
            .get_results(self.engagements_url()?, "DefectDojo engagements")
            .await?;
        Ok(engagements_from_wire(wire))
    }

    async fn create_engagement(&self, engagement: &NewEngagement) -> Result<()> {
        let url = format!("{}/api/v2/engagements/", self.base_url);
        let payload = EngagementPayload::from(engagement);

        let response = self
            .authorized(self.client.post(&url))
            .json(&payload)
            .send()
            .await?;

        if !is_accepted(response.status()) {
            let (status, body) = failure_parts(response).await;
            return Err(SyncError::Create {
                name: engagement.name.clone(),
                status,
                body,
            }
            .into());
        }
        debug!(name = %engagement.name, product = engagement.product_id, "engagement created");
        Ok(())
    }

    async fn list_tests(&self, engagement_id: EngagementId) -> Result<Vec<Test>> {
        let wire: Vec<DdTest> = self
            .get_results(
                self.tests_url(engagement_id)?,
                &format!("tests of engagement {}", engagement_id),
            )
            .await?;
        Ok(tests_from_wire(wire))
    }

    async fn import_scan(&self, engagement_id: EngagementId, artifact: &ScanArtifact) -> Result<()> {
        let url = format!("{}/api/v2/import-scan/", self.base_url);
        let form = Self::upload_form(self.import_fields(engagement_id, artifact), artifact)?;

        let response = self
            .authorized(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        if !is_accepted(response.status()) {
            let (status, body) = failure_parts(response).await;
            return Err(SyncError::Upload {
                engagement_id,
                status,
                body,
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
        let url = format!("{}/api/v2/reimport-scan/", self.base_url);
        let form = Self::upload_form(
            self.reimport_fields(engagement_id, test_id, artifact),
            artifact,
        )?;

        let response = self
            .authorized(self.client.post(&url))
            .multipart(form)
            .send()
            .await?;

        if !is_accepted(response.status()) {
            let (status, body) = failure_parts(response).await;
            return Err(SyncError::Reimport {
                test_id,
                status,
                body,
            }
            .into());
        }
        Ok(())
    }
}
