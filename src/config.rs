//! Configuration for dtrack-dojo-sync.
//!
//! Settings are layered from lowest to highest precedence: built-in defaults,
//! an optional `dtrack-dojo-sync.config.yml` file, environment variables and
//! finally command-line overrides. Secrets are only read from the environment.

use anyhow::Context;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;
use url::Url;

use crate::adapters::outbound::lookup::{ProductTable, DEFAULT_PRODUCT_ID};
use crate::adapters::outbound::network::{ImportOptions, DEFAULT_ENGAGEMENT_PAGE_LIMIT};
use crate::application::dto::DEFAULT_CONCURRENCY;
use crate::ports::outbound::DEFAULT_PAGE_SIZE;
use crate::reconciliation::domain::{EngagementTemplate, ProductId};
use crate::shared::error::SyncError;
use crate::shared::security::{redact, validate_config_file};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "dtrack-dojo-sync.config.yml";

pub const ENV_SOURCE_URL: &str = "DT_URL";
pub const ENV_SOURCE_USERNAME: &str = "DT_USERNAME";
pub const ENV_SOURCE_PASSWORD: &str = "DT_PASSWORD";
pub const ENV_TARGET_URL: &str = "DD_URL";
pub const ENV_TARGET_TOKEN: &str = "DD_TOKEN";

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub source_url: Option<String>,
    pub source_username: Option<String>,
    pub target_url: Option<String>,
    pub page_size: Option<u32>,
    pub engagement_page_limit: Option<u32>,
    pub concurrency: Option<usize>,
    pub request_timeout_secs: Option<u64>,
    pub engagement_defaults: Option<EngagementDefaults>,
    pub import: Option<ImportSection>,
    pub products: Option<HashMap<String, ProductId>>,
    pub default_product_id: Option<ProductId>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// Planned dates written on every engagement the run creates.
#[derive(Debug, Deserialize, Default)]
pub struct EngagementDefaults {
    pub target_start: Option<NaiveDate>,
    pub target_end: Option<NaiveDate>,
}

/// Options sent with every import and reimport.
#[derive(Debug, Deserialize, Default)]
pub struct ImportSection {
    pub tags: Option<Vec<String>>,
    pub close_old_findings: Option<bool>,
}

/// Values given on the command line; they win over every other source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub page_size: Option<u32>,
    pub concurrency: Option<usize>,
}

/// Fully resolved and validated settings for one run.
#[derive(Clone)]
pub struct SyncConfig {
    pub source_url: String,
    pub source_username: String,
    pub source_password: String,
    pub target_url: String,
    pub target_token: String,
    pub page_size: u32,
    pub engagement_page_limit: u32,
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    pub engagement_template: EngagementTemplate,
    pub import: ImportOptions,
    pub products: ProductTable,
}

impl std::fmt::Debug for SyncConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncConfig")
            .field("source_url", &self.source_url)
            .field("source_username", &self.source_username)
            .field("source_password", &redact(&self.source_password))
            .field("target_url", &self.target_url)
            .field("target_token", &redact(&self.target_token))
            .field("page_size", &self.page_size)
            .field("engagement_page_limit", &self.engagement_page_limit)
            .field("concurrency", &self.concurrency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("engagement_template", &self.engagement_template)
            .field("import", &self.import)
            .field("products", &self.products)
            .finish()
    }
}

impl SyncConfig {
    /// Resolves the run configuration from its layered sources.
    ///
    /// `env` looks up one environment variable; `main` passes a closure over
    /// `std::env::var` and tests pass a map.
    ///
    /// # Errors
    /// Returns `SyncError::Config` when a required value is missing or invalid
    pub fn resolve<F>(file: ConfigFile, env: F, overrides: &ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env_value = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let source_url = env_value(ENV_SOURCE_URL).or(file.source_url);
        let source_username = env_value(ENV_SOURCE_USERNAME).or(file.source_username);
        let target_url = env_value(ENV_TARGET_URL).or(file.target_url);

        let page_size = overrides
            .page_size
            .or(file.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        let concurrency = overrides
            .concurrency
            .or(file.concurrency)
            .unwrap_or(DEFAULT_CONCURRENCY);
        let engagement_page_limit = file
            .engagement_page_limit
            .unwrap_or(DEFAULT_ENGAGEMENT_PAGE_LIMIT);
        let request_timeout_secs = file
            .request_timeout_secs
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        ensure_positive("page_size", page_size as u64)?;
        ensure_positive("concurrency", concurrency as u64)?;
        ensure_positive("engagement_page_limit", engagement_page_limit as u64)?;
        ensure_positive("request_timeout_secs", request_timeout_secs)?;

        let config = Self {
            source_url: validate_url(ENV_SOURCE_URL, source_url)?,
            source_username: required(ENV_SOURCE_USERNAME, source_username)?,
            source_password: required(ENV_SOURCE_PASSWORD, env(ENV_SOURCE_PASSWORD))?,
            target_url: validate_url(ENV_TARGET_URL, target_url)?,
            target_token: required(ENV_TARGET_TOKEN, env(ENV_TARGET_TOKEN))?,
            page_size,
            engagement_page_limit,
            concurrency,
            request_timeout_secs,
            engagement_template: engagement_template(file.engagement_defaults)?,
            import: import_options(file.import)?,
            products: ProductTable::new(
                file.products.unwrap_or_default(),
                file.default_product_id.unwrap_or(DEFAULT_PRODUCT_ID),
            ),
        };
        Ok(config)
    }
}

fn config_error(message: impl Into<String>, hint: impl Into<String>) -> anyhow::Error {
    SyncError::Config {
        message: message.into(),
        hint: hint.into(),
    }
    .into()
}

fn required(name: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(config_error(
            format!("{} is not set", name),
            format!("Export {} or add it to a .env file", name),
        )),
    }
}

/// Checks that `value` is an absolute http(s) URL and strips trailing slashes.
fn validate_url(name: &str, value: Option<String>) -> Result<String> {
    let raw = required(name, value)?;
    let trimmed = raw.trim().trim_end_matches('/').to_string();
    let parsed = Url::parse(&trimmed).map_err(|e| {
        config_error(
            format!("{} is not a valid URL ({}): {}", name, e, trimmed),
            "Use an absolute URL such as https://host:port",
        )
    })?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(config_error(
            format!("{} must be an http or https URL: {}", name, trimmed),
            "Use an absolute URL such as https://host:port",
        ));
    }
    Ok(trimmed)
}

fn ensure_positive(name: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(config_error(
            format!("{} must be at least 1", name),
            format!("Remove {} to use the default", name),
        ));
    }
    Ok(())
}

fn engagement_template(defaults: Option<EngagementDefaults>) -> Result<EngagementTemplate> {
    let fallback = EngagementTemplate::default();
    let defaults = defaults.unwrap_or_default();
    let start = defaults.target_start.unwrap_or(fallback.target_start);
    let end = defaults.target_end.unwrap_or(fallback.target_end);
    if start > end {
        return Err(config_error(
            format!(
                "engagement_defaults.target_start ({}) is after target_end ({})",
                start, end
            ),
            "Swap the two dates",
        ));
    }
    Ok(EngagementTemplate::new(start, end))
}

fn import_options(section: Option<ImportSection>) -> Result<ImportOptions> {
    let fallback = ImportOptions::default();
    let section = section.unwrap_or_default();
    let tags = section.tags.unwrap_or(fallback.tags);
    if tags.iter().any(|t| t.trim().is_empty()) {
        return Err(config_error(
            "import.tags must not contain empty tags",
            "Remove the empty entry from import.tags",
        ));
    }
    Ok(ImportOptions {
        tags,
        close_old_findings: section
            .close_old_findings
            .unwrap_or(fallback.close_old_findings),
    })
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    validate_config_file(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is a regular file.",
            path.display()
        )
    })?;

    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    // An empty file parses as YAML null
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    warn_unknown_fields(&config);
    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if std::fs::symlink_metadata(&config_path).is_err() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "unknown config field will be ignored");
    }
}
