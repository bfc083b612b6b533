use crate::reconciliation::domain::ScanDate;
use crate::shared::Result;
use chrono::NaiveDate;

/// Version label used when Dependency-Track reports no version
pub const UNKNOWN_VERSION: &str = "unknown";

/// NewType wrapper for a project name.
///
/// The name is the natural key joining a project to its engagement, so it is
/// kept byte-for-byte as the source reports it (no trimming, no case folding).
/// Only a blank name is rejected; any other name the source accepts must
/// reach the target unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn new(name: String) -> Result<Self> {
        if name.trim().is_empty() {
            anyhow::bail!("Project name cannot be empty");
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Project snapshot read from Dependency-Track
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    id: String,
    name: ProjectName,
    version: String,
    last_import: Option<ScanDate>,
}

impl Project {
    /// Builds a project from its wire representation.
    ///
    /// A missing or blank version becomes [`UNKNOWN_VERSION`]; `last_bom_import_ms`
    /// is epoch milliseconds and is reduced to a UTC calendar date.
    pub fn new(
        id: String,
        name: String,
        version: Option<String>,
        last_bom_import_ms: Option<i64>,
    ) -> Result<Self> {
        if id.trim().is_empty() {
            anyhow::bail!("Project id cannot be empty");
        }

        let version = version
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        Ok(Self {
            id,
            name: ProjectName::new(name)?,
            version,
            last_import: last_bom_import_ms.and_then(ScanDate::from_epoch_millis),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn last_import(&self) -> Option<ScanDate> {
        self.last_import
    }

    /// Date reported to DefectDojo as the scan date, falling back to `today`.
    pub fn scan_date_or(&self, today: NaiveDate) -> ScanDate {
        self.last_import.unwrap_or(ScanDate::new(today))
    }
}
