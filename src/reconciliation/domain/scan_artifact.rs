use crate::reconciliation::domain::Project;
use chrono::{DateTime, NaiveDate, Utc};

/// Calendar date attached to an imported test
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScanDate(NaiveDate);

impl ScanDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Converts epoch milliseconds to a UTC date. Out-of-range values yield `None`.
    pub fn from_epoch_millis(millis: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| Self(dt.date_naive()))
    }
}

impl std::fmt::Display for ScanDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Findings export downloaded from Dependency-Track, ready to forward.
///
/// Never persisted; it lives only between the download and the upload call.
#[derive(Clone, PartialEq)]
pub struct ScanArtifact {
    project_name: String,
    payload: Vec<u8>,
    version_label: String,
    scan_date: ScanDate,
}

impl ScanArtifact {
    pub fn new(
        project_name: String,
        payload: Vec<u8>,
        version_label: String,
        scan_date: ScanDate,
    ) -> Self {
        Self {
            project_name,
            payload,
            version_label,
            scan_date,
        }
    }

    /// Pairs a payload with the version label and scan date of `project`.
    pub fn for_project(project: &Project, payload: Vec<u8>, today: NaiveDate) -> Self {
        Self::new(
            project.name().to_string(),
            payload,
            project.version().to_string(),
            project.scan_date_or(today),
        )
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn version_label(&self) -> &str {
        &self.version_label
    }

    pub fn scan_date(&self) -> ScanDate {
        self.scan_date
    }

    /// File name used for the multipart upload part
    pub fn file_name(&self) -> String {
        let safe: String = self
            .project_name
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' || c == '.' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}.fpf.json", safe)
    }
}

// Payloads can be megabytes; show the size instead of the bytes.
impl std::fmt::Debug for ScanArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanArtifact")
            .field("project_name", &self.project_name)
            .field("payload_len", &self.payload.len())
            .field("version_label", &self.version_label)
            .field("scan_date", &self.scan_date)
            .finish()
    }
}
