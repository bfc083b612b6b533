use crate::reconciliation::domain::Keyed;
use chrono::NaiveDate;

pub type EngagementId = u64;
pub type TestId = u64;
pub type ProductId = u64;

/// Status assigned to engagements created by the synchronizer
pub const DEFAULT_ENGAGEMENT_STATUS: &str = "In Progress";

/// Engagement type assigned to engagements created by the synchronizer
pub const DEFAULT_ENGAGEMENT_TYPE: &str = "CI/CD";

/// Engagement as listed by DefectDojo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Engagement {
    pub id: EngagementId,
    pub name: String,
}

impl Engagement {
    pub fn new(id: EngagementId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl Keyed for Engagement {
    fn key(&self) -> &str {
        &self.name
    }
}

/// Test (one scan import) inside an engagement. The title holds the project version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub id: TestId,
    pub title: String,
}

impl Test {
    pub fn new(id: TestId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
        }
    }
}

impl Keyed for Test {
    fn key(&self) -> &str {
        &self.title
    }
}

/// Fixed part of every engagement the synchronizer creates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementTemplate {
    pub target_start: NaiveDate,
    pub target_end: NaiveDate,
}

impl EngagementTemplate {
    pub fn new(target_start: NaiveDate, target_end: NaiveDate) -> Self {
        Self {
            target_start,
            target_end,
        }
    }

    /// Fills the template for one missing project name.
    pub fn for_project(&self, name: &str, product_id: ProductId) -> NewEngagement {
        NewEngagement {
            name: name.to_string(),
            product_id,
            status: DEFAULT_ENGAGEMENT_STATUS,
            engagement_type: DEFAULT_ENGAGEMENT_TYPE,
            target_start: self.target_start,
            target_end: self.target_end,
            deduplication_on_engagement: true,
        }
    }
}

impl Default for EngagementTemplate {
    fn default() -> Self {
        // Both dates are valid constants
        Self {
            target_start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            target_end: NaiveDate::from_ymd_opt(2025, 12, 31).unwrap_or_default(),
        }
    }
}

/// Engagement creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEngagement {
    pub name: String,
    pub product_id: ProductId,
    pub status: &'static str,
    pub engagement_type: &'static str,
    pub target_start: NaiveDate,
    pub target_end: NaiveDate,
    pub deduplication_on_engagement: bool,
}
