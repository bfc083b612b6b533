pub mod engagement;
pub mod name_index;
pub mod project;
pub mod scan_artifact;

pub use engagement::{
    Engagement, EngagementId, EngagementTemplate, NewEngagement, ProductId, Test, TestId,
};
pub use name_index::{Keyed, NameIndex};
pub use project::{Project, ProjectName, UNKNOWN_VERSION};
pub use scan_artifact::{ScanArtifact, ScanDate};
