/// Network adapters for the Dependency-Track and DefectDojo REST APIs
mod defect_dojo_client;
mod dependency_track_client;
mod http;

pub use defect_dojo_client::{
    DefectDojoClient, ImportOptions, DEFAULT_ENGAGEMENT_PAGE_LIMIT, FPF_SCAN_TYPE,
};
pub use dependency_track_client::{DependencyTrackCatalog, DependencyTrackClient};
pub use http::build_http_client;
