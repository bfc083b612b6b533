/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach Dependency-Track, DefectDojo, the product table and the console.
pub mod product_lookup;
pub mod progress_reporter;
pub mod source_catalog;
pub mod target_directory;

pub use product_lookup::ProductLookup;
pub use progress_reporter::ProgressReporter;
pub use source_catalog::{
    BearerToken, Credentials, PageRequest, ProjectListing, ProjectSort, RejectedProject, SortOrder,
    SourceAuthenticator, SourceCatalog, DEFAULT_PAGE_SIZE,
};
pub use target_directory::TargetDirectory;
