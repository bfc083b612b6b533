use crate::ports::outbound::{ProjectSort, DEFAULT_PAGE_SIZE};

/// Default number of projects processed at the same time
pub const DEFAULT_CONCURRENCY: usize = 8;

/// SyncRequest - per-run options for the synchronization use case
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Refresh tests that already exist instead of skipping them
    pub reimport_enabled: bool,
    /// Plan only: read both systems, decide, but write nothing
    pub dry_run: bool,
    /// Projects requested per Dependency-Track page
    pub page_size: u32,
    /// Optional sort forwarded to the project listing
    pub sort: Option<ProjectSort>,
    /// Upper bound on concurrent creations and project tasks
    pub concurrency: usize,
}

impl SyncRequest {
    pub fn new(reimport_enabled: bool) -> Self {
        Self {
            reimport_enabled,
            dry_run: false,
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_sort(mut self, sort: Option<ProjectSort>) -> Self {
        self.sort = sort;
        self
    }

    /// Sets the concurrency limit; zero is raised to one.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}
