//! dtrack-dojo-sync - Dependency-Track to DefectDojo synchronizer
//!
//! This library mirrors every Dependency-Track project as a DefectDojo
//! engagement and moves each project's findings export into it, importing a
//! new test or (optionally) reimporting into the existing one.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Reconciliation** (`reconciliation`): Pure domain types, decision rules and set arithmetic
//! - **Application Layer** (`application`): Use cases and DTOs
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): HTTP clients, console output and lookups
//! - **Shared** (`shared`): Error types, result alias and security helpers
//!
//! # Example
//!
//! ```no_run
//! use dtrack_dojo_sync::prelude::*;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<()> {
//! let client = build_http_client(Duration::from_secs(60))?;
//! let use_case = RunSyncUseCase::new(
//!     DependencyTrackClient::new(client.clone(), "http://dtrack:8081"),
//!     Credentials::new("admin", "admin"),
//!     DefectDojoClient::new(client, "https://dojo.example.com", "api-token"),
//!     ProductTable::default(),
//!     StderrProgressReporter::new(),
//!     EngagementTemplate::default(),
//! );
//!
//! let report = use_case.execute(SyncRequest::new(false)).await?;
//! println!("{}", report.summary_line());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod reconciliation;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::lookup::ProductTable;
    pub use crate::adapters::outbound::network::{
        build_http_client, DefectDojoClient, DependencyTrackClient, ImportOptions,
    };
    pub use crate::application::dto::{OutcomeStatus, ProjectOutcome, RunReport, SyncRequest};
    pub use crate::application::use_cases::RunSyncUseCase;
    pub use crate::ports::inbound::SyncPort;
    pub use crate::ports::outbound::{
        Credentials, ProductLookup, ProgressReporter, ProjectSort, SortOrder,
        SourceAuthenticator, SourceCatalog, TargetDirectory,
    };
    pub use crate::reconciliation::domain::{
        Engagement, EngagementTemplate, NameIndex, NewEngagement, Project, ScanArtifact, Test,
    };
    pub use crate::reconciliation::policies::{ImportDecision, ImportDecisionPolicy, ReleaseTag};
    pub use crate::reconciliation::services::EngagementPlanner;
    pub use crate::shared::Result;
}
