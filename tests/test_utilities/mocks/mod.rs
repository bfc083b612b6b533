/// Mock implementations for testing
mod mock_progress_reporter;
mod mock_source;
mod mock_target;

pub use mock_progress_reporter::MockProgressReporter;
pub use mock_source::{MockAuthenticator, MockCatalog};
pub use mock_target::{MockTarget, TargetCall};
