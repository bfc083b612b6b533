/// Console adapters for user-facing run output
mod progress_reporter;

pub use progress_reporter::StderrProgressReporter;
