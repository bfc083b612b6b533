/// Use cases module containing application business logic orchestration
mod import_scans;
mod run_sync;
mod sync_engagements;

#[cfg(test)]
pub(crate) mod test_support;

pub use import_scans::ImportScansUseCase;
pub use run_sync::RunSyncUseCase;
pub use sync_engagements::SyncEngagementsUseCase;
