/// Reconciliation core - domain model, decision policies and planning services
///
/// Nothing in this layer performs I/O; it operates on snapshots handed
/// in by the application layer.
pub mod domain;
pub mod policies;
pub mod services;
