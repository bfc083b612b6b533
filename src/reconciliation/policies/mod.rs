pub mod import_decision;
pub mod release_tag;

pub use import_decision::{ImportDecision, ImportDecisionPolicy, LinkState};
pub use release_tag::ReleaseTag;
