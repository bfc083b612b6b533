use crate::reconciliation::domain::ProductId;

/// ProductLookup port - resolves the DefectDojo product owning a project's engagement
///
/// Lookups never fail: names without an explicit mapping resolve to the
/// implementation's fallback product.
pub trait ProductLookup: Send + Sync {
    fn product_id_for(&self, project_name: &str) -> ProductId;
}
