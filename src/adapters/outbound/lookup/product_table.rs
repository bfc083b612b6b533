use crate::ports::outbound::ProductLookup;
use crate::reconciliation::domain::ProductId;
use std::collections::HashMap;

/// Product used when a project name has no explicit mapping
pub const DEFAULT_PRODUCT_ID: ProductId = 1;

/// ProductTable adapter - static name → product mapping from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductTable {
    products: HashMap<String, ProductId>,
    default_product_id: ProductId,
}

impl ProductTable {
    pub fn new(products: HashMap<String, ProductId>, default_product_id: ProductId) -> Self {
        Self {
            products,
            default_product_id,
        }
    }

}

impl Default for ProductTable {
    fn default() -> Self {
        Self::new(HashMap::new(), DEFAULT_PRODUCT_ID)
    }
}

impl ProductLookup for ProductTable {
    fn product_id_for(&self, project_name: &str) -> ProductId {
        self.products
            .get(project_name)
            .copied()
            .unwrap_or(self.default_product_id)
    }
}
