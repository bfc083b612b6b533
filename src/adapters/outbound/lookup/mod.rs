/// In-memory lookup adapters
mod product_table;

pub use product_table::{ProductTable, DEFAULT_PRODUCT_ID};
