mod catalog;

pub use catalog::{CatalogConfig, CatalogService, DEFAULT_TRENDING_PAGE, SUGGESTION_LIMIT};
