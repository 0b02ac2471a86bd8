pub mod catalog_store;
pub mod static_catalog;
pub mod woocommerce_source;
