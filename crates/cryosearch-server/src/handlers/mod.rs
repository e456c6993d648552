//! Request handlers, one module per endpoint family.

pub mod catalog;
pub mod health;
pub mod search;

pub use catalog::{article_handler, filter_handler, index_handler, references_handler};
pub use health::health_handler;
pub use search::{quick_search_handler, search_handler};
