//! Design style catalog

mod catalog;

pub use catalog::StyleCatalog;
