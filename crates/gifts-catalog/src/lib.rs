//! Gifts Catalog: category definitions and the question bank.
//!
//! Static reference data, loaded once at process start and validated
//! before the server accepts traffic. A catalog that fails validation is a
//! configuration defect and aborts startup.

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::Catalog;
pub use error::CatalogError;
pub use model::{CategoryDefinition, Question};
