//! Catalog records.

use gifts_core::category::Category;
use serde::{Deserialize, Serialize};

/// Descriptive metadata for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    /// The category being described.
    pub category: Category,
    /// Display name, e.g. `Serving (Helps)`.
    pub name: String,
    /// One-paragraph description.
    pub description: String,
    /// Scripture references for the gift.
    pub biblical_reference: String,
    /// Short trait labels.
    pub characteristics: Vec<String>,
}

/// A single rateable statement bound to one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique positive identifier.
    pub id: u32,
    /// Statement shown to the user.
    pub text: String,
    /// The category this statement measures.
    pub category: Category,
}
