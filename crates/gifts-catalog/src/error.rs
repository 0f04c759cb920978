//! Catalog loading and validation errors.

use std::path::PathBuf;

use gifts_core::category::Category;
use thiserror::Error;

/// A defect in the catalog document.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog {path}: {source}")]
    Io {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid YAML or does not match the catalog shape.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Question ids must be positive.
    #[error("question id must be positive (question text: {text:?})")]
    NonPositiveQuestionId {
        /// Text of the offending question.
        text: String,
    },

    /// Two questions share an id.
    #[error("duplicate question id {0}")]
    DuplicateQuestionId(u32),

    /// A category is defined more than once.
    #[error("category {0} is defined more than once")]
    DuplicateCategory(Category),

    /// A question refers to a category with no definition.
    #[error("question {question_id} refers to undefined category {category}")]
    UndefinedCategory {
        /// The offending question.
        question_id: u32,
        /// The category it names.
        category: Category,
    },

    /// A defined category has no questions bound to it.
    #[error("category {0} has no questions")]
    CategoryWithoutQuestions(Category),
}
