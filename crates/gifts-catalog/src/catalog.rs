//! The validated catalog: category definitions plus the ordered question bank.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use gifts_core::category::Category;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::{CategoryDefinition, Question};

const SHIPPED_CATALOG: &str = include_str!("../data/catalog.yaml");

/// On-disk shape of a catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    categories: Vec<CategoryDefinition>,
    questions: Vec<Question>,
}

/// Category definitions and questions, validated for completeness.
///
/// Iteration order of [`Catalog::categories`] is the document order and is
/// the tie-break order used when ranking results. Question order is the
/// order in which the quiz pages through them.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    categories: Vec<CategoryDefinition>,
    questions: Vec<Question>,
    #[serde(skip)]
    question_index: HashMap<u32, usize>,
}

impl Catalog {
    /// Builds a catalog from parts, enforcing the completeness invariant.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first defect found.
    pub fn new(
        categories: Vec<CategoryDefinition>,
        questions: Vec<Question>,
    ) -> Result<Self, CatalogError> {
        let mut defined = HashSet::new();
        for definition in &categories {
            if !defined.insert(definition.category) {
                return Err(CatalogError::DuplicateCategory(definition.category));
            }
        }

        let mut question_index = HashMap::with_capacity(questions.len());
        let mut covered = HashSet::new();
        for (position, question) in questions.iter().enumerate() {
            if question.id == 0 {
                return Err(CatalogError::NonPositiveQuestionId {
                    text: question.text.clone(),
                });
            }
            if question_index.insert(question.id, position).is_some() {
                return Err(CatalogError::DuplicateQuestionId(question.id));
            }
            if !defined.contains(&question.category) {
                return Err(CatalogError::UndefinedCategory {
                    question_id: question.id,
                    category: question.category,
                });
            }
            covered.insert(question.category);
        }

        if let Some(empty) = categories.iter().find(|d| !covered.contains(&d.category)) {
            return Err(CatalogError::CategoryWithoutQuestions(empty.category));
        }

        Ok(Self {
            categories,
            questions,
            question_index,
        })
    }

    /// Parses and validates a YAML catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed YAML, or a validation
    /// error from [`Catalog::new`].
    pub fn from_yaml_str(source: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_yaml::from_str(source)?;
        Self::new(document.categories, document.questions)
    }

    /// Reads, parses and validates a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Io`] if the file cannot be read, otherwise as
    /// [`Catalog::from_yaml_str`].
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let source = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&source)?;
        tracing::info!(
            path = %path.display(),
            categories = catalog.categories.len(),
            questions = catalog.questions.len(),
            "loaded catalog override"
        );
        Ok(catalog)
    }

    /// The questionnaire compiled into the binary.
    ///
    /// # Errors
    ///
    /// Only if the embedded document is defective, which the test suite rules out.
    pub fn shipped() -> Result<Self, CatalogError> {
        Self::from_yaml_str(SHIPPED_CATALOG)
    }

    /// Category definitions in catalog order.
    #[must_use]
    pub fn categories(&self) -> &[CategoryDefinition] {
        &self.categories
    }

    /// Questions in quiz order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Looks up a question by id.
    #[must_use]
    pub fn question(&self, id: u32) -> Option<&Question> {
        self.question_index.get(&id).map(|&i| &self.questions[i])
    }

    /// Looks up the definition for a category.
    #[must_use]
    pub fn definition(&self, category: Category) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|d| d.category == category)
    }

    /// Number of questions in the bank.
    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
