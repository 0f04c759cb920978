//! Ratings and the per-session answer store.

use std::collections::BTreeMap;

use gifts_core::error::DomainError;
use serde::Serialize;

/// A self-reported agreement level between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: u8 = 1;
    /// Highest accepted rating; also the per-question maximum when scoring.
    pub const MAX: u8 = 5;

    /// Validates `value` as a rating.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `value` is outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Self::out_of_range(value))
        }
    }

    fn out_of_range(value: impl std::fmt::Display) -> DomainError {
        DomainError::Validation(format!(
            "rating must be between {} and {}, got {value}",
            Self::MIN,
            Self::MAX
        ))
    }

    /// The numeric rating.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for Rating {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| Self::out_of_range(value))
            .and_then(Self::new)
    }
}

/// Question id → rating. An unanswered question has no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    ratings: BTreeMap<u32, Rating>,
}

impl AnswerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `rating` for `question_id`, returning the rating it replaced.
    pub fn record(&mut self, question_id: u32, rating: Rating) -> Option<Rating> {
        self.ratings.insert(question_id, rating)
    }

    /// The rating given to `question_id`, if any.
    #[must_use]
    pub fn rating(&self, question_id: u32) -> Option<Rating> {
        self.ratings.get(&question_id).copied()
    }

    /// Whether `question_id` has been answered.
    #[must_use]
    pub fn is_answered(&self, question_id: u32) -> bool {
        self.ratings.contains_key(&question_id)
    }

    /// Number of answered questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Whether nothing has been answered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Answers in ascending question-id order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, Rating)> + '_ {
        self.ratings.iter().map(|(&id, &rating)| (id, rating))
    }

    /// Discards every answer.
    pub fn clear(&mut self) {
        self.ratings.clear();
    }

    /// Plain snapshot for presentation.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<u32, u8> {
        self.iter().map(|(id, rating)| (id, rating.value())).collect()
    }
}
