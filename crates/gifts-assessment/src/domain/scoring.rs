//! Reduces an answer store to a ranked per-category result list.

use std::collections::HashMap;

use gifts_catalog::Catalog;
use gifts_core::category::Category;
use serde::Serialize;

use super::answers::{AnswerStore, Rating};

/// Aggregate for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryResult {
    /// The category scored.
    pub category: Category,
    /// Sum of ratings over the category's answered questions.
    pub raw_score: u32,
    /// How many of the category's questions were answered.
    pub answered_count: u32,
    /// `raw_score / (max(answered_count, 1) * 5) * 100`, rounded half up.
    pub percentage: u32,
}

#[derive(Default)]
struct Tally {
    raw_score: u32,
    answered_count: u32,
}

/// Scores `answers` against `catalog`.
///
/// Returns exactly one result per catalog category, ranked by percentage
/// descending. The sort is stable, so equal percentages keep catalog order.
/// Categories with no answers score 0 (their count is treated as 1).
/// Answers for ids not in the question bank are ignored.
#[must_use]
pub fn score(answers: &AnswerStore, catalog: &Catalog) -> Vec<CategoryResult> {
    let mut tallies: HashMap<Category, Tally> = HashMap::new();
    for (question_id, rating) in answers.iter() {
        if let Some(question) = catalog.question(question_id) {
            let tally = tallies.entry(question.category).or_default();
            tally.raw_score += u32::from(rating.value());
            tally.answered_count += 1;
        }
    }

    let mut results: Vec<CategoryResult> = catalog
        .categories()
        .iter()
        .map(|definition| {
            let tally = tallies.remove(&definition.category).unwrap_or_default();
            CategoryResult {
                category: definition.category,
                raw_score: tally.raw_score,
                answered_count: tally.answered_count,
                percentage: percentage(tally.raw_score, tally.answered_count),
            }
        })
        .collect();

    results.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    results
}

/// Integer form of `round(raw / denominator * 100)` with halves rounded up.
fn percentage(raw_score: u32, answered_count: u32) -> u32 {
    let denominator = answered_count.max(1) * u32::from(Rating::MAX);
    (raw_score * 200 + denominator) / (2 * denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gifts_catalog::{CategoryDefinition, Question};

    fn rating(value: u8) -> Rating {
        Rating::new(value).unwrap()
    }

    fn result_for(results: &[CategoryResult], category: Category) -> &CategoryResult {
        results.iter().find(|r| r.category == category).unwrap()
    }

    #[test]
    fn test_empty_store_scores_zero_in_catalog_order() {
        let catalog = Catalog::shipped().unwrap();

        let results = score(&AnswerStore::new(), &catalog);

        let order: Vec<Category> = results.iter().map(|r| r.category).collect();
        assert_eq!(order, Category::ALL);
        assert!(results.iter().all(|r| r.percentage == 0 && r.raw_score == 0));
    }

    #[test]
    fn test_fully_answered_category_at_max_scores_100() {
        // Arrange
        let catalog = Catalog::shipped().unwrap();
        let mut answers = AnswerStore::new();
        for id in [7, 8, 9] {
            answers.record(id, rating(5));
        }

        // Act
        let results = score(&answers, &catalog);

        // Assert
        let teaching = &results[0];
        assert_eq!(teaching.category, Category::Teaching);
        assert_eq!(teaching.raw_score, 15);
        assert_eq!(teaching.answered_count, 3);
        assert_eq!(teaching.percentage, 100);
    }

    #[test]
    fn test_partially_answered_category_normalizes_by_answered_count() {
        let catalog = Catalog::shipped().unwrap();
        let mut answers = AnswerStore::new();
        answers.record(19, rating(3));

        let results = score(&answers, &catalog);

        let mercy = result_for(&results, Category::Mercy);
        assert_eq!(mercy.answered_count, 1);
        assert_eq!(mercy.raw_score, 3);
        assert_eq!(mercy.percentage, 60);
    }

    #[test]
    fn test_all_fives_tie_at_100_in_catalog_order() {
        let catalog = Catalog::shipped().unwrap();
        let mut answers = AnswerStore::new();
        for q in catalog.questions() {
            answers.record(q.id, rating(5));
        }

        let first = score(&answers, &catalog);
        let second = score(&answers, &catalog);

        assert_eq!(first, second);
        let order: Vec<Category> = first.iter().map(|r| r.category).collect();
        assert_eq!(order, Category::ALL);
        assert!(first.iter().all(|r| r.percentage == 100));
    }

    #[test]
    fn test_ranking_is_descending_and_stable_for_ties() {
        // Arrange
        let catalog = Catalog::shipped().unwrap();
        let mut answers = AnswerStore::new();
        answers.record(28, rating(5)); // faith 100
        answers.record(4, rating(4)); // serving 80
        answers.record(1, rating(4)); // prophecy 80
        answers.record(25, rating(1)); // knowledge 20

        // Act
        let results = score(&answers, &catalog);

        // Assert
        let head: Vec<(Category, u32)> = results
            .iter()
            .take(4)
            .map(|r| (r.category, r.percentage))
            .collect();
        assert_eq!(
            head,
            vec![
                (Category::Faith, 100),
                (Category::Prophecy, 80),
                (Category::Serving, 80),
                (Category::Knowledge, 20),
            ]
        );
        assert_eq!(results[4].category, Category::Teaching);
    }

    #[test]
    fn test_rounds_half_up() {
        assert_eq!(percentage(13, 3), 87); // 86.67
        assert_eq!(percentage(11, 3), 73); // 73.33
        assert_eq!(percentage(1, 8), 3); // 2.5
        assert_eq!(percentage(0, 0), 0);
    }

    #[test]
    fn test_every_result_within_bounds_for_any_uniform_rating() {
        let catalog = Catalog::shipped().unwrap();
        for value in Rating::MIN..=Rating::MAX {
            for answered in 0..=catalog.question_count() {
                let mut answers = AnswerStore::new();
                for q in &catalog.questions()[..answered] {
                    answers.record(q.id, rating(value));
                }

                let results = score(&answers, &catalog);

                assert_eq!(results.len(), catalog.categories().len());
                assert!(results.iter().all(|r| r.percentage <= 100));
            }
        }
    }

    #[test]
    fn test_raising_a_rating_never_lowers_its_category() {
        let catalog = Catalog::shipped().unwrap();
        let mut base = AnswerStore::new();
        for (i, q) in catalog.questions().iter().enumerate() {
            let value = u8::try_from(i % 5).unwrap() + 1;
            base.record(q.id, rating(value));
        }

        for q in catalog.questions() {
            let current = base.rating(q.id).unwrap().value();
            let before = result_for(&score(&base, &catalog), q.category).percentage;
            for higher in current..=Rating::MAX {
                let mut raised = base.clone();
                raised.record(q.id, rating(higher));
                let after = result_for(&score(&raised, &catalog), q.category).percentage;
                assert!(after >= before, "question {} lowered its category", q.id);
            }
        }
    }

    #[test]
    fn test_unequal_question_counts_use_actual_answered_count() {
        // Arrange
        let categories = [Category::Faith, Category::Mercy]
            .into_iter()
            .map(|category| CategoryDefinition {
                category,
                name: category.label().to_owned(),
                description: String::new(),
                biblical_reference: String::new(),
                characteristics: Vec::new(),
            })
            .collect();
        let questions = vec![
            Question { id: 1, text: "a".into(), category: Category::Faith },
            Question { id: 2, text: "b".into(), category: Category::Mercy },
            Question { id: 3, text: "c".into(), category: Category::Mercy },
            Question { id: 4, text: "d".into(), category: Category::Mercy },
            Question { id: 5, text: "e".into(), category: Category::Mercy },
        ];
        let catalog = Catalog::new(categories, questions).unwrap();
        let mut answers = AnswerStore::new();
        for id in 2..=5 {
            answers.record(id, rating(4));
        }
        answers.record(1, rating(2));

        // Act
        let results = score(&answers, &catalog);

        // Assert
        assert_eq!(result_for(&results, Category::Mercy).raw_score, 16);
        assert_eq!(result_for(&results, Category::Mercy).percentage, 80);
        assert_eq!(result_for(&results, Category::Faith).percentage, 40);
    }

    #[test]
    fn test_answers_for_unknown_questions_are_ignored() {
        let catalog = Catalog::shipped().unwrap();
        let mut answers = AnswerStore::new();
        answers.record(999, rating(5));

        let results = score(&answers, &catalog);

        assert!(results.iter().all(|r| r.answered_count == 0));
    }
}
