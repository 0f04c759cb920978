//! Fixed-size pages over the question bank.

use std::num::NonZeroUsize;
use std::ops::Range;

use gifts_catalog::Question;

use super::answers::AnswerStore;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::new(5).unwrap();

/// Outcome of moving forward from the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the given zero-based page; more pages remain.
    NextPage(usize),
    /// The current page was the last one; the assessment is complete.
    Complete,
}

/// Outcome of moving backward from the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Retreat {
    /// Moved to the given zero-based page.
    PreviousPage(usize),
    /// Already on the first page; the caller leaves the quiz.
    Exit,
}

/// Tracks the current page of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: NonZeroUsize,
    question_count: usize,
    current_page: usize,
}

impl Paginator {
    /// Starts on page 0 over `question_count` questions.
    #[must_use]
    pub fn new(page_size: NonZeroUsize, question_count: usize) -> Self {
        Self {
            page_size,
            question_count,
            current_page: 0,
        }
    }

    /// Zero-based index of the current page.
    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Questions per page.
    #[must_use]
    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// `ceil(question_count / page_size)`.
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.question_count.div_ceil(self.page_size.get())
    }

    /// Whether the current page is the final one.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.current_page + 1 >= self.total_pages()
    }

    /// Question-bank indices covered by the current page.
    #[must_use]
    pub fn page_range(&self) -> Range<usize> {
        let start = (self.current_page * self.page_size.get()).min(self.question_count);
        let end = (start + self.page_size.get()).min(self.question_count);
        start..end
    }

    /// Questions on the current page, in bank order.
    #[must_use]
    pub fn current_slice<'a>(&self, questions: &'a [Question]) -> &'a [Question] {
        let range = self.page_range();
        let end = range.end.min(questions.len());
        &questions[range.start.min(end)..end]
    }

    /// Number of questions on the current page with no recorded rating.
    #[must_use]
    pub fn unanswered_on_page(&self, questions: &[Question], answers: &AnswerStore) -> usize {
        self.current_slice(questions)
            .iter()
            .filter(|q| !answers.is_answered(q.id))
            .count()
    }

    /// True iff every question on the current page has a rating.
    #[must_use]
    pub fn can_advance(&self, questions: &[Question], answers: &AnswerStore) -> bool {
        self.unanswered_on_page(questions, answers) == 0
    }

    /// Moves to the next page, or reports completion on the last page.
    pub fn advance(&mut self) -> Advance {
        if self.is_last_page() {
            Advance::Complete
        } else {
            self.current_page += 1;
            Advance::NextPage(self.current_page)
        }
    }

    /// Moves to the previous page, or reports exit on the first page.
    pub fn retreat(&mut self) -> Retreat {
        if self.current_page == 0 {
            Retreat::Exit
        } else {
            self.current_page -= 1;
            Retreat::PreviousPage(self.current_page)
        }
    }

    /// Returns to page 0.
    pub fn reset(&mut self) {
        self.current_page = 0;
    }
}
