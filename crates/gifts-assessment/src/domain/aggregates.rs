//! The session aggregate: a state machine over the assessment views.

use std::num::NonZeroUsize;

use chrono::{DateTime, Utc};
use gifts_catalog::Catalog;
use gifts_core::category::Category;
use gifts_core::clock::Clock;
use gifts_core::error::DomainError;
use gifts_core::narrative::Narrative;
use uuid::Uuid;

use super::answers::{AnswerStore, Rating};
use super::pagination::{Advance, Paginator, Retreat};
use super::scoring::{self, CategoryResult};

/// Loading state of the Coach narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeState {
    /// The request has been issued and not yet resolved.
    Loading,
    /// The narrative (or its fallback) has arrived.
    Ready(Narrative),
}

/// The Coach detail shown on top of Results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachPanel {
    /// The category being coached.
    pub category: Category,
    /// Generation captured when the panel opened.
    pub generation: u64,
    /// Narrative loading state.
    pub narrative: NarrativeState,
}

/// The active view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Initial view.
    Landing,
    /// Answering questions page by page.
    Quiz,
    /// Ranked results, optionally with a Coach detail open.
    Results {
        /// Results computed on entry, ranked by percentage.
        results: Vec<CategoryResult>,
        /// Open Coach detail, if any.
        coach: Option<CoachPanel>,
    },
}

impl Phase {
    /// View name as exposed to the host UI.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Landing => "landing",
            Phase::Quiz => "quiz",
            Phase::Results { coach: None, .. } => "results",
            Phase::Results { coach: Some(_), .. } => "coach",
        }
    }
}

/// Handle for a narrative request issued when Coach was entered.
///
/// A resolution is applied only while the session still shows a Coach
/// panel with the same generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrativeTicket {
    /// The issuing session.
    pub session_id: Uuid,
    /// The category requested.
    pub category: Category,
    /// Coach generation at issue time.
    pub generation: u64,
}

/// Where `next_page` led.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizForward {
    /// Still in the quiz, on this zero-based page.
    Page(usize),
    /// The final page was finished; Results is now showing.
    Results,
}

/// Where `previous_page` led.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizBackward {
    /// Still in the quiz, on this zero-based page.
    Page(usize),
    /// The quiz was cancelled; Landing is showing and answers are gone.
    Landing,
}

/// The aggregate root for one user's assessment session.
#[derive(Debug, Clone)]
pub struct Assessment {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Number of accepted transitions.
    pub(crate) version: i64,
    phase: Phase,
    answers: AnswerStore,
    paginator: Paginator,
    coach_generation: u64,
    started_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Assessment {
    /// Creates a session on the Landing view.
    #[must_use]
    pub fn new(id: Uuid, page_size: NonZeroUsize, question_count: usize, clock: &dyn Clock) -> Self {
        let now = clock.now();
        Self {
            id,
            version: 0,
            phase: Phase::Landing,
            answers: AnswerStore::new(),
            paginator: Paginator::new(page_size, question_count),
            coach_generation: 0,
            started_at: now,
            updated_at: now,
        }
    }

    /// Current version.
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// The active view.
    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Answers collected so far.
    #[must_use]
    pub fn answers(&self) -> &AnswerStore {
        &self.answers
    }

    /// Quiz page state.
    #[must_use]
    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Number of times Coach has been entered.
    #[must_use]
    pub fn coach_generation(&self) -> u64 {
        self.coach_generation
    }

    /// When the session was created.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// When the last transition was accepted.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self, clock: &dyn Clock) {
        self.version += 1;
        self.updated_at = clock.now();
    }

    fn reject(&self, action: &'static str) -> DomainError {
        DomainError::InvalidTransition {
            action,
            view: self.phase.name(),
        }
    }

    fn require_quiz(&self, action: &'static str) -> Result<(), DomainError> {
        if self.phase == Phase::Quiz {
            Ok(())
        } else {
            Err(self.reject(action))
        }
    }

    /// Landing → Quiz.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless on Landing.
    pub fn start(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.phase != Phase::Landing {
            return Err(self.reject("start"));
        }
        self.paginator.reset();
        self.phase = Phase::Quiz;
        self.touch(clock);
        Ok(())
    }

    /// Records a rating for a question while in the quiz.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` outside the quiz, or
    /// `DomainError::Validation` for an out-of-range rating or an id that is
    /// not in the question bank.
    pub fn answer(
        &mut self,
        question_id: u32,
        rating: i64,
        catalog: &Catalog,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.require_quiz("answer")?;
        let rating = Rating::try_from(rating)?;
        if catalog.question(question_id).is_none() {
            return Err(DomainError::Validation(format!(
                "unknown question id {question_id}"
            )));
        }
        self.answers.record(question_id, rating);
        self.touch(clock);
        Ok(())
    }

    /// Moves forward a page, entering Results after the last page.
    ///
    /// Results are scored here, on entry, from the current answers.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` outside the quiz, or
    /// `DomainError::PageIncomplete` if the current page has unanswered
    /// questions.
    pub fn next_page(
        &mut self,
        catalog: &Catalog,
        clock: &dyn Clock,
    ) -> Result<QuizForward, DomainError> {
        self.require_quiz("advance")?;
        let unanswered = self
            .paginator
            .unanswered_on_page(catalog.questions(), &self.answers);
        if unanswered > 0 {
            return Err(DomainError::PageIncomplete {
                page: self.paginator.current_page(),
                unanswered,
            });
        }

        let step = match self.paginator.advance() {
            Advance::NextPage(page) => QuizForward::Page(page),
            Advance::Complete => {
                self.phase = Phase::Results {
                    results: scoring::score(&self.answers, catalog),
                    coach: None,
                };
                QuizForward::Results
            }
        };
        self.touch(clock);
        Ok(step)
    }

    /// Moves back a page; on the first page, cancels to Landing and
    /// discards every answer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` outside the quiz.
    pub fn previous_page(&mut self, clock: &dyn Clock) -> Result<QuizBackward, DomainError> {
        self.require_quiz("go back")?;
        let step = match self.paginator.retreat() {
            Retreat::PreviousPage(page) => QuizBackward::Page(page),
            Retreat::Exit => {
                self.answers.clear();
                self.phase = Phase::Landing;
                QuizBackward::Landing
            }
        };
        self.touch(clock);
        Ok(step)
    }

    /// Results → Coach(category). Issues a fresh narrative ticket.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless on Results with no
    /// Coach detail open.
    pub fn select_category(
        &mut self,
        category: Category,
        clock: &dyn Clock,
    ) -> Result<NarrativeTicket, DomainError> {
        let rejection = self.reject("select a category");
        let Phase::Results { coach: coach @ None, .. } = &mut self.phase else {
            return Err(rejection);
        };

        self.coach_generation += 1;
        *coach = Some(CoachPanel {
            category,
            generation: self.coach_generation,
            narrative: NarrativeState::Loading,
        });
        let ticket = NarrativeTicket {
            session_id: self.id,
            category,
            generation: self.coach_generation,
        };
        self.touch(clock);
        Ok(ticket)
    }

    /// Coach → Results. Any in-flight narrative will be discarded on arrival.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless a Coach detail is open.
    pub fn back_to_results(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        let rejection = self.reject("go back to results");
        let Phase::Results { coach, .. } = &mut self.phase else {
            return Err(rejection);
        };
        if coach.take().is_none() {
            return Err(rejection);
        }
        self.touch(clock);
        Ok(())
    }

    /// Results → Landing, discarding every answer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless on Results with no
    /// Coach detail open.
    pub fn retake(&mut self, clock: &dyn Clock) -> Result<(), DomainError> {
        if !matches!(self.phase, Phase::Results { coach: None, .. }) {
            return Err(self.reject("retake"));
        }
        self.answers.clear();
        self.paginator.reset();
        self.phase = Phase::Landing;
        self.touch(clock);
        Ok(())
    }

    /// Applies a narrative if `ticket` still matches the open Coach panel.
    ///
    /// Returns `false` (and changes nothing) when the user has navigated away
    /// or re-entered Coach since the ticket was issued.
    pub fn apply_narrative(
        &mut self,
        ticket: &NarrativeTicket,
        narrative: Narrative,
        clock: &dyn Clock,
    ) -> bool {
        let Phase::Results {
            coach: Some(panel), ..
        } = &mut self.phase
        else {
            return false;
        };
        if ticket.session_id != self.id
            || panel.generation != ticket.generation
            || panel.category != ticket.category
        {
            return false;
        }
        panel.narrative = NarrativeState::Ready(narrative);
        self.touch(clock);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pagination::DEFAULT_PAGE_SIZE;
    use chrono::TimeZone;
    use gifts_test_support::{FixedClock, sample_narrative};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap())
    }

    fn new_assessment(catalog: &Catalog) -> Assessment {
        Assessment::new(
            Uuid::new_v4(),
            DEFAULT_PAGE_SIZE,
            catalog.question_count(),
            &clock(),
        )
    }

    fn answer_current_page(assessment: &mut Assessment, catalog: &Catalog, rating: i64) {
        let ids: Vec<u32> = assessment
            .paginator()
            .current_slice(catalog.questions())
            .iter()
            .map(|q| q.id)
            .collect();
        for id in ids {
            assessment.answer(id, rating, catalog, &clock()).unwrap();
        }
    }

    fn finish_quiz(assessment: &mut Assessment, catalog: &Catalog, rating: i64) {
        assessment.start(&clock()).unwrap();
        loop {
            answer_current_page(assessment, catalog, rating);
            if assessment.next_page(catalog, &clock()).unwrap() == QuizForward::Results {
                break;
            }
        }
    }

    #[test]
    fn test_new_assessment_starts_on_landing() {
        let catalog = Catalog::shipped().unwrap();

        let assessment = new_assessment(&catalog);

        assert_eq!(assessment.phase(), &Phase::Landing);
        assert_eq!(assessment.version(), 0);
        assert!(assessment.answers().is_empty());
        assert_eq!(assessment.started_at(), clock().0);
    }

    #[test]
    fn test_start_moves_to_quiz_page_zero() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);

        assessment.start(&clock()).unwrap();

        assert_eq!(assessment.phase().name(), "quiz");
        assert_eq!(assessment.paginator().current_page(), 0);
        assert_eq!(assessment.version(), 1);
    }

    #[test]
    fn test_answer_outside_quiz_is_invalid_transition() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);

        let result = assessment.answer(1, 3, &catalog, &clock());

        match result {
            Err(DomainError::InvalidTransition { action, view }) => {
                assert_eq!(action, "answer");
                assert_eq!(view, "landing");
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
    }

    #[test]
    fn test_answer_rejects_unknown_question_and_bad_rating() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        assessment.start(&clock()).unwrap();

        assert!(matches!(
            assessment.answer(31, 3, &catalog, &clock()),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            assessment.answer(1, 0, &catalog, &clock()),
            Err(DomainError::Validation(_))
        ));
        assert!(assessment.answers().is_empty());
        assert_eq!(assessment.version(), 1);
    }

    #[test]
    fn test_next_page_rejected_until_page_complete() {
        // Arrange
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        assessment.start(&clock()).unwrap();
        assessment.answer(1, 4, &catalog, &clock()).unwrap();

        // Act
        let result = assessment.next_page(&catalog, &clock());

        // Assert
        match result {
            Err(DomainError::PageIncomplete { page, unanswered }) => {
                assert_eq!(page, 0);
                assert_eq!(unanswered, 4);
            }
            other => panic!("expected PageIncomplete, got {other:?}"),
        }
        assert_eq!(assessment.paginator().current_page(), 0);
    }

    #[test]
    fn test_next_page_advances_when_page_complete() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        assessment.start(&clock()).unwrap();
        answer_current_page(&mut assessment, &catalog, 2);

        let step = assessment.next_page(&catalog, &clock()).unwrap();

        assert_eq!(step, QuizForward::Page(1));
        assert_eq!(assessment.phase(), &Phase::Quiz);
    }

    #[test]
    fn test_finishing_last_page_scores_results_on_entry() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);

        finish_quiz(&mut assessment, &catalog, 5);

        match assessment.phase() {
            Phase::Results { results, coach } => {
                assert!(coach.is_none());
                assert_eq!(results.len(), 10);
                assert!(results.iter().all(|r| r.percentage == 100));
                assert_eq!(results[0].category, Category::Prophecy);
            }
            other => panic!("expected Results, got {other:?}"),
        }
        assert_eq!(assessment.answers().len(), 30);
    }

    #[test]
    fn test_previous_page_on_first_page_cancels_and_discards_answers() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        assessment.start(&clock()).unwrap();
        answer_current_page(&mut assessment, &catalog, 3);
        assessment.next_page(&catalog, &clock()).unwrap();

        assert_eq!(
            assessment.previous_page(&clock()).unwrap(),
            QuizBackward::Page(0)
        );
        assert_eq!(assessment.answers().len(), 5);

        assert_eq!(
            assessment.previous_page(&clock()).unwrap(),
            QuizBackward::Landing
        );
        assert_eq!(assessment.phase(), &Phase::Landing);
        assert!(assessment.answers().is_empty());
    }

    #[test]
    fn test_select_category_opens_coach_and_issues_ticket() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 4);

        let ticket = assessment
            .select_category(Category::Wisdom, &clock())
            .unwrap();

        assert_eq!(ticket.session_id, assessment.id);
        assert_eq!(ticket.category, Category::Wisdom);
        assert_eq!(ticket.generation, 1);
        assert_eq!(assessment.phase().name(), "coach");
        match assessment.phase() {
            Phase::Results {
                coach: Some(panel),
                results,
            } => {
                assert_eq!(panel.narrative, NarrativeState::Loading);
                assert_eq!(results.len(), 10);
            }
            other => panic!("expected Coach, got {other:?}"),
        }
    }

    #[test]
    fn test_select_category_while_coach_open_is_rejected() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 4);
        assessment.select_category(Category::Wisdom, &clock()).unwrap();

        let result = assessment.select_category(Category::Faith, &clock());

        assert!(matches!(
            result,
            Err(DomainError::InvalidTransition { view: "coach", .. })
        ));
    }

    #[test]
    fn test_apply_narrative_fills_matching_panel() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 4);
        let ticket = assessment.select_category(Category::Mercy, &clock()).unwrap();

        let applied = assessment.apply_narrative(&ticket, sample_narrative(Category::Mercy), &clock());

        assert!(applied);
        match assessment.phase() {
            Phase::Results {
                coach: Some(panel), ..
            } => assert_eq!(
                panel.narrative,
                NarrativeState::Ready(sample_narrative(Category::Mercy))
            ),
            other => panic!("expected Coach, got {other:?}"),
        }
    }

    #[test]
    fn test_apply_narrative_after_back_is_discarded() {
        // Arrange
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 4);
        let ticket = assessment.select_category(Category::Mercy, &clock()).unwrap();
        assessment.back_to_results(&clock()).unwrap();
        let version = assessment.version();

        // Act
        let applied = assessment.apply_narrative(&ticket, sample_narrative(Category::Mercy), &clock());

        // Assert
        assert!(!applied);
        assert_eq!(assessment.phase().name(), "results");
        assert_eq!(assessment.version(), version);
    }

    #[test]
    fn test_apply_narrative_from_previous_visit_is_discarded() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 4);
        let stale = assessment.select_category(Category::Mercy, &clock()).unwrap();
        assessment.back_to_results(&clock()).unwrap();
        let fresh = assessment.select_category(Category::Mercy, &clock()).unwrap();

        assert!(!assessment.apply_narrative(&stale, sample_narrative(Category::Mercy), &clock()));
        assert!(assessment.apply_narrative(&fresh, sample_narrative(Category::Mercy), &clock()));
        assert_eq!(fresh.generation, 2);
    }

    #[test]
    fn test_back_to_results_without_coach_is_rejected() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 4);

        assert!(matches!(
            assessment.back_to_results(&clock()),
            Err(DomainError::InvalidTransition { view: "results", .. })
        ));
    }

    #[test]
    fn test_retake_resets_to_landing_with_empty_answers() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 2);

        assessment.retake(&clock()).unwrap();

        assert_eq!(assessment.phase(), &Phase::Landing);
        assert!(assessment.answers().is_empty());
        assert_eq!(assessment.paginator().current_page(), 0);
    }

    #[test]
    fn test_retake_from_coach_is_rejected() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        finish_quiz(&mut assessment, &catalog, 2);
        assessment.select_category(Category::Giving, &clock()).unwrap();

        assert!(matches!(
            assessment.retake(&clock()),
            Err(DomainError::InvalidTransition { action: "retake", .. })
        ));
    }

    #[test]
    fn test_start_outside_landing_is_rejected() {
        let catalog = Catalog::shipped().unwrap();
        let mut assessment = new_assessment(&catalog);
        assessment.start(&clock()).unwrap();

        assert!(matches!(
            assessment.start(&clock()),
            Err(DomainError::InvalidTransition { view: "quiz", .. })
        ));
    }
}
