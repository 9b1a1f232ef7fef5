//! Interactive exercises: quiz, scenario deck and comparison slider
//!
//! Scoring is a plain equality check against the static answer key.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::content::{
    Approach, COMPARISON, ComparisonColumn, QUIZ, QuizQuestion, SCENARIOS, Scenario,
};

/// Quiz submission rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Please answer all questions! ({answered} of {total} answered)")]
    Incomplete { answered: usize, total: usize },
}

/// Closing message after submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    Perfect,
    GoodEffort,
}

impl Verdict {
    pub fn message(&self) -> &'static str {
        match self {
            Verdict::Perfect => "Perfect! You're a Data Engineering Pro.",
            Verdict::GoodEffort => "Good effort! Review the tabs to master the concepts.",
        }
    }
}

/// How an option button is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionMark {
    /// Before submission
    Selected,
    Unselected,
    /// After submission
    Correct,
    Wrong,
    Neutral,
}

/// Answers for one attempt at the quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: &'static [QuizQuestion],
    /// Question ID -> chosen option index
    answers: BTreeMap<u32, usize>,
    submitted: bool,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self::with_questions(&QUIZ)
    }

    pub fn with_questions(questions: &'static [QuizQuestion]) -> Self {
        Self {
            questions,
            answers: BTreeMap::new(),
            submitted: false,
        }
    }

    pub fn questions(&self) -> &'static [QuizQuestion] {
        self.questions
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn answer(&self, question_id: u32) -> Option<usize> {
        self.answers.get(&question_id).copied()
    }

    pub fn answered(&self) -> usize {
        self.answers.len()
    }

    /// Record an answer. Ignored after submission or for unknown questions/options.
    pub fn select(&mut self, question_id: u32, option: usize) -> bool {
        if self.submitted {
            return false;
        }
        let Some(question) = self.questions.iter().find(|q| q.id == question_id) else {
            return false;
        };
        if option >= question.options.len() {
            return false;
        }
        self.answers.insert(question_id, option);
        true
    }

    /// Number of recorded answers matching the key
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answer(q.id) == Some(q.correct_index))
            .count()
    }

    /// Lock in the answers. Every question must be answered first.
    pub fn submit(&mut self) -> Result<usize, QuizError> {
        let total = self.questions.len();
        if self.answers.len() < total {
            let err = QuizError::Incomplete {
                answered: self.answers.len(),
                total,
            };
            log::warn!("Quiz submission rejected: {}", err);
            return Err(err);
        }
        self.submitted = true;
        let score = self.score();
        log::info!("Quiz submitted: {} / {}", score, total);
        Ok(score)
    }

    pub fn verdict(&self) -> Option<Verdict> {
        if !self.submitted {
            return None;
        }
        Some(if self.score() == self.questions.len() {
            Verdict::Perfect
        } else {
            Verdict::GoodEffort
        })
    }

    pub fn option_mark(&self, question: &QuizQuestion, option: usize) -> OptionMark {
        let selected = self.answer(question.id) == Some(option);
        match (self.submitted, selected) {
            (true, _) if option == question.correct_index => OptionMark::Correct,
            (true, true) => OptionMark::Wrong,
            (true, false) => OptionMark::Neutral,
            (false, true) => OptionMark::Selected,
            (false, false) => OptionMark::Unselected,
        }
    }

    /// "Try Again"
    pub fn reset(&mut self) {
        self.answers.clear();
        self.submitted = false;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// Walks through the use-case scenarios one at a time, looping at the end
#[derive(Debug, Clone, Default)]
pub struct ScenarioDeck {
    index: usize,
    feedback: Option<Feedback>,
}

impl ScenarioDeck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &'static Scenario {
        &SCENARIOS[self.index % SCENARIOS.len()]
    }

    /// 1-based position and total, for "Scenario 2 of 4"
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, SCENARIOS.len())
    }

    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// Answer the current scenario. A second choice keeps the first feedback.
    pub fn choose(&mut self, choice: Approach) -> Feedback {
        if let Some(feedback) = self.feedback {
            return feedback;
        }
        let feedback = if choice == self.current().correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect
        };
        self.feedback = Some(feedback);
        feedback
    }

    pub fn next(&mut self) {
        self.feedback = None;
        self.index = (self.index + 1) % SCENARIOS.len();
    }
}

/// The "Historical / Efficiency" vs "Real-Time / Speed" slider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonSlider {
    value: u8,
}

impl Default for ComparisonSlider {
    fn default() -> Self {
        Self { value: 50 }
    }
}

impl ComparisonSlider {
    pub const MAX: u8 = 100;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn set(&mut self, value: i64) {
        self.value = value.clamp(0, i64::from(Self::MAX)) as u8;
    }

    /// Which side of the table is highlighted
    pub fn leaning(&self) -> Approach {
        if self.value < 50 {
            Approach::Batch
        } else {
            Approach::Stream
        }
    }

    pub fn highlighted(&self) -> &'static ComparisonColumn {
        let leaning = self.leaning();
        COMPARISON
            .iter()
            .find(|c| c.approach == leaning)
            .unwrap_or(&COMPARISON[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_incomplete_submit_rejected() {
        let mut quiz = QuizSession::new();
        quiz.select(1, 1);
        quiz.select(2, 0);
        assert_eq!(
            quiz.submit(),
            Err(QuizError::Incomplete {
                answered: 2,
                total: 3
            })
        );
        assert!(!quiz.is_submitted());
        assert_eq!(quiz.answer(1), Some(1));
        assert!(quiz.verdict().is_none());
    }

    #[test]
    fn test_perfect_score() {
        let mut quiz = QuizSession::new();
        for q in quiz.questions() {
            assert!(quiz.select(q.id, q.correct_index));
        }
        assert_eq!(quiz.submit(), Ok(3));
        assert_eq!(quiz.verdict(), Some(Verdict::Perfect));
    }

    #[test]
    fn test_all_wrong() {
        let mut quiz = QuizSession::new();
        quiz.select(1, 0);
        quiz.select(2, 2);
        quiz.select(3, 0);
        assert_eq!(quiz.submit(), Ok(0));
        assert_eq!(quiz.verdict(), Some(Verdict::GoodEffort));
    }

    #[test]
    fn test_select_rules() {
        let mut quiz = QuizSession::new();
        assert!(!quiz.select(99, 0));
        assert!(!quiz.select(1, 2));
        assert!(quiz.select(1, 0));
        assert!(quiz.select(1, 1));
        assert_eq!(quiz.answered(), 1);

        quiz.select(2, 1);
        quiz.select(3, 1);
        quiz.submit().ok();
        assert!(!quiz.select(1, 0));
        assert_eq!(quiz.answer(1), Some(1));

        quiz.reset();
        assert!(!quiz.is_submitted());
        assert_eq!(quiz.answered(), 0);
    }

    #[test]
    fn test_option_marks() {
        let mut quiz = QuizSession::new();
        let q = &QUIZ[1];
        quiz.select(q.id, 0);
        assert_eq!(quiz.option_mark(q, 0), OptionMark::Selected);
        assert_eq!(quiz.option_mark(q, 1), OptionMark::Unselected);

        quiz.select(1, 1);
        quiz.select(3, 1);
        quiz.submit().ok();
        assert_eq!(quiz.option_mark(q, 0), OptionMark::Wrong);
        assert_eq!(quiz.option_mark(q, 1), OptionMark::Correct);
        assert_eq!(quiz.option_mark(q, 2), OptionMark::Neutral);
    }

    #[test]
    fn test_scenario_deck_loops() {
        let mut deck = ScenarioDeck::new();
        assert_eq!(deck.position(), (1, 4));
        assert_eq!(deck.choose(Approach::Batch), Feedback::Correct);
        // Changing your mind doesn't change the result
        assert_eq!(deck.choose(Approach::Stream), Feedback::Correct);

        deck.next();
        assert!(deck.feedback().is_none());
        assert_eq!(deck.choose(Approach::Batch), Feedback::Incorrect);

        deck.next();
        deck.next();
        deck.next();
        assert_eq!(deck.position(), (1, 4));
        assert_eq!(deck.current().id, 1);
    }

    #[test]
    fn test_slider() {
        let mut slider = ComparisonSlider::new();
        assert_eq!(slider.leaning(), Approach::Stream);
        slider.set(49);
        assert_eq!(slider.leaning(), Approach::Batch);
        assert_eq!(slider.highlighted().latency, "Hours / Days");
        slider.set(-20);
        assert_eq!(slider.value(), 0);
        slider.set(1_000);
        assert_eq!(slider.value(), 100);
        assert_eq!(slider.highlighted().trigger, "Event (Arrival)");
    }

    proptest! {
        #[test]
        fn prop_score_counts_matches(choices in prop::collection::vec(0usize..3, 3)) {
            let mut quiz = QuizSession::new();
            let mut expected = 0;
            for (q, &choice) in QUIZ.iter().zip(&choices) {
                let choice = choice % q.options.len();
                quiz.select(q.id, choice);
                if choice == q.correct_index {
                    expected += 1;
                }
            }
            prop_assert_eq!(quiz.submit(), Ok(expected));
        }
    }
}
