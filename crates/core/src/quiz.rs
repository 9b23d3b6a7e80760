//! Quiz scoring.
//!
//! Answers are keyed by question index. A missing index is an unanswered
//! question and scores nothing, as does a wrong option.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use crate::model::Question;

/// Countdown given to every quiz run unless configured otherwise.
pub const DEFAULT_QUIZ_DURATION: Duration = Duration::from_secs(300);

/// Selected option per question index.
pub type Answers = BTreeMap<usize, String>;

/// Number of questions whose submitted option equals the answer.
#[must_use]
pub fn score(questions: &[Question], answers: &Answers) -> usize {
    questions
        .iter()
        .enumerate()
        .filter(|(idx, q)| answers.get(idx).is_some_and(|sel| q.is_correct(sel)))
        .count()
}

/// Correct answers out of the total number of questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl QuizScore {
    #[must_use]
    pub fn grade(questions: &[Question], answers: &Answers) -> Self {
        Self {
            correct: score(questions, answers),
            total: questions.len(),
        }
    }

    /// Every question answered correctly.
    #[must_use]
    pub fn is_perfect(&self) -> bool {
        self.correct == self.total
    }
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.correct, self.total)
    }
}
