use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("a question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("answer {answer:?} is not one of the options")]
    AnswerNotAnOption { answer: String },
}

/// Smallest option list that still makes a multiple-choice question.
pub const MIN_OPTIONS: usize = 2;

/// A multiple-choice question. The answer is always one of the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord")]
pub struct Question {
    question: String,
    options: Vec<String>,
    answer: String,
}

/// Unchecked wire shape, validated into a `Question` on deserialization.
#[derive(Deserialize)]
struct QuestionRecord {
    question: String,
    options: Vec<String>,
    answer: String,
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Question::new(record.question, record.options, record.answer)
    }
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError` if the text is blank, there are fewer than
    /// `MIN_OPTIONS` options, or the answer is not among the options.
    pub fn new<S: Into<String>>(
        question: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        let options: Vec<String> = options.into_iter().map(Into::into).collect();
        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        let answer = answer.into();
        if !options.contains(&answer) {
            return Err(QuestionError::AnswerNotAnOption { answer });
        }
        Ok(Self {
            question,
            options,
            answer,
        })
    }

    /// Returns the question text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.question
    }

    /// Returns the options in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Returns the correct option.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns true if `option` is one of the offered options.
    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Returns true if `selected` is the correct option.
    #[must_use]
    pub fn is_correct(&self, selected: &str) -> bool {
        self.answer == selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_must_be_an_option() {
        let err = Question::new("2 + 2?", ["3", "5"], "4").unwrap_err();
        assert_eq!(
            err,
            QuestionError::AnswerNotAnOption {
                answer: "4".into()
            }
        );
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new("Pick", ["only"], "only").unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { len: 1 });
    }

    #[test]
    fn rejects_blank_text() {
        let err = Question::new("  ", ["a", "b"], "a").unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);
    }

    #[test]
    fn deserialization_enforces_answer_invariant() {
        let bad = r#"{"question":"Q","options":["a","b"],"answer":"c"}"#;
        assert!(serde_json::from_str::<Question>(bad).is_err());

        let good = r#"{"question":"Q","options":["a","b"],"answer":"b"}"#;
        let q: Question = serde_json::from_str(good).unwrap();
        assert_eq!(q.answer(), "b");
        assert!(q.has_option("a"));
        assert!(!q.is_correct("a"));
    }
}
