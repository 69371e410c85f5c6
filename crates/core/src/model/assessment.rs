use thiserror::Error;

use crate::model::ids::{ChoiceId, LessonId, QuestionId, TestId};

//
// ─── QUESTIONS ─────────────────────────────────────────────────────────────────
//

/// How a question is answered and graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Single,
    Multiple,
    TrueFalse,
    Short,
    Long,
    Code,
}

impl QuestionKind {
    /// Choice-based kinds carry a selection; the rest carry free text.
    #[must_use]
    pub fn is_choice_based(&self) -> bool {
        matches!(self, Self::Single | Self::Multiple | Self::TrueFalse)
    }
}

/// One selectable option of a choice-based question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub id: ChoiceId,
    pub text: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("choice-based question {id} has no choices")]
    MissingChoices { id: QuestionId },
}

/// One gradable or free-response item of a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub kind: QuestionKind,
    pub choices: Vec<Choice>,
}

impl Question {
    /// Build a question, enforcing that choice-based kinds carry at least one
    /// choice.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingChoices` for a choice-based kind with an
    /// empty choice list.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        kind: QuestionKind,
        choices: Vec<Choice>,
    ) -> Result<Self, QuestionError> {
        if kind.is_choice_based() && choices.is_empty() {
            return Err(QuestionError::MissingChoices { id });
        }
        Ok(Self {
            id,
            text: text.into(),
            kind,
            choices,
        })
    }
}

//
// ─── TEST ──────────────────────────────────────────────────────────────────────
//

/// A gradable assessment tied to exactly one lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub id: TestId,
    pub lesson_id: LessonId,
    pub title: String,
    pub description: Option<String>,
    /// `None` means untimed.
    pub time_limit_seconds: Option<u32>,
    pub pass_mark_percent: Option<u8>,
    pub questions: Vec<Question>,
}

impl Test {
    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }
}

//
// ─── ANSWERS ───────────────────────────────────────────────────────────────────
//

/// A student's locally held answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// Scalar selection for single-choice and true/false questions.
    Selected(ChoiceId),
    /// Toggleable selection set for multiple-choice questions; insertion
    /// order is kept for the wire but membership is what matters.
    SelectedMany(Vec<ChoiceId>),
    /// Free text for short/long/code questions.
    Text(String),
}

impl AnswerValue {
    /// Whether this value counts as "answered": a selection list only when
    /// non-empty, everything else when its string form is non-empty.
    #[must_use]
    pub fn is_answered(&self) -> bool {
        match self {
            Self::SelectedMany(ids) => !ids.is_empty(),
            Self::Text(text) => !text.is_empty(),
            Self::Selected(_) => true,
        }
    }
}

//
// ─── GRADING ───────────────────────────────────────────────────────────────────
//

/// Server-reported grading detail for one question, available only after
/// submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerBreakdown {
    pub question_id: QuestionId,
    /// Absent for ungraded free-text answers.
    pub is_correct: Option<bool>,
    pub correct_choice_ids: Vec<ChoiceId>,
    pub selected_choice_ids: Vec<ChoiceId>,
    /// Reference answer for free-text questions.
    pub reference_text: Option<String>,
}

/// Final outcome of a graded attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub score: u32,
    pub max_score: u32,
    pub percent: f64,
    pub passed: bool,
    pub breakdown: Vec<AnswerBreakdown>,
}

impl TestResult {
    /// Compute the result from a raw score. Percent is 0 when `max_score` is
    /// 0; the pass mark is boundary-inclusive and defaults to passing when
    /// the test declares none.
    #[must_use]
    pub fn from_score(
        score: u32,
        max_score: u32,
        pass_mark_percent: Option<u8>,
        breakdown: Vec<AnswerBreakdown>,
    ) -> Self {
        let percent = if max_score == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(max_score) * 100.0
        };
        let passed = match pass_mark_percent {
            Some(mark) => percent >= f64::from(mark),
            None => true,
        };
        Self {
            score,
            max_score,
            percent,
            passed,
            breakdown,
        }
    }

    /// Zeroed, failed result used when submission itself fails, so the flow
    /// still terminates in a result.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            score: 0,
            max_score: 0,
            percent: 0.0,
            passed: false,
            breakdown: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_kinds_require_choices() {
        let err = Question::new(QuestionId::new(1), "Q", QuestionKind::Single, Vec::new())
            .unwrap_err();
        assert!(matches!(err, QuestionError::MissingChoices { .. }));

        let q = Question::new(QuestionId::new(2), "Q", QuestionKind::Short, Vec::new());
        assert!(q.is_ok());
    }

    #[test]
    fn pass_mark_is_boundary_inclusive() {
        let result = TestResult::from_score(3, 5, Some(60), Vec::new());
        assert_eq!(result.percent, 60.0);
        assert!(result.passed);
    }

    #[test]
    fn zero_max_score_gives_zero_percent() {
        let result = TestResult::from_score(0, 0, Some(50), Vec::new());
        assert_eq!(result.percent, 0.0);
        assert!(!result.passed);
    }

    #[test]
    fn empty_multiple_selection_is_unanswered() {
        assert!(!AnswerValue::SelectedMany(Vec::new()).is_answered());
        assert!(AnswerValue::SelectedMany(vec![ChoiceId::new(3)]).is_answered());
        assert!(!AnswerValue::Text(String::new()).is_answered());
        assert!(AnswerValue::Text("text".into()).is_answered());
        assert!(AnswerValue::Selected(ChoiceId::new(1)).is_answered());
    }
}
