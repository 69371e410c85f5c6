use super::engine::AttemptEngine;

/// Aggregated answer progress for the attempt header, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptProgress {
    pub total: usize,
    pub answered: usize,
    pub percent: u8,
}

impl AttemptProgress {
    #[must_use]
    pub fn of(engine: &AttemptEngine) -> Self {
        let total = engine.test().total_questions();
        let answered = engine.answered_count();
        let percent = if total == 0 {
            0
        } else {
            (answered as f64 / total as f64 * 100.0).round() as u8
        };
        Self {
            total,
            answered,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::engine::AnswerEvent;
    use super::*;
    use brainboost_core::model::{
        Choice, ChoiceId, LessonId, Question, QuestionId, QuestionKind, Test, TestId,
    };
    use brainboost_core::time::fixed_now;

    fn engine_with_questions(count: u64) -> AttemptEngine {
        let questions = (1..=count)
            .map(|id| {
                Question::new(
                    QuestionId::new(id),
                    "Q",
                    QuestionKind::Single,
                    vec![Choice {
                        id: ChoiceId::new(1),
                        text: "a".into(),
                    }],
                )
                .unwrap()
            })
            .collect();
        let test = Test {
            id: TestId::new(1),
            lesson_id: LessonId::new(1),
            title: "T".into(),
            description: None,
            time_limit_seconds: None,
            pass_mark_percent: None,
            questions,
        };
        AttemptEngine::new(test, fixed_now())
    }

    #[test]
    fn percent_rounds_answered_share() {
        let mut engine = engine_with_questions(3);
        engine.set_answer(QuestionId::new(1), AnswerEvent::Choose(ChoiceId::new(1)));

        let progress = AttemptProgress::of(&engine);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 1);
        assert_eq!(progress.percent, 33);
    }

    #[test]
    fn empty_test_reports_zero_percent() {
        let engine = engine_with_questions(0);
        let progress = AttemptProgress::of(&engine);
        assert_eq!(progress.percent, 0);
    }
}
