use chrono::{DateTime, Utc};
use std::collections::HashMap;

use brainboost_core::model::{
    AnswerValue, AttemptId, ChoiceId, QuestionId, QuestionKind, Test, TestId, TestResult,
};

use api::{AnswerPayload, SubmitOutcome};

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Lifecycle phase of an attempt session. Loading and load-failure live in
/// the workflow (an engine only exists once the test definition arrived);
/// `Submitting` is the brief window between the submit latch firing and the
/// server's verdict landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    Active,
    Submitting,
    Result,
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Untimed test, or the session is no longer counting down.
    Idle,
    /// Timer still running; carries the remaining seconds.
    Running(u32),
    /// The timer just hit zero. Reported exactly once; the caller must
    /// trigger an auto-submit.
    Elapsed,
}

/// Student input for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerEvent {
    /// Toggle (multiple) or replace (single/true-false) a choice.
    Choose(ChoiceId),
    /// Replace the free-text answer.
    Text(String),
}

/// Everything needed to fire the submit network call. Produced at most once
/// per engine by [`AttemptEngine::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub test_id: TestId,
    pub attempt_id: AttemptId,
    pub answers: Vec<AnswerPayload>,
    pub auto: bool,
}

//
// ─── ENGINE ────────────────────────────────────────────────────────────────────
//

/// State machine for one test-taking session: answer collection, the
/// optional countdown, the single-flight submit latch, and the graded
/// result. All state is owned by the single page-level controller; nothing
/// here touches the network.
#[derive(Debug, Clone)]
pub struct AttemptEngine {
    test: Test,
    attempt_id: Option<AttemptId>,
    answers: HashMap<QuestionId, AnswerValue>,
    time_left: Option<u32>,
    timer_elapsed: bool,
    submit_started: bool,
    result: Option<TestResult>,
    error_message: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl AttemptEngine {
    /// Create an engine for a fetched test. The countdown arms from the
    /// test's time limit; the attempt id arrives separately once the start
    /// call succeeds.
    #[must_use]
    pub fn new(test: Test, started_at: DateTime<Utc>) -> Self {
        let time_left = test.time_limit_seconds;
        Self {
            test,
            attempt_id: None,
            answers: HashMap::new(),
            time_left,
            timer_elapsed: false,
            submit_started: false,
            result: None,
            error_message: None,
            started_at,
            completed_at: None,
        }
    }

    pub fn attach_attempt(&mut self, attempt_id: AttemptId) {
        self.attempt_id = Some(attempt_id);
    }

    #[must_use]
    pub fn test(&self) -> &Test {
        &self.test
    }

    #[must_use]
    pub fn attempt_id(&self) -> Option<AttemptId> {
        self.attempt_id
    }

    #[must_use]
    pub fn phase(&self) -> AttemptPhase {
        if self.result.is_some() {
            AttemptPhase::Result
        } else if self.submit_started {
            AttemptPhase::Submitting
        } else {
            AttemptPhase::Active
        }
    }

    #[must_use]
    pub fn time_left(&self) -> Option<u32> {
        self.time_left
    }

    #[must_use]
    pub fn result(&self) -> Option<&TestResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn answer(&self, question_id: QuestionId) -> Option<&AnswerValue> {
        self.answers.get(&question_id)
    }

    /// Answers are mutable only while active and before the timer hit zero.
    #[must_use]
    pub fn is_mutable(&self) -> bool {
        self.result.is_none() && !self.submit_started && !self.timer_elapsed
    }

    /// Record student input for a question. Silently ignored (not an error)
    /// when the session is no longer mutable, the question is unknown, or
    /// the event does not fit the question's kind:
    /// - `Multiple` questions toggle the chosen id's membership;
    /// - `Single`/`TrueFalse` replace the scalar selection;
    /// - free-text kinds replace the string.
    pub fn set_answer(&mut self, question_id: QuestionId, event: AnswerEvent) {
        if !self.is_mutable() {
            return;
        }
        let Some(question) = self.test.question(question_id) else {
            return;
        };
        match (question.kind, event) {
            (QuestionKind::Multiple, AnswerEvent::Choose(choice)) => {
                let entry = self
                    .answers
                    .entry(question_id)
                    .or_insert_with(|| AnswerValue::SelectedMany(Vec::new()));
                if let AnswerValue::SelectedMany(ids) = entry {
                    if let Some(pos) = ids.iter().position(|id| *id == choice) {
                        ids.remove(pos);
                    } else {
                        ids.push(choice);
                    }
                } else {
                    *entry = AnswerValue::SelectedMany(vec![choice]);
                }
            }
            (QuestionKind::Single | QuestionKind::TrueFalse, AnswerEvent::Choose(choice)) => {
                self.answers.insert(question_id, AnswerValue::Selected(choice));
            }
            (QuestionKind::Short | QuestionKind::Long | QuestionKind::Code, AnswerEvent::Text(text)) => {
                self.answers.insert(question_id, AnswerValue::Text(text));
            }
            _ => {}
        }
    }

    /// Drop every collected answer. Available only while the session is
    /// still mutable.
    pub fn clear_answers(&mut self) {
        if self.is_mutable() {
            self.answers.clear();
        }
    }

    /// Number of answered questions: a `Multiple` question counts only when
    /// its selection list is non-empty, everything else when its stored
    /// value coerces to a non-empty string.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.test
            .questions
            .iter()
            .filter(|q| {
                self.answers
                    .get(&q.id)
                    .is_some_and(AnswerValue::is_answered)
            })
            .count()
    }

    /// Advance the 1-second countdown. `Elapsed` is reported exactly once;
    /// after that (and for untimed tests, or once a submit started) ticks
    /// are `Idle`.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_mutable() {
            return TickOutcome::Idle;
        }
        let Some(remaining) = self.time_left.as_mut() else {
            return TickOutcome::Idle;
        };
        *remaining = remaining.saturating_sub(1);
        if *remaining == 0 {
            self.timer_elapsed = true;
            TickOutcome::Elapsed
        } else {
            TickOutcome::Running(*remaining)
        }
    }

    /// Claim the right to submit. The latch makes the server call
    /// single-flight: whichever of the timer callback and a manual click
    /// gets here second receives `None`, as does a submit before the
    /// attempt id exists or after a result landed.
    #[must_use]
    pub fn begin_submit(&mut self, auto: bool) -> Option<SubmitTicket> {
        if self.submit_started || self.result.is_some() {
            return None;
        }
        let attempt_id = self.attempt_id?;
        self.submit_started = true;
        self.time_left = None;
        let answers = self
            .test
            .questions
            .iter()
            .map(|q| AnswerPayload::from_answer(q, self.answers.get(&q.id)))
            .collect();
        Some(SubmitTicket {
            test_id: self.test.id,
            attempt_id,
            answers,
            auto,
        })
    }

    /// Record the server's grading verdict; the session becomes immutable.
    pub fn complete_submit(&mut self, outcome: SubmitOutcome, completed_at: DateTime<Utc>) {
        self.result = Some(TestResult::from_score(
            outcome.score,
            outcome.max_score,
            self.test.pass_mark_percent,
            outcome.breakdown,
        ));
        self.completed_at = Some(completed_at);
    }

    /// Record a submit failure. A zeroed, failed result still lands so the
    /// flow terminates instead of hanging in `Submitting`.
    pub fn fail_submit(&mut self, message: String, completed_at: DateTime<Utc>) {
        self.error_message = Some(message);
        self.result = Some(TestResult::failed());
        self.completed_at = Some(completed_at);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use brainboost_core::model::{Choice, LessonId, Question};
    use brainboost_core::time::fixed_now;

    fn choices() -> Vec<Choice> {
        (1..=4)
            .map(|id| Choice {
                id: ChoiceId::new(id),
                text: format!("choice {id}"),
            })
            .collect()
    }

    fn question(id: u64, kind: QuestionKind) -> Question {
        let choices = if kind.is_choice_based() { choices() } else { Vec::new() };
        Question::new(QuestionId::new(id), "Q", kind, choices).unwrap()
    }

    fn test_with(questions: Vec<Question>, time_limit: Option<u32>) -> Test {
        Test {
            id: TestId::new(1),
            lesson_id: LessonId::new(1),
            title: "Test".into(),
            description: None,
            time_limit_seconds: time_limit,
            pass_mark_percent: Some(60),
            questions,
        }
    }

    fn armed_engine(questions: Vec<Question>, time_limit: Option<u32>) -> AttemptEngine {
        let mut engine = AttemptEngine::new(test_with(questions, time_limit), fixed_now());
        engine.attach_attempt(AttemptId::new(100));
        engine
    }

    #[test]
    fn multiple_choice_toggles_membership() {
        let mut engine = armed_engine(vec![question(1, QuestionKind::Multiple)], None);
        let q = QuestionId::new(1);

        engine.set_answer(q, AnswerEvent::Choose(ChoiceId::new(2)));
        engine.set_answer(q, AnswerEvent::Choose(ChoiceId::new(3)));
        assert_eq!(
            engine.answer(q),
            Some(&AnswerValue::SelectedMany(vec![
                ChoiceId::new(2),
                ChoiceId::new(3)
            ]))
        );

        engine.set_answer(q, AnswerEvent::Choose(ChoiceId::new(2)));
        assert_eq!(
            engine.answer(q),
            Some(&AnswerValue::SelectedMany(vec![ChoiceId::new(3)]))
        );
    }

    #[test]
    fn single_choice_replaces_selection() {
        let mut engine = armed_engine(vec![question(1, QuestionKind::Single)], None);
        let q = QuestionId::new(1);

        engine.set_answer(q, AnswerEvent::Choose(ChoiceId::new(1)));
        engine.set_answer(q, AnswerEvent::Choose(ChoiceId::new(4)));
        assert_eq!(engine.answer(q), Some(&AnswerValue::Selected(ChoiceId::new(4))));
    }

    #[test]
    fn answered_count_ignores_empty_selections() {
        let mut engine = armed_engine(
            vec![
                question(1, QuestionKind::Multiple),
                question(2, QuestionKind::Multiple),
                question(3, QuestionKind::Short),
            ],
            None,
        );

        // q1 toggled on and back off leaves an empty selection list.
        engine.set_answer(QuestionId::new(1), AnswerEvent::Choose(ChoiceId::new(2)));
        engine.set_answer(QuestionId::new(1), AnswerEvent::Choose(ChoiceId::new(2)));
        engine.set_answer(QuestionId::new(2), AnswerEvent::Choose(ChoiceId::new(3)));
        engine.set_answer(QuestionId::new(3), AnswerEvent::Text("text".into()));

        assert_eq!(engine.answered_count(), 2);
    }

    #[test]
    fn countdown_elapses_exactly_once() {
        let mut engine = armed_engine(vec![question(1, QuestionKind::Single)], Some(3));

        assert_eq!(engine.tick(), TickOutcome::Running(2));
        assert_eq!(engine.tick(), TickOutcome::Running(1));
        assert_eq!(engine.tick(), TickOutcome::Elapsed);
        assert_eq!(engine.tick(), TickOutcome::Idle);
        assert!(!engine.is_mutable());
    }

    #[test]
    fn answers_frozen_after_timer_elapses() {
        let mut engine = armed_engine(vec![question(1, QuestionKind::Single)], Some(1));
        assert_eq!(engine.tick(), TickOutcome::Elapsed);

        engine.set_answer(QuestionId::new(1), AnswerEvent::Choose(ChoiceId::new(1)));
        assert_eq!(engine.answer(QuestionId::new(1)), None);
    }

    #[test]
    fn submit_latch_is_single_flight() {
        let mut engine = armed_engine(vec![question(1, QuestionKind::Single)], None);

        let first = engine.begin_submit(true);
        let second = engine.begin_submit(false);
        assert!(first.is_some());
        assert!(second.is_none());
        assert_eq!(engine.phase(), AttemptPhase::Submitting);
    }

    #[test]
    fn submit_without_attempt_id_is_a_no_op() {
        let mut engine = AttemptEngine::new(
            test_with(vec![question(1, QuestionKind::Single)], None),
            fixed_now(),
        );
        assert!(engine.begin_submit(false).is_none());
        // The latch must not have been consumed by the failed claim.
        engine.attach_attempt(AttemptId::new(1));
        assert!(engine.begin_submit(false).is_some());
    }

    #[test]
    fn failed_submit_still_terminates_with_a_result() {
        let mut engine = armed_engine(vec![question(1, QuestionKind::Single)], None);
        let _ = engine.begin_submit(false).unwrap();
        engine.fail_submit("boom".into(), fixed_now());

        assert_eq!(engine.phase(), AttemptPhase::Result);
        let result = engine.result().unwrap();
        assert_eq!(result.score, 0);
        assert!(!result.passed);
        assert_eq!(engine.error_message(), Some("boom"));
    }

    #[test]
    fn clear_answers_only_while_active() {
        let mut engine = armed_engine(vec![question(1, QuestionKind::Single)], None);
        engine.set_answer(QuestionId::new(1), AnswerEvent::Choose(ChoiceId::new(1)));
        let _ = engine.begin_submit(false);

        engine.clear_answers();
        assert!(engine.answer(QuestionId::new(1)).is_some());
    }
}
