use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use thiserror::Error;

use brainboost_core::model::{
    AnswerBreakdown, AnswerValue, AttemptId, Course, CourseId, Lesson, LessonId, ProgressRecord,
    Question, Section, Test, TestId,
};

/// Errors surfaced by the remote API layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// HTTP 404: the resource does not exist or is not yet published.
    #[error("not found")]
    NotFound,

    /// HTTP 403: access window or permissions.
    #[error("forbidden")]
    Forbidden,

    /// HTTP 401: missing or expired credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Any other non-2xx status, with whatever body text came back.
    #[error("unexpected status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map an HTTP status code onto the error taxonomy.
    #[must_use]
    pub fn from_status(code: u16, body: String) -> Self {
        match code {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::Status { code, body },
        }
    }
}

//
// ─── SUBMIT WIRE SHAPES ────────────────────────────────────────────────────────
//

/// Selection part of an answer payload: a scalar for single/true-false, a
/// list for multiple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedChoices {
    One(u64),
    Many(Vec<u64>),
}

/// Per-question submit payload. Serializes to the heterogeneous shapes the
/// submit endpoint expects: `{question, text}` for free-text kinds,
/// `{question, selected: [..]}` for multiple, `{question, selected: n}` for
/// an answered single/true-false, bare `{question}` when nothing was
/// selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub question: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<SelectedChoices>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl AnswerPayload {
    /// Build the payload for one question from the locally held answer, if
    /// any.
    #[must_use]
    pub fn from_answer(question: &Question, value: Option<&AnswerValue>) -> Self {
        let question_id = question.id.value();
        if question.kind.is_choice_based() {
            let selected = match value {
                Some(AnswerValue::Selected(id)) => Some(SelectedChoices::One(id.value())),
                Some(AnswerValue::SelectedMany(ids)) => Some(SelectedChoices::Many(
                    ids.iter().map(|id| id.value()).collect(),
                )),
                _ => None,
            };
            Self {
                question: question_id,
                selected,
                text: None,
            }
        } else {
            let text = match value {
                Some(AnswerValue::Text(text)) => text.clone(),
                _ => String::new(),
            };
            Self {
                question: question_id,
                selected: None,
                text: Some(text),
            }
        }
    }
}

/// What the submit endpoint reports back.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub score: u32,
    pub max_score: u32,
    pub breakdown: Vec<AnswerBreakdown>,
}

//
// ─── REPOSITORY CONTRACTS ──────────────────────────────────────────────────────
//

/// Course catalog and structure endpoints.
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Fetch a course header.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if missing, or other transport errors.
    async fn fetch_course(&self, id: CourseId) -> Result<Course, ApiError>;

    /// List the lessons of a course, with section references embedded.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decode failure.
    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, ApiError>;

    /// List the explicit modules of a course. May legitimately be empty.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decode failure.
    async fn list_modules(&self, course_id: CourseId) -> Result<Vec<Section>, ApiError>;
}

/// Per-lesson progress endpoints.
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Fetch the progress record for one lesson.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport or decode failure; callers refreshing
    /// a whole course treat this per-lesson and fail-soft.
    async fn get_progress(&self, lesson_id: LessonId) -> Result<ProgressRecord, ApiError>;

    /// Write a progress record back. Fire-and-forget at the call sites.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure.
    async fn update_progress(
        &self,
        lesson_id: LessonId,
        record: ProgressRecord,
    ) -> Result<(), ApiError>;
}

/// Test definition and attempt endpoints.
#[async_trait]
pub trait TestRepository: Send + Sync {
    /// Fetch the test attached to a lesson.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` when the lesson has no published test.
    async fn get_test_for_lesson(&self, lesson_id: LessonId) -> Result<Test, ApiError>;

    /// Open a server-side attempt for a test.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or rejection.
    async fn start_attempt(&self, test_id: TestId) -> Result<AttemptId, ApiError>;

    /// Submit the collected answers for grading.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport failure or rejection.
    async fn submit_attempt(
        &self,
        test_id: TestId,
        attempt_id: AttemptId,
        answers: &[AnswerPayload],
    ) -> Result<SubmitOutcome, ApiError>;
}

//
// ─── IN-MEMORY DOUBLE ──────────────────────────────────────────────────────────
//

#[derive(Debug, Default)]
struct InMemoryState {
    courses: HashMap<CourseId, Course>,
    lessons: HashMap<CourseId, Vec<Lesson>>,
    modules: HashMap<CourseId, Vec<Section>>,
    progress: HashMap<LessonId, ProgressRecord>,
    failing_progress: HashSet<LessonId>,
    tests: HashMap<LessonId, Test>,
    next_attempt_id: u64,
    started_attempts: Vec<(TestId, AttemptId)>,
    submits: Vec<(TestId, AttemptId, Vec<AnswerPayload>)>,
    submit_score: (u32, u32),
    fail_submit: bool,
    progress_updates: Vec<(LessonId, ProgressRecord)>,
}

/// Scripted in-memory stand-in for the remote API, shared by services tests.
/// Records every attempt-start, submit, and progress write so tests can
/// assert call counts (the submit-once latch in particular).
#[derive(Debug, Clone, Default)]
pub struct InMemoryApi {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryApi {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(InMemoryState {
                next_attempt_id: 1,
                ..InMemoryState::default()
            })),
        }
    }

    pub fn insert_course(&self, course: Course) {
        self.state.lock().unwrap().courses.insert(course.id, course);
    }

    pub fn insert_lessons(&self, course_id: CourseId, lessons: Vec<Lesson>) {
        self.state.lock().unwrap().lessons.insert(course_id, lessons);
    }

    pub fn insert_modules(&self, course_id: CourseId, modules: Vec<Section>) {
        self.state.lock().unwrap().modules.insert(course_id, modules);
    }

    pub fn set_progress(&self, lesson_id: LessonId, record: ProgressRecord) {
        self.state.lock().unwrap().progress.insert(lesson_id, record);
    }

    /// Make subsequent `get_progress` calls for this lesson fail.
    pub fn fail_progress(&self, lesson_id: LessonId) {
        self.state.lock().unwrap().failing_progress.insert(lesson_id);
    }

    pub fn insert_test(&self, test: Test) {
        self.state.lock().unwrap().tests.insert(test.lesson_id, test);
    }

    /// Script the `(score, max_score)` the next submits will report.
    pub fn set_submit_score(&self, score: u32, max_score: u32) {
        self.state.lock().unwrap().submit_score = (score, max_score);
    }

    /// Make subsequent submits fail with a connection error.
    pub fn fail_submits(&self) {
        self.state.lock().unwrap().fail_submit = true;
    }

    #[must_use]
    pub fn submit_count(&self) -> usize {
        self.state.lock().unwrap().submits.len()
    }

    #[must_use]
    pub fn last_submit(&self) -> Option<(TestId, AttemptId, Vec<AnswerPayload>)> {
        self.state.lock().unwrap().submits.last().cloned()
    }

    #[must_use]
    pub fn started_attempts(&self) -> Vec<(TestId, AttemptId)> {
        self.state.lock().unwrap().started_attempts.clone()
    }

    #[must_use]
    pub fn progress_updates(&self) -> Vec<(LessonId, ProgressRecord)> {
        self.state.lock().unwrap().progress_updates.clone()
    }
}

#[async_trait]
impl CourseRepository for InMemoryApi {
    async fn fetch_course(&self, id: CourseId) -> Result<Course, ApiError> {
        self.state
            .lock()
            .unwrap()
            .courses
            .get(&id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, ApiError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .lessons
            .get(&course_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_modules(&self, course_id: CourseId) -> Result<Vec<Section>, ApiError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .modules
            .get(&course_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ProgressRepository for InMemoryApi {
    async fn get_progress(&self, lesson_id: LessonId) -> Result<ProgressRecord, ApiError> {
        let state = self.state.lock().unwrap();
        if state.failing_progress.contains(&lesson_id) {
            return Err(ApiError::Connection("scripted failure".into()));
        }
        state
            .progress
            .get(&lesson_id)
            .copied()
            .ok_or(ApiError::NotFound)
    }

    async fn update_progress(
        &self,
        lesson_id: LessonId,
        record: ProgressRecord,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        state.progress_updates.push((lesson_id, record));
        state.progress.insert(lesson_id, record);
        Ok(())
    }
}

#[async_trait]
impl TestRepository for InMemoryApi {
    async fn get_test_for_lesson(&self, lesson_id: LessonId) -> Result<Test, ApiError> {
        self.state
            .lock()
            .unwrap()
            .tests
            .get(&lesson_id)
            .cloned()
            .ok_or(ApiError::NotFound)
    }

    async fn start_attempt(&self, test_id: TestId) -> Result<AttemptId, ApiError> {
        let mut state = self.state.lock().unwrap();
        let attempt_id = AttemptId::new(state.next_attempt_id);
        state.next_attempt_id += 1;
        state.started_attempts.push((test_id, attempt_id));
        Ok(attempt_id)
    }

    async fn submit_attempt(
        &self,
        test_id: TestId,
        attempt_id: AttemptId,
        answers: &[AnswerPayload],
    ) -> Result<SubmitOutcome, ApiError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_submit {
            return Err(ApiError::Connection("scripted failure".into()));
        }
        state
            .submits
            .push((test_id, attempt_id, answers.to_vec()));
        let (score, max_score) = state.submit_score;
        // Echo the selections back so round-trip tests can compare sets.
        let breakdown = answers
            .iter()
            .map(|a| AnswerBreakdown {
                question_id: brainboost_core::model::QuestionId::new(a.question),
                is_correct: None,
                correct_choice_ids: Vec::new(),
                selected_choice_ids: match &a.selected {
                    Some(SelectedChoices::One(id)) => {
                        vec![brainboost_core::model::ChoiceId::new(*id)]
                    }
                    Some(SelectedChoices::Many(ids)) => ids
                        .iter()
                        .map(|id| brainboost_core::model::ChoiceId::new(*id))
                        .collect(),
                    None => Vec::new(),
                },
                reference_text: None,
            })
            .collect();
        Ok(SubmitOutcome {
            score,
            max_score,
            breakdown,
        })
    }
}
