use serde::{Deserialize, Serialize};

use crate::model::ids::{LessonId, SectionId};

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Server-side progress state for a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressState {
    NotStarted,
    Started,
    Completed,
}

/// One lesson's progress record as reported by the progress endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressRecord {
    pub state: ProgressState,
    pub result_percent: Option<u8>,
}

impl ProgressRecord {
    #[must_use]
    pub fn completed(result_percent: Option<u8>) -> Self {
        Self {
            state: ProgressState::Completed,
            result_percent,
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == ProgressState::Completed
    }
}

//
// ─── SECTION REFERENCE ─────────────────────────────────────────────────────────
//

/// Reference to the section (module) a lesson belongs to, as embedded in
/// lesson records. Lessons without one fall into the synthetic root section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRef {
    pub id: SectionId,
    pub title: String,
    pub order: i32,
}

/// Grouping key for a section. Lessons with no module reference share the
/// `Root` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKey {
    Module(SectionId),
    Root,
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

/// One unit of content in a course, read-only from this client's point of
/// view. `completed` and `result_percent` are refreshed from progress records
/// and keep their prior values when a refresh has nothing for this lesson.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    pub order: i32,
    pub duration_minutes: Option<u32>,
    pub section: Option<SectionRef>,
    pub completed: bool,
    pub result_percent: Option<u8>,
}

impl Lesson {
    #[must_use]
    pub fn section_key(&self) -> SectionKey {
        match &self.section {
            Some(section) => SectionKey::Module(section.id),
            None => SectionKey::Root,
        }
    }

    /// Order of the owning section, with the root section sorting first.
    #[must_use]
    pub fn section_order(&self) -> i32 {
        self.section.as_ref().map_or(ROOT_SECTION_ORDER, |s| s.order)
    }

    /// Overlay a progress record onto this lesson.
    pub fn apply_progress(&mut self, record: ProgressRecord) {
        self.completed = record.is_completed();
        if record.result_percent.is_some() {
            self.result_percent = record.result_percent;
        }
    }
}

/// Sort order assigned to the synthetic root section so it precedes explicit
/// modules, which conventionally start at order 0 or 1.
pub const ROOT_SECTION_ORDER: i32 = -1;

//
// ─── DECORATION ────────────────────────────────────────────────────────────────
//

/// Unlock state of a lesson within the global course sequence. Exactly one of
/// these applies to every lesson at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonState {
    Done,
    Next,
    Locked,
}

/// A lesson paired with its derived unlock state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoratedLesson {
    pub lesson: Lesson,
    pub state: LessonState,
}

impl DecoratedLesson {
    #[must_use]
    pub fn id(&self) -> LessonId {
        self.lesson.id
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == LessonState::Done
    }
}
