use crate::model::ids::{LessonId, SectionId};
use crate::model::lesson::{DecoratedLesson, SectionKey};

/// A named, ordered grouping of lessons, as listed by the modules endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub order: i32,
}

/// Render-ready view of one section: its decorated lessons plus completion
/// metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionView {
    pub key: SectionKey,
    pub title: String,
    pub order: i32,
    pub lessons: Vec<DecoratedLesson>,
    pub total: usize,
    pub done: usize,
    pub pct: u8,
    /// The lesson to offer as the section's entry point. `None` only for an
    /// empty section; see `NEXT_WHEN_ALL_DONE` for the all-done case.
    pub next: Option<LessonId>,
}

impl SectionView {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }
}
