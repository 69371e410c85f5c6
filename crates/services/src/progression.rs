use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use brainboost_core::model::{
    Course, CourseId, Lesson, LessonId, LessonState, ProgressRecord, Section, SectionKey,
    SectionView,
};
use brainboost_core::progression::{
    decorate, group_sections, merge_progress, section_pct, sort_into_global_order,
};

use api::{CourseRepository, ProgressRepository};

use crate::error::ProgressionError;

//
// ─── EXPANSION STATE ───────────────────────────────────────────────────────────
//

/// Which sections the section list currently shows expanded. Pure local
/// state, never persisted; initialized to the first section that has at
/// least one lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: HashSet<SectionKey>,
}

impl ExpansionState {
    #[must_use]
    pub fn initial(sections: &[SectionView]) -> Self {
        let mut expanded = HashSet::new();
        if let Some(first) = sections.iter().find(|s| !s.is_empty()) {
            expanded.insert(first.key);
        }
        Self { expanded }
    }

    pub fn toggle(&mut self, key: SectionKey) {
        if !self.expanded.remove(&key) {
            self.expanded.insert(key);
        }
    }

    #[must_use]
    pub fn is_expanded(&self, key: SectionKey) -> bool {
        self.expanded.contains(&key)
    }
}

//
// ─── COURSE PROGRESSION SNAPSHOT ───────────────────────────────────────────────
//

/// Materialized progression state for one course: the globally ordered
/// lessons with progress applied, the derived section views, and the
/// expansion set. Owned by a single page-level controller; query methods are
/// read-only, mutation happens through `ProgressionService::refresh` and
/// `toggle_section`.
#[derive(Debug, Clone)]
pub struct CourseProgression {
    course_id: CourseId,
    lessons: Vec<Lesson>,
    modules: Vec<Section>,
    sections: Vec<SectionView>,
    expansion: ExpansionState,
}

impl CourseProgression {
    fn new(course_id: CourseId, mut lessons: Vec<Lesson>, modules: Vec<Section>) -> Self {
        sort_into_global_order(&mut lessons);
        let sections = group_sections(decorate(lessons.clone()), &modules);
        let expansion = ExpansionState::initial(&sections);
        Self {
            course_id,
            lessons,
            modules,
            sections,
            expansion,
        }
    }

    fn rebuild(&mut self) {
        self.sections = group_sections(decorate(self.lessons.clone()), &self.modules);
    }

    #[must_use]
    pub fn course_id(&self) -> CourseId {
        self.course_id
    }

    #[must_use]
    pub fn sections(&self) -> &[SectionView] {
        &self.sections
    }

    /// The unique lesson in state `next`, if any lesson is still incomplete.
    #[must_use]
    pub fn next_lesson(&self) -> Option<LessonId> {
        self.sections
            .iter()
            .flat_map(|s| s.lessons.iter())
            .find(|l| l.state == LessonState::Next)
            .map(|l| l.id())
    }

    #[must_use]
    pub fn total_lessons(&self) -> usize {
        self.lessons.len()
    }

    #[must_use]
    pub fn done_lessons(&self) -> usize {
        self.lessons.iter().filter(|l| l.completed).count()
    }

    /// Overall completion percent across the whole course.
    #[must_use]
    pub fn overall_pct(&self) -> u8 {
        section_pct(self.done_lessons(), self.total_lessons())
    }

    #[must_use]
    pub fn is_expanded(&self, key: SectionKey) -> bool {
        self.expansion.is_expanded(key)
    }

    pub fn toggle_section(&mut self, key: SectionKey) {
        self.expansion.toggle(key);
    }
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Produces and refreshes `CourseProgression` snapshots from the course and
/// progress endpoints.
#[derive(Clone)]
pub struct ProgressionService {
    courses: Arc<dyn CourseRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl ProgressionService {
    #[must_use]
    pub fn new(courses: Arc<dyn CourseRepository>, progress: Arc<dyn ProgressRepository>) -> Self {
        Self { courses, progress }
    }

    /// Fetch a course header for the browse surface.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError` on transport failure.
    pub async fn course(&self, id: CourseId) -> Result<Course, ProgressionError> {
        Ok(self.courses.fetch_course(id).await?)
    }

    /// Load a course's lessons and modules and derive the initial
    /// progression snapshot, including one progress refresh.
    ///
    /// # Errors
    ///
    /// Returns `ProgressionError` if the lesson or module list cannot be
    /// fetched. Per-lesson progress failures are not errors (see
    /// [`refresh`](Self::refresh)).
    pub async fn load(&self, course_id: CourseId) -> Result<CourseProgression, ProgressionError> {
        let lessons = self.courses.list_lessons(course_id).await?;
        let modules = self.courses.list_modules(course_id).await?;
        let mut progression = CourseProgression::new(course_id, lessons, modules);
        self.refresh(&mut progression).await;
        Ok(progression)
    }

    /// Re-fetch every lesson's progress record and re-derive the section
    /// views. A failed fetch for a lesson is swallowed and that lesson keeps
    /// its prior completed/result values, so a transient failure never
    /// regresses a lesson from done to not-done.
    ///
    /// Callers trigger this on initial mount and whenever the window regains
    /// focus or becomes visible. There is no debouncing or overlap guard
    /// here; rapid triggers simply start new fetch batches.
    pub async fn refresh(&self, progression: &mut CourseProgression) {
        let mut updates: HashMap<LessonId, ProgressRecord> = HashMap::new();
        for lesson_id in progression.lessons.iter().map(|l| l.id).collect::<Vec<_>>() {
            if let Ok(record) = self.progress.get_progress(lesson_id).await {
                updates.insert(lesson_id, record);
            }
        }
        merge_progress(&mut progression.lessons, &updates);
        progression.rebuild();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brainboost_core::model::SectionId;

    fn view(key: SectionKey, total: usize) -> SectionView {
        SectionView {
            key,
            title: String::new(),
            order: 0,
            lessons: Vec::new(),
            total,
            done: 0,
            pct: 0,
            next: None,
        }
    }

    #[test]
    fn initial_expansion_skips_empty_sections() {
        let empty = view(SectionKey::Module(SectionId::new(1)), 0);
        let mut populated = view(SectionKey::Module(SectionId::new(2)), 1);
        populated.lessons.push(brainboost_core::model::DecoratedLesson {
            lesson: brainboost_core::model::Lesson {
                id: LessonId::new(1),
                title: "L".into(),
                order: 0,
                duration_minutes: None,
                section: None,
                completed: false,
                result_percent: None,
            },
            state: LessonState::Next,
        });

        let state = ExpansionState::initial(&[empty, populated]);
        assert!(!state.is_expanded(SectionKey::Module(SectionId::new(1))));
        assert!(state.is_expanded(SectionKey::Module(SectionId::new(2))));
    }

    #[test]
    fn toggle_flips_membership() {
        let mut state = ExpansionState::default();
        let key = SectionKey::Root;
        state.toggle(key);
        assert!(state.is_expanded(key));
        state.toggle(key);
        assert!(!state.is_expanded(key));
    }
}
