//! Pure course-progression algorithms: global lesson ordering, fail-soft
//! progress reconciliation, done/next/locked decoration, and section grouping.
//!
//! Everything here is synchronous and side-effect free; the services crate
//! feeds it data fetched from the progress API.

use std::collections::HashMap;

use crate::model::{
    DecoratedLesson, Lesson, LessonId, LessonState, ProgressRecord, Section, SectionKey,
    SectionView, ROOT_SECTION_ORDER,
};

//
// ─── POLICY ────────────────────────────────────────────────────────────────────
//

/// What a section offers as its entry lesson once every lesson in it is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextFallback {
    /// No actionable next lesson.
    None,
    /// Re-offer the last lesson for review.
    LastLesson,
}

/// Single policy constant for the "all lessons done" case, consulted by
/// section grouping. The decoration pass never assigns `Next` when every
/// lesson is complete; this only controls the per-section entry pointer.
pub const NEXT_WHEN_ALL_DONE: NextFallback = NextFallback::LastLesson;

//
// ─── ORDERING ──────────────────────────────────────────────────────────────────
//

/// Sort lessons into the global course sequence:
/// `(section order, lesson order, lesson id)` ascending. This ordering is the
/// contract for what counts as "earlier" when deriving unlock states.
pub fn sort_into_global_order(lessons: &mut [Lesson]) {
    lessons.sort_by_key(|l| (l.section_order(), l.order, l.id));
}

//
// ─── RECONCILIATION ────────────────────────────────────────────────────────────
//

/// Overlay freshly fetched progress records onto lessons. Only lessons with
/// an entry in `updates` are touched; the rest keep their prior
/// completed/result values, so a transient fetch failure never regresses a
/// lesson from done to not-done.
pub fn merge_progress(lessons: &mut [Lesson], updates: &HashMap<LessonId, ProgressRecord>) {
    for lesson in lessons.iter_mut() {
        if let Some(record) = updates.get(&lesson.id) {
            lesson.apply_progress(*record);
        }
    }
}

//
// ─── DECORATION ────────────────────────────────────────────────────────────────
//

/// Walk the globally ordered sequence once and assign each lesson exactly one
/// of done/next/locked. The first incomplete lesson is `Next`; everything
/// before it is `Done` by construction, everything after it `Locked`. When
/// all lessons are complete, every lesson is `Done` and none is `Next`.
///
/// Callers must pass lessons already sorted by [`sort_into_global_order`].
#[must_use]
pub fn decorate(lessons: Vec<Lesson>) -> Vec<DecoratedLesson> {
    let first_incomplete = lessons.iter().position(|l| !l.completed);

    lessons
        .into_iter()
        .enumerate()
        .map(|(index, lesson)| {
            let state = if lesson.completed {
                LessonState::Done
            } else if first_incomplete == Some(index) {
                LessonState::Next
            } else {
                LessonState::Locked
            };
            DecoratedLesson { lesson, state }
        })
        .collect()
}

//
// ─── SECTION GROUPING ──────────────────────────────────────────────────────────
//

/// Group decorated lessons into section views.
///
/// When `modules` is empty, sections are synthesized from the distinct module
/// references embedded in the lessons (first-seen order, deduplicated by id),
/// then sorted by order. Lessons without a module land in the synthetic root
/// section, which sorts first with [`ROOT_SECTION_ORDER`].
///
/// Lessons must already be in global order; grouping preserves their relative
/// order inside each section.
#[must_use]
pub fn group_sections(decorated: Vec<DecoratedLesson>, modules: &[Section]) -> Vec<SectionView> {
    let mut sections: Vec<SectionView> = Vec::new();
    let mut index_of: HashMap<SectionKey, usize> = HashMap::new();

    // Seed explicit modules so empty sections still render.
    for module in modules {
        let key = SectionKey::Module(module.id);
        if index_of.contains_key(&key) {
            continue;
        }
        index_of.insert(key, sections.len());
        sections.push(empty_view(key, module.title.clone(), module.order));
    }

    for item in decorated {
        let key = item.lesson.section_key();
        let slot = match index_of.get(&key) {
            Some(&slot) => slot,
            None => {
                let (title, order) = match &item.lesson.section {
                    Some(section) => (section.title.clone(), section.order),
                    None => (String::new(), ROOT_SECTION_ORDER),
                };
                index_of.insert(key, sections.len());
                sections.push(empty_view(key, title, order));
                sections.len() - 1
            }
        };
        sections[slot].lessons.push(item);
    }

    for view in &mut sections {
        view.total = view.lessons.len();
        view.done = view.lessons.iter().filter(|l| l.is_done()).count();
        view.pct = section_pct(view.done, view.total);
        view.next = section_next(&view.lessons);
    }

    sections.sort_by_key(|view| view.order);
    sections
}

fn empty_view(key: SectionKey, title: String, order: i32) -> SectionView {
    SectionView {
        key,
        title,
        order,
        lessons: Vec::new(),
        total: 0,
        done: 0,
        pct: 0,
        next: None,
    }
}

/// `round(done/total*100)`, and 0 for an empty section.
#[must_use]
pub fn section_pct(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (done as f64 / total as f64 * 100.0).round();
    pct as u8
}

fn section_next(lessons: &[DecoratedLesson]) -> Option<LessonId> {
    if let Some(pending) = lessons.iter().find(|l| !l.is_done()) {
        return Some(pending.id());
    }
    match NEXT_WHEN_ALL_DONE {
        NextFallback::LastLesson => lessons.last().map(DecoratedLesson::id),
        NextFallback::None => None,
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
