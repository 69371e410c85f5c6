use std::sync::Arc;

use brainboost_core::model::{
    CourseId, Lesson, LessonId, LessonState, ProgressRecord, ProgressState, SectionId, SectionKey,
    SectionRef,
};
use services::ProgressionService;

use api::InMemoryApi;

fn course_id() -> CourseId {
    CourseId::new(1)
}

fn section_ref(id: u64, order: i32) -> SectionRef {
    SectionRef {
        id: SectionId::new(id),
        title: format!("Module {id}"),
        order,
    }
}

fn lesson(id: u64, order: i32, section: Option<SectionRef>) -> Lesson {
    Lesson {
        id: LessonId::new(id),
        title: format!("Lesson {id}"),
        order,
        duration_minutes: None,
        section,
        completed: false,
        result_percent: None,
    }
}

fn service(api: &InMemoryApi) -> ProgressionService {
    ProgressionService::new(Arc::new(api.clone()), Arc::new(api.clone()))
}

fn seed_two_sections(api: &InMemoryApi) {
    api.insert_lessons(
        course_id(),
        vec![
            lesson(1, 1, Some(section_ref(1, 1))),
            lesson(2, 2, Some(section_ref(1, 1))),
            lesson(3, 1, Some(section_ref(2, 2))),
        ],
    );
    api.set_progress(LessonId::new(1), ProgressRecord::completed(Some(90)));
}

#[tokio::test]
async fn load_decorates_sections_and_metrics() {
    let api = InMemoryApi::new();
    seed_two_sections(&api);

    let progression = service(&api).load(course_id()).await.unwrap();
    let sections = progression.sections();

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].lessons[0].state, LessonState::Done);
    assert_eq!(sections[0].lessons[1].state, LessonState::Next);
    assert_eq!(sections[1].lessons[0].state, LessonState::Locked);
    assert_eq!(sections[0].pct, 50);
    assert_eq!(sections[1].pct, 0);
    assert_eq!(progression.next_lesson(), Some(LessonId::new(2)));
    assert_eq!(progression.overall_pct(), 33);
}

#[tokio::test]
async fn first_populated_section_starts_expanded() {
    let api = InMemoryApi::new();
    seed_two_sections(&api);

    let mut progression = service(&api).load(course_id()).await.unwrap();
    let first = SectionKey::Module(SectionId::new(1));
    let second = SectionKey::Module(SectionId::new(2));

    assert!(progression.is_expanded(first));
    assert!(!progression.is_expanded(second));

    progression.toggle_section(second);
    assert!(progression.is_expanded(second));
}

#[tokio::test]
async fn refresh_is_fail_soft_per_lesson() {
    let api = InMemoryApi::new();
    seed_two_sections(&api);
    let service = service(&api);

    let mut progression = service.load(course_id()).await.unwrap();
    assert!(progression.sections()[0].lessons[0].lesson.completed);

    // Lesson 1's endpoint starts failing while lesson 2 completes. The
    // refresh must pick up lesson 2 without regressing lesson 1.
    api.fail_progress(LessonId::new(1));
    api.set_progress(LessonId::new(2), ProgressRecord::completed(Some(70)));
    service.refresh(&mut progression).await;

    let first_section = &progression.sections()[0];
    assert!(first_section.lessons[0].lesson.completed);
    assert_eq!(first_section.lessons[0].lesson.result_percent, Some(90));
    assert!(first_section.lessons[1].lesson.completed);
    assert_eq!(first_section.pct, 100);
    assert_eq!(progression.next_lesson(), Some(LessonId::new(3)));
}

#[tokio::test]
async fn all_done_course_has_no_next_but_sections_keep_entry_points() {
    let api = InMemoryApi::new();
    seed_two_sections(&api);
    api.set_progress(LessonId::new(2), ProgressRecord::completed(None));
    api.set_progress(LessonId::new(3), ProgressRecord::completed(None));

    let progression = service(&api).load(course_id()).await.unwrap();

    assert_eq!(progression.next_lesson(), None);
    assert_eq!(progression.overall_pct(), 100);
    // Per the all-done policy, each section re-offers its last lesson.
    assert_eq!(progression.sections()[0].next, Some(LessonId::new(2)));
    assert_eq!(progression.sections()[1].next, Some(LessonId::new(3)));
}

#[tokio::test]
async fn started_state_does_not_count_as_done() {
    let api = InMemoryApi::new();
    api.insert_lessons(course_id(), vec![lesson(1, 1, None), lesson(2, 2, None)]);
    api.set_progress(
        LessonId::new(1),
        ProgressRecord {
            state: ProgressState::Started,
            result_percent: None,
        },
    );

    let progression = service(&api).load(course_id()).await.unwrap();
    let root = &progression.sections()[0];

    assert_eq!(root.key, SectionKey::Root);
    assert_eq!(root.lessons[0].state, LessonState::Next);
    assert_eq!(root.lessons[1].state, LessonState::Locked);
    assert_eq!(root.done, 0);
}
