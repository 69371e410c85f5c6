mod assessment;
mod course;
mod ids;
mod lesson;
mod section;

pub use ids::{
    AttemptId, ChoiceId, CourseId, LessonId, ParseIdError, QuestionId, SectionId, TestId,
};

pub use assessment::{
    AnswerBreakdown, AnswerValue, Choice, Question, QuestionError, QuestionKind, Test, TestResult,
};
pub use course::Course;
pub use lesson::{
    DecoratedLesson, Lesson, LessonState, ProgressRecord, ProgressState, SectionKey, SectionRef,
    ROOT_SECTION_ORDER,
};
pub use section::{Section, SectionView};
