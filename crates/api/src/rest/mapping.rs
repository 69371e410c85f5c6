use brainboost_core::model::{
    AnswerBreakdown, Choice, ChoiceId, Course, CourseId, Lesson, LessonId, ProgressRecord,
    ProgressState, Question, QuestionId, QuestionKind, Section, SectionId, SectionRef, Test,
    TestId,
};

use super::dto::{
    BreakdownDto, ChoiceDto, CourseDto, LessonDto, ModuleDto, ProgressDto, QuestionDto, TestDto,
};
use crate::repository::ApiError;

pub(crate) fn map_course(dto: CourseDto) -> Course {
    Course {
        id: CourseId::new(dto.id),
        title: dto.title,
        image: dto.image,
    }
}

pub(crate) fn map_module(dto: ModuleDto) -> Section {
    Section {
        id: SectionId::new(dto.id),
        title: dto.title,
        order: dto.order.unwrap_or(0),
    }
}

fn map_section_ref(dto: ModuleDto) -> SectionRef {
    SectionRef {
        id: SectionId::new(dto.id),
        title: dto.title,
        order: dto.order.unwrap_or(0),
    }
}

pub(crate) fn map_lesson(dto: LessonDto) -> Lesson {
    Lesson {
        id: LessonId::new(dto.id),
        title: dto.title,
        order: dto.order.unwrap_or(0),
        duration_minutes: dto.duration_minutes,
        section: dto.module.map(map_section_ref),
        completed: false,
        result_percent: None,
    }
}

/// Only `"completed"` and `"started"` are meaningful; anything else (including
/// a missing field) reads as not-started.
pub(crate) fn map_progress(dto: ProgressDto) -> ProgressRecord {
    let state = match dto.state.as_deref() {
        Some("completed") => ProgressState::Completed,
        Some("started") => ProgressState::Started,
        _ => ProgressState::NotStarted,
    };
    ProgressRecord {
        state,
        result_percent: dto.result_percent.map(clamp_percent),
    }
}

fn clamp_percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn map_question_kind(raw: &str, id: u64) -> Result<QuestionKind, ApiError> {
    match raw {
        "single" => Ok(QuestionKind::Single),
        "multiple" => Ok(QuestionKind::Multiple),
        "true_false" => Ok(QuestionKind::TrueFalse),
        "short" => Ok(QuestionKind::Short),
        "long" => Ok(QuestionKind::Long),
        "code" => Ok(QuestionKind::Code),
        other => Err(ApiError::Decode(format!(
            "question {id} has unknown type: {other}"
        ))),
    }
}

fn map_question(dto: QuestionDto) -> Result<Question, ApiError> {
    let kind = map_question_kind(dto.kind.as_str(), dto.id)?;
    let choices = dto
        .choices
        .into_iter()
        .map(|c: ChoiceDto| Choice {
            id: ChoiceId::new(c.id),
            text: c.text,
        })
        .collect();
    Question::new(QuestionId::new(dto.id), dto.text, kind, choices)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

pub(crate) fn map_test(dto: TestDto, lesson_id: LessonId) -> Result<Test, ApiError> {
    let questions = dto
        .questions
        .into_iter()
        .map(map_question)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Test {
        id: TestId::new(dto.id),
        lesson_id,
        title: dto.title,
        description: dto.description,
        time_limit_seconds: dto.time_limit_seconds,
        pass_mark_percent: dto.pass_mark_percent.map(clamp_percent),
        questions,
    })
}

pub(crate) fn map_breakdown(dto: BreakdownDto) -> AnswerBreakdown {
    AnswerBreakdown {
        question_id: QuestionId::new(dto.question),
        is_correct: dto.is_correct,
        correct_choice_ids: dto.correct_option_ids.into_iter().map(ChoiceId::new).collect(),
        selected_choice_ids: dto
            .selected_option_ids
            .into_iter()
            .map(ChoiceId::new)
            .collect(),
        reference_text: dto.free_text,
    }
}
