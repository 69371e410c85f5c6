//! Wire shapes as the server sends them. Mapping into domain types lives in
//! `mapping.rs`.

use serde::{Deserialize, Serialize};

use crate::repository::AnswerPayload;

/// List endpoints answer either with a bare array or a paginated
/// `{"results": [...]}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Listing<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> Listing<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Plain(items) => items,
            Listing::Paged { results } => results,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseDto {
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModuleDto {
    pub id: u64,
    pub title: String,
    pub order: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonDto {
    pub id: u64,
    pub title: String,
    pub order: Option<i32>,
    pub duration_minutes: Option<u32>,
    pub module: Option<ModuleDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProgressDto {
    pub state: Option<String>,
    pub result_percent: Option<f64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgressUpdateDto {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_percent: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceDto {
    pub id: u64,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionDto {
    pub id: u64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub choices: Vec<ChoiceDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TestDto {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub time_limit_seconds: Option<u32>,
    pub pass_mark_percent: Option<f64>,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartAttemptDto {
    pub id: u64,
}

/// Serializes to `{}` for POST endpoints that take no body fields.
#[derive(Debug, Serialize)]
pub(crate) struct EmptyBody {}

#[derive(Debug, Serialize)]
pub(crate) struct SubmitRequestDto<'a> {
    pub answers: &'a [AnswerPayload],
}

#[derive(Debug, Deserialize)]
pub(crate) struct BreakdownDto {
    pub question: u64,
    pub is_correct: Option<bool>,
    #[serde(default)]
    pub correct_option_ids: Vec<u64>,
    #[serde(default)]
    pub selected_option_ids: Vec<u64>,
    pub free_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitResponseDto {
    pub score: u32,
    pub max_score: u32,
    #[serde(default)]
    pub breakdown: Vec<BreakdownDto>,
}
