#![forbid(unsafe_code)]

pub mod repository;
pub mod rest;

pub use repository::{
    AnswerPayload, ApiError, CourseRepository, InMemoryApi, ProgressRepository, SelectedChoices,
    SubmitOutcome, TestRepository,
};
pub use rest::{RestClient, RestConfig};
