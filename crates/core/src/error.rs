use thiserror::Error;

use crate::model::ParseIdError;
use crate::model::QuestionError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    ParseId(#[from] ParseIdError),
}
