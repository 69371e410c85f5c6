#![forbid(unsafe_code)]

pub mod attempt;
pub mod error;
pub mod progression;

pub use brainboost_core::Clock;

pub use attempt::{
    AnswerEvent, AttemptEngine, AttemptPhase, AttemptProgress, AttemptWorkflow, REVEAL_INTERVAL,
    RevealSequence, SubmitTicket, TickOutcome,
};
pub use error::{AttemptError, ProgressionError};
pub use progression::{CourseProgression, ExpansionState, ProgressionService};
