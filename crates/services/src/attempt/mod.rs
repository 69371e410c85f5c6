mod engine;
mod reveal;
mod view;
mod workflow;

// Public API of the attempt subsystem.
pub use crate::error::AttemptError;
pub use engine::{AnswerEvent, AttemptEngine, AttemptPhase, SubmitTicket, TickOutcome};
pub use reveal::{REVEAL_INTERVAL, RevealSequence};
pub use view::AttemptProgress;
pub use workflow::AttemptWorkflow;
