use std::collections::VecDeque;
use std::time::Duration;

use brainboost_core::model::QuestionId;

/// Fixed delay between per-question correctness disclosures after grading.
/// Purely cosmetic; grading is already complete when the sequence starts.
pub const REVEAL_INTERVAL: Duration = Duration::from_millis(220);

/// Staggered post-grading disclosure of per-question verdicts. Tick-driven:
/// each [`advance`](Self::advance) reveals the next question id, in question
/// order. Dropping the sequence (page unmount) is the only way to stop it
/// early.
#[derive(Debug, Clone, Default)]
pub struct RevealSequence {
    pending: VecDeque<QuestionId>,
    revealed: Vec<QuestionId>,
}

impl RevealSequence {
    #[must_use]
    pub fn new(question_ids: impl IntoIterator<Item = QuestionId>) -> Self {
        Self {
            pending: question_ids.into_iter().collect(),
            revealed: Vec::new(),
        }
    }

    /// Reveal the next question, returning its id, or `None` when done.
    pub fn advance(&mut self) -> Option<QuestionId> {
        let next = self.pending.pop_front()?;
        self.revealed.push(next);
        Some(next)
    }

    #[must_use]
    pub fn revealed(&self) -> &[QuestionId] {
        &self.revealed
    }

    #[must_use]
    pub fn is_revealed(&self, id: QuestionId) -> bool {
        self.revealed.contains(&id)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drive the sequence to completion on the fixed interval, invoking the
    /// callback for every disclosure.
    pub async fn play(&mut self, mut on_reveal: impl FnMut(QuestionId)) {
        while let Some(next) = {
            tokio::time::sleep(REVEAL_INTERVAL).await;
            self.advance()
        } {
            on_reveal(next);
        }
    }
}
