use std::sync::Arc;
use std::time::Duration;

use brainboost_core::Clock;
use brainboost_core::model::{LessonId, ProgressRecord};

use api::{ProgressRepository, TestRepository};

use super::engine::{AttemptEngine, TickOutcome};
use crate::error::AttemptError;

/// Orchestrates one attempt session over the test and progress endpoints:
/// fetch-then-start ordering, the single submit call, the countdown driver,
/// and the completion write-back.
#[derive(Clone)]
pub struct AttemptWorkflow {
    clock: Clock,
    tests: Arc<dyn TestRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl AttemptWorkflow {
    #[must_use]
    pub fn new(
        clock: Clock,
        tests: Arc<dyn TestRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            clock,
            tests,
            progress,
        }
    }

    /// Fetch the lesson's test, then open a server-side attempt. The start
    /// call is only issued after the definition fetch succeeds. A failure of
    /// either call is terminal for the session; surface
    /// [`AttemptError::user_message`] and require a fresh load to retry.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` when the test fetch or attempt start fails.
    pub async fn start(&self, lesson_id: LessonId) -> Result<AttemptEngine, AttemptError> {
        let test = self.tests.get_test_for_lesson(lesson_id).await?;
        let mut engine = AttemptEngine::new(test, self.clock.now());
        let attempt_id = self.tests.start_attempt(engine.test().id).await?;
        engine.attach_attempt(attempt_id);
        Ok(engine)
    }

    /// Submit the engine's answers. Returns `true` if a server call fired,
    /// `false` for the silent no-op cases: the latch already claimed (a
    /// manual click racing the timer), a result already present, or no
    /// attempt id yet.
    ///
    /// A transport failure is not propagated: the engine stores the
    /// user-facing message together with a zeroed failed result, so the
    /// session always terminates. After a successful grading the lesson's
    /// completion record is written back fire-and-forget.
    pub async fn submit(&self, engine: &mut AttemptEngine, auto: bool) -> bool {
        let Some(ticket) = engine.begin_submit(auto) else {
            return false;
        };

        match self
            .tests
            .submit_attempt(ticket.test_id, ticket.attempt_id, &ticket.answers)
            .await
        {
            Ok(outcome) => {
                let lesson_id = engine.test().lesson_id;
                engine.complete_submit(outcome, self.clock.now());
                let percent = engine
                    .result()
                    .map(|r| r.percent.round().clamp(0.0, 100.0) as u8);
                // Write-back failures are ignored; the next progression load
                // re-fetches authoritative state anyway.
                let _ = self
                    .progress
                    .update_progress(lesson_id, ProgressRecord::completed(percent))
                    .await;
            }
            Err(err) => {
                let message = AttemptError::from(err).user_message();
                engine.fail_submit(message, self.clock.now());
            }
        }
        true
    }

    /// Drive the 1-second countdown until it elapses, then auto-submit
    /// exactly once. Returns immediately for untimed tests. Dropping the
    /// future (page unmount) stops the timer.
    pub async fn run_countdown(&self, engine: &mut AttemptEngine) {
        loop {
            if engine.time_left().is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_secs(1)).await;
            match engine.tick() {
                TickOutcome::Running(_) => {}
                TickOutcome::Elapsed => {
                    let _ = self.submit(engine, true).await;
                    return;
                }
                TickOutcome::Idle => return,
            }
        }
    }
}
