use async_trait::async_trait;

use brainboost_core::model::{AttemptId, LessonId, Test, TestId};

use super::dto::{EmptyBody, StartAttemptDto, SubmitRequestDto, SubmitResponseDto, TestDto};
use super::{RestClient, mapping};
use crate::repository::{AnswerPayload, ApiError, SubmitOutcome, TestRepository};

#[async_trait]
impl TestRepository for RestClient {
    async fn get_test_for_lesson(&self, lesson_id: LessonId) -> Result<Test, ApiError> {
        let dto: TestDto = self
            .get_json(&format!("/api/tests/lessons/{lesson_id}/test/"))
            .await?;
        mapping::map_test(dto, lesson_id)
    }

    async fn start_attempt(&self, test_id: TestId) -> Result<AttemptId, ApiError> {
        let dto: StartAttemptDto = self
            .post_json(&format!("/api/tests/{test_id}/attempts/start/"), &EmptyBody {})
            .await?;
        Ok(AttemptId::new(dto.id))
    }

    async fn submit_attempt(
        &self,
        test_id: TestId,
        attempt_id: AttemptId,
        answers: &[AnswerPayload],
    ) -> Result<SubmitOutcome, ApiError> {
        let body = SubmitRequestDto { answers };
        let dto: SubmitResponseDto = self
            .post_json(
                &format!("/api/tests/{test_id}/attempts/{attempt_id}/submit/"),
                &body,
            )
            .await?;
        Ok(SubmitOutcome {
            score: dto.score,
            max_score: dto.max_score,
            breakdown: dto.breakdown.into_iter().map(mapping::map_breakdown).collect(),
        })
    }
}
