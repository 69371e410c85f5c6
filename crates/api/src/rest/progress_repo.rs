use async_trait::async_trait;

use brainboost_core::model::{LessonId, ProgressRecord, ProgressState};

use super::dto::{ProgressDto, ProgressUpdateDto};
use super::{RestClient, mapping};
use crate::repository::{ApiError, ProgressRepository};

#[async_trait]
impl ProgressRepository for RestClient {
    async fn get_progress(&self, lesson_id: LessonId) -> Result<ProgressRecord, ApiError> {
        let dto: ProgressDto = self
            .get_json(&format!("/api/lesson/progress/{lesson_id}/"))
            .await?;
        Ok(mapping::map_progress(dto))
    }

    async fn update_progress(
        &self,
        lesson_id: LessonId,
        record: ProgressRecord,
    ) -> Result<(), ApiError> {
        let state = match record.state {
            ProgressState::Completed => "completed",
            ProgressState::Started => "started",
            ProgressState::NotStarted => "not_started",
        };
        let body = ProgressUpdateDto {
            state,
            result_percent: record.result_percent,
        };
        self.post_ignored(&format!("/api/lesson/progress/{lesson_id}/"), &body)
            .await
    }
}
