use async_trait::async_trait;

use brainboost_core::model::{Course, CourseId, Lesson, Section};

use super::dto::{CourseDto, LessonDto, Listing, ModuleDto};
use super::{RestClient, mapping};
use crate::repository::{ApiError, CourseRepository};

#[async_trait]
impl CourseRepository for RestClient {
    async fn fetch_course(&self, id: CourseId) -> Result<Course, ApiError> {
        let dto: CourseDto = self.get_json(&format!("/courses/{id}/")).await?;
        Ok(mapping::map_course(dto))
    }

    async fn list_lessons(&self, course_id: CourseId) -> Result<Vec<Lesson>, ApiError> {
        let listing: Listing<LessonDto> = self
            .get_json(&format!("/api/lesson/courses/{course_id}/lessons/"))
            .await?;
        Ok(listing.into_vec().into_iter().map(mapping::map_lesson).collect())
    }

    async fn list_modules(&self, course_id: CourseId) -> Result<Vec<Section>, ApiError> {
        let listing: Listing<ModuleDto> = self
            .get_json(&format!("/api/lesson/courses/{course_id}/modules/"))
            .await?;
        Ok(listing.into_vec().into_iter().map(mapping::map_module).collect())
    }
}
