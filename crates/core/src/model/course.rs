use crate::model::ids::CourseId;

/// Course header shown on the browse surface. Authored elsewhere; read-only
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub image: Option<String>,
}
