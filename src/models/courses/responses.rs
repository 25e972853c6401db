use serde::Serialize;
use ts_rs::TS;

use crate::models::PaginationInfo;
use crate::models::courses::entities::Course;

/// 课程列表项（附带讲师展示名）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListItem {
    #[serde(flatten)]
    pub course: Course,
    pub instructor_name: String,
}

/// 课程列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListResponse {
    pub items: Vec<CourseListItem>,
    pub pagination: PaginationInfo,
}
