use serde::Serialize;
use ts_rs::TS;

/// 学习进度响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct ProgressResponse {
    pub course_id: i64,
    pub completed_lessons: Vec<i64>,
    pub lesson_count: i32,
    /// 已完成课时占比（0-100 取整）
    pub percent: i32,
    pub certificate_unlocked: bool,
}
