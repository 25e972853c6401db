use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学习进度记录
//
// 完成全部课时后 certificate_unlocked 置真，证书颁发以此为准。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/progress.ts")]
pub struct CourseProgress {
    pub id: i64,
    pub learner_id: i64,
    pub course_id: i64,
    pub completed_lessons: Vec<i64>,
    pub certificate_unlocked: bool,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
