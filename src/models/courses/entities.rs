use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程实体
//
// 本服务只承载测验与证书所需的最小课程信息，
// 课时内容本身由课程编辑端维护。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub id: i64,
    pub instructor_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// 课时总数，进度达到该值时解锁证书
    pub lesson_count: i32,
    /// 当前学员侧生效测验的反向引用，创建新测验时覆盖
    pub active_assessment_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
