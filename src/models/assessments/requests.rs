use serde::Deserialize;
use ts_rs::TS;

use crate::models::assessments::entities::Question;

// 创建测验请求（结构化表单）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct CreateAssessmentRequest {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub total_marks: Option<i32>,
    pub passing_percentage: Option<i32>,
    pub questions: Vec<Question>,
}

// 更新测验请求（全文档补丁，服务端重新校验）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct UpdateAssessmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub total_marks: Option<i32>,
    pub passing_percentage: Option<i32>,
    pub questions: Option<Vec<Question>>,
    pub is_active: Option<bool>,
}
