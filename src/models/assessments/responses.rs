use serde::Serialize;
use ts_rs::TS;

use crate::models::assessments::entities::Assessment;

/// 测验创建者信息（列表展示用）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentCreator {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
}

/// 课程下的测验列表项
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentListItem {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub creator: AssessmentCreator,
}

/// 课程下的测验列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct AssessmentListResponse {
    pub items: Vec<AssessmentListItem>,
}
