use serde::Serialize;
use ts_rs::TS;

use crate::models::submissions::entities::SubmissionStatus;

/// 提交评分结果（提交接口的最小返回）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitQuizResult {
    pub score: i32,
    pub percentage: i32,
    pub status: SubmissionStatus,
}

/// 已有提交的摘要投影（重考入口展示用）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionSummary {
    pub score: i32,
    pub percentage: i32,
    pub status: SubmissionStatus,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
    pub total_questions: i32,
    pub correct_answers: i32,
}

/// 提交状态检查响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmissionStatusResponse {
    pub submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionSummary>,
}
