use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 提交结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub enum SubmissionStatus {
    Pass,
    Fail,
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionStatus::Pass => write!(f, "PASS"),
            SubmissionStatus::Fail => write!(f, "FAIL"),
        }
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PASS" => Ok(SubmissionStatus::Pass),
            "FAIL" => Ok(SubmissionStatus::Fail),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 提交台账记录
//
// 每个 (学员, 课程) 至多一条，写入后不再变更。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct Submission {
    pub id: i64,
    pub learner_id: i64,
    pub course_id: i64,
    pub assessment_id: i64,
    /// 题目下标 -> 所选选项文本
    pub answers: HashMap<u32, String>,
    /// 答对题数
    pub score: i32,
    /// 得分 = 答对题数 × 2
    pub total_marks: i32,
    pub percentage: i32,
    pub status: SubmissionStatus,
    pub total_questions: i32,
    pub correct_answers: i32,
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}
