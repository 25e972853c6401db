use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 历史数据缺百分比/状态时的展示默认值
pub const DEFAULT_CERTIFICATE_SCORE: i32 = 95;
pub const DEFAULT_ISSUE_STATUS: &str = "Distinction";
pub const DEFAULT_FETCH_STATUS: &str = "Pass";

// 结业证书实体
//
// 证书一经颁发不再变更；讲师展示名在颁发时从课程冗余。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/certificate.ts")]
pub struct Certificate {
    pub id: i64,
    /// 形如 USK-2025-7F3K2Q 的对外证书编号
    pub code: String,
    pub learner_id: i64,
    pub course_id: i64,
    pub instructor_name: String,
    pub score: Option<i32>,
    pub status: Option<String>,
    pub issued_at: chrono::DateTime<chrono::Utc>,
}
