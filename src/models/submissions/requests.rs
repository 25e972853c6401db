use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

// 提交测验请求
//
// 只携带作答内容，得分、百分比与通过状态一律由服务端
// 依据存储的测验定义重新计算。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/submission.ts")]
pub struct SubmitQuizRequest {
    pub course_id: i64,
    /// 题目下标 -> 所选选项文本
    pub answers: HashMap<u32, String>,
}
