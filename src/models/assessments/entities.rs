use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 每道题固定四个选项
pub const OPTIONS_PER_QUESTION: usize = 4;

/// 默认测验时长（分钟）
pub const DEFAULT_DURATION_MINUTES: i32 = 15;

/// 默认及格百分比
pub const DEFAULT_PASSING_PERCENTAGE: i32 = 50;

/// 每道题的分值，总分 = 题数 × 2
pub const MARKS_PER_QUESTION: i32 = 2;

// 测验题目
//
// 正确答案按选项文本的字符串相等匹配，而不是下标。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl Question {
    /// 校验单道题目，`index` 仅用于错误信息定位
    pub fn validate(&self, index: usize) -> Result<(), String> {
        if self.text.trim().is_empty() {
            return Err(format!("Question {} text must not be empty", index + 1));
        }
        if self.options.len() != OPTIONS_PER_QUESTION {
            return Err(format!(
                "Question {} must have exactly 4 options",
                index + 1
            ));
        }
        Ok(())
    }
}

/// 校验整组题目：必须非空且每题恰好四个选项
pub fn validate_questions(questions: &[Question]) -> Result<(), String> {
    if questions.is_empty() {
        return Err("Questions are required".to_string());
    }
    for (index, question) in questions.iter().enumerate() {
        question.validate(index)?;
    }
    Ok(())
}

// 测验定义实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assessment.ts")]
pub struct Assessment {
    pub id: i64,
    pub course_id: i64,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub duration_minutes: i32,
    pub total_marks: i32,
    pub passing_percentage: i32,
    pub questions: Vec<Question>,
    /// 软删除标记，历史提交仍可回溯到非活跃定义
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: usize) -> Question {
        Question {
            text: "What does RAII stand for?".to_string(),
            options: (0..options).map(|i| format!("Option {i}")).collect(),
            correct_answer: "Option 0".to_string(),
        }
    }

    #[test]
    fn test_question_with_four_options_is_valid() {
        assert!(question(4).validate(0).is_ok());
    }

    #[test]
    fn test_question_option_count_enforced() {
        let err = question(3).validate(1).unwrap_err();
        assert_eq!(err, "Question 2 must have exactly 4 options");
        assert!(question(5).validate(0).is_err());
        assert!(question(0).validate(0).is_err());
    }

    #[test]
    fn test_empty_question_set_rejected() {
        assert_eq!(validate_questions(&[]).unwrap_err(), "Questions are required");
    }

    #[test]
    fn test_question_set_reports_first_invalid() {
        let questions = vec![question(4), question(2), question(4)];
        let err = validate_questions(&questions).unwrap_err();
        assert_eq!(err, "Question 2 must have exactly 4 options");
    }
}
