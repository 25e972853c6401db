//! 批量导入适配器
//!
//! 导入端上传的 JSON 形状并不稳定（`courseTitle` / `title`、
//! `courseSubject` / `description` 等键名混用），这里将松散负载
//! 归一化为一个经过校验的 `CreateAssessmentRequest`，
//! 之后的流水线不再接触原始形状。

use serde_json::Value;

use crate::models::ErrorCode;
use crate::models::assessments::entities::{
    DEFAULT_DURATION_MINUTES, DEFAULT_PASSING_PERCENTAGE, MARKS_PER_QUESTION,
    OPTIONS_PER_QUESTION, Question,
};
use crate::models::assessments::requests::CreateAssessmentRequest;

/// 导入解析错误
#[derive(Debug, PartialEq)]
pub enum ImportParseError {
    MissingTitle,
    MissingQuestions,
    QuestionsNotArray,
    Question { index: usize, message: String },
}

impl ImportParseError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::MissingTitle => ErrorCode::ImportPayloadInvalid,
            Self::MissingQuestions | Self::QuestionsNotArray => ErrorCode::ImportPayloadInvalid,
            Self::Question { .. } => ErrorCode::AssessmentValidationFailed,
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::MissingTitle => "Assessment title is required".to_string(),
            Self::MissingQuestions => "Questions are required".to_string(),
            Self::QuestionsNotArray => "Questions must be an array".to_string(),
            Self::Question { message, .. } => message.clone(),
        }
    }
}

/// 从多个候选键中取第一个出现的字符串值
fn pick_str<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// 从多个候选键中取第一个出现的整数值
fn pick_i64(payload: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter()
        .find_map(|key| payload.get(*key).and_then(Value::as_i64))
}

/// 归一化单道题目
fn normalize_question(index: usize, value: &Value) -> Result<Question, ImportParseError> {
    let text = pick_str(value, &["question", "questionText", "text"]).ok_or_else(|| {
        ImportParseError::Question {
            index,
            message: format!("Question {} text is required", index + 1),
        }
    })?;

    let options: Vec<String> = value
        .get("options")
        .and_then(Value::as_array)
        .map(|options| {
            options
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if options.len() != OPTIONS_PER_QUESTION {
        return Err(ImportParseError::Question {
            index,
            message: format!("Question {} must have exactly 4 options", index + 1),
        });
    }

    let correct_answer = pick_str(value, &["correctAnswer", "correct_answer", "answer"])
        .ok_or_else(|| ImportParseError::Question {
            index,
            message: format!("Question {} correct answer is required", index + 1),
        })?;

    Ok(Question {
        text: text.to_string(),
        options,
        correct_answer: correct_answer.to_string(),
    })
}

/// 将松散的导入负载归一化为结构化创建请求
///
/// 默认值：时长 15 分钟、总分 = 题数 × 2、及格线 50%。
pub fn normalize_import_payload(
    course_id: i64,
    payload: &Value,
) -> Result<CreateAssessmentRequest, ImportParseError> {
    let title =
        pick_str(payload, &["courseTitle", "title"]).ok_or(ImportParseError::MissingTitle)?;
    let description =
        pick_str(payload, &["courseSubject", "description"]).map(str::to_string);

    let questions_value = payload
        .get("questions")
        .ok_or(ImportParseError::MissingQuestions)?;
    let raw_questions = questions_value
        .as_array()
        .ok_or(ImportParseError::QuestionsNotArray)?;
    if raw_questions.is_empty() {
        return Err(ImportParseError::MissingQuestions);
    }

    let questions = raw_questions
        .iter()
        .enumerate()
        .map(|(index, value)| normalize_question(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    let duration_minutes = pick_i64(payload, &["duration", "durationMinutes", "duration_minutes"])
        .map(|v| v as i32)
        .unwrap_or(DEFAULT_DURATION_MINUTES);
    let total_marks = pick_i64(payload, &["totalMarks", "total_marks"])
        .map(|v| v as i32)
        .unwrap_or(questions.len() as i32 * MARKS_PER_QUESTION);
    let passing_percentage =
        pick_i64(payload, &["passingPercentage", "passing_percentage", "passingScore"])
            .map(|v| v as i32)
            .unwrap_or(DEFAULT_PASSING_PERCENTAGE);

    Ok(CreateAssessmentRequest {
        course_id,
        title: title.to_string(),
        description,
        duration_minutes: Some(duration_minutes),
        total_marks: Some(total_marks),
        passing_percentage: Some(passing_percentage),
        questions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalizes_loose_key_spellings() {
        let payload = json!({
            "courseTitle": "Rust Basics Quiz",
            "courseSubject": "Ownership and borrowing",
            "questions": [
                {
                    "question": "Who owns a moved value?",
                    "options": ["The caller", "The callee", "Both", "Neither"],
                    "correctAnswer": "The callee"
                }
            ]
        });

        let normalized = normalize_import_payload(7, &payload).unwrap();
        assert_eq!(normalized.course_id, 7);
        assert_eq!(normalized.title, "Rust Basics Quiz");
        assert_eq!(
            normalized.description.as_deref(),
            Some("Ownership and borrowing")
        );
        assert_eq!(normalized.questions.len(), 1);
        assert_eq!(normalized.questions[0].correct_answer, "The callee");
    }

    #[test]
    fn test_applies_defaults() {
        let payload = json!({
            "title": "Defaults",
            "questions": [
                {
                    "text": "Q1",
                    "options": ["A", "B", "C", "D"],
                    "answer": "A"
                },
                {
                    "text": "Q2",
                    "options": ["A", "B", "C", "D"],
                    "answer": "B"
                }
            ]
        });

        let normalized = normalize_import_payload(1, &payload).unwrap();
        assert_eq!(normalized.duration_minutes, Some(15));
        assert_eq!(normalized.total_marks, Some(4)); // 2 题 × 2 分
        assert_eq!(normalized.passing_percentage, Some(50));
    }

    #[test]
    fn test_missing_questions_rejected() {
        let payload = json!({ "title": "No questions" });
        assert_eq!(
            normalize_import_payload(1, &payload).unwrap_err(),
            ImportParseError::MissingQuestions
        );

        let payload = json!({ "title": "Bad shape", "questions": "not-a-list" });
        assert_eq!(
            normalize_import_payload(1, &payload).unwrap_err(),
            ImportParseError::QuestionsNotArray
        );
    }

    #[test]
    fn test_wrong_option_count_fails_per_question() {
        let payload = json!({
            "title": "Short options",
            "questions": [
                {
                    "text": "Q1",
                    "options": ["A", "B", "C", "D"],
                    "answer": "A"
                },
                {
                    "text": "Q2",
                    "options": ["A", "B"],
                    "answer": "A"
                }
            ]
        });

        let err = normalize_import_payload(1, &payload).unwrap_err();
        assert_eq!(err.message(), "Question 2 must have exactly 4 options");
    }
}
