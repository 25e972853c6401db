//! 测验计分
//!
//! 计分是 (题目, 作答) 的纯函数：同一输入重复调用结果恒等，
//! 未作答的题计为错，永不失败。

use std::collections::HashMap;

use serde::Serialize;
use ts_rs::TS;

use crate::models::assessments::entities::{MARKS_PER_QUESTION, Question};
use crate::models::submissions::entities::SubmissionStatus;

/// 一次作答的完整评分结果
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/quiz.ts")]
pub struct GradedAttempt {
    /// 答对题数
    pub score: i32,
    /// 得分 = 答对题数 × 2
    pub total_marks: i32,
    pub percentage: i32,
    pub status: SubmissionStatus,
    pub total_questions: i32,
    /// 与 score 同值，台账投影保留该冗余字段
    pub correct_answers: i32,
}

/// 统计答对题数
///
/// 正确性按选项文本与标准答案的字符串相等判断，
/// 作答映射中多余的下标直接忽略。
pub fn score_answers(questions: &[Question], answers: &HashMap<u32, String>) -> i32 {
    questions
        .iter()
        .enumerate()
        .filter(|(index, question)| {
            answers
                .get(&(*index as u32))
                .is_some_and(|selected| *selected == question.correct_answer)
        })
        .count() as i32
}

/// 百分比 = round(得分 / 满分 × 100)，满分 = 题数 × 2
pub fn percentage(score: i32, question_count: usize) -> i32 {
    if question_count == 0 {
        return 0;
    }
    let earned = (score * MARKS_PER_QUESTION) as f64;
    let possible = (question_count as i32 * MARKS_PER_QUESTION) as f64;
    (earned / possible * 100.0).round() as i32
}

/// 达到及格线即通过，边界值算通过
pub fn outcome(percentage: i32, passing_percentage: i32) -> SubmissionStatus {
    if percentage >= passing_percentage {
        SubmissionStatus::Pass
    } else {
        SubmissionStatus::Fail
    }
}

/// 对一次作答完整评分
pub fn grade_attempt(
    questions: &[Question],
    passing_percentage: i32,
    answers: &HashMap<u32, String>,
) -> GradedAttempt {
    let score = score_answers(questions, answers);
    let percentage = percentage(score, questions.len());
    GradedAttempt {
        score,
        total_marks: score * MARKS_PER_QUESTION,
        percentage,
        status: outcome(percentage, passing_percentage),
        total_questions: questions.len() as i32,
        correct_answers: score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions() -> Vec<Question> {
        (0..3)
            .map(|i| Question {
                text: format!("Question {i}"),
                options: vec![
                    "Alpha".to_string(),
                    "Beta".to_string(),
                    "Gamma".to_string(),
                    "Delta".to_string(),
                ],
                correct_answer: "Beta".to_string(),
            })
            .collect()
    }

    fn answers(pairs: &[(u32, &str)]) -> HashMap<u32, String> {
        pairs
            .iter()
            .map(|(index, text)| (*index, text.to_string()))
            .collect()
    }

    #[test]
    fn test_all_correct() {
        let questions = sample_questions();
        let graded = grade_attempt(
            &questions,
            50,
            &answers(&[(0, "Beta"), (1, "Beta"), (2, "Beta")]),
        );
        assert_eq!(graded.score, 3);
        assert_eq!(graded.total_marks, 6);
        assert_eq!(graded.percentage, 100);
        assert_eq!(graded.status, SubmissionStatus::Pass);
        assert_eq!(graded.correct_answers, 3);
    }

    #[test]
    fn test_one_of_three_fails() {
        let questions = sample_questions();
        let graded = grade_attempt(
            &questions,
            50,
            &answers(&[(0, "Beta"), (1, "Alpha"), (2, "Gamma")]),
        );
        assert_eq!(graded.score, 1);
        assert_eq!(graded.percentage, 33); // round(2/6*100)
        assert_eq!(graded.status, SubmissionStatus::Fail);
    }

    #[test]
    fn test_unanswered_counts_as_incorrect() {
        let questions = sample_questions();
        let graded = grade_attempt(&questions, 50, &answers(&[(0, "Beta")]));
        assert_eq!(graded.score, 1);

        let graded_empty = grade_attempt(&questions, 50, &HashMap::new());
        assert_eq!(graded_empty.score, 0);
        assert_eq!(graded_empty.percentage, 0);
    }

    #[test]
    fn test_out_of_range_indices_ignored() {
        let questions = sample_questions();
        let graded = grade_attempt(&questions, 50, &answers(&[(17, "Beta"), (0, "Beta")]));
        assert_eq!(graded.score, 1);
    }

    #[test]
    fn test_boundary_percentage_passes() {
        let questions = sample_questions();
        // 2/3 正确 -> round(4/6*100) = 67，及格线恰为 67 时必须通过
        let graded = grade_attempt(&questions, 67, &answers(&[(0, "Beta"), (1, "Beta")]));
        assert_eq!(graded.percentage, 67);
        assert_eq!(graded.status, SubmissionStatus::Pass);

        let graded = grade_attempt(&questions, 68, &answers(&[(0, "Beta"), (1, "Beta")]));
        assert_eq!(graded.status, SubmissionStatus::Fail);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let questions = sample_questions();
        let selected = answers(&[(0, "Beta"), (1, "Alpha")]);
        let first = grade_attempt(&questions, 50, &selected);
        let second = grade_attempt(&questions, 50, &selected);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_question_set_scores_zero() {
        let graded = grade_attempt(&[], 50, &HashMap::new());
        assert_eq!(graded.score, 0);
        assert_eq!(graded.percentage, 0);
        assert_eq!(graded.total_questions, 0);
    }
}
