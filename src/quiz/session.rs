//! 测验会话状态机
//!
//! `Instructions -> InProgress -> Submitted`，页面失焦走
//! `SignedOut` 硬终止。时间由调用方注入，状态机本身不读时钟，
//! 同一事件序列必然产生同一终态。

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::models::assessments::entities::Assessment;
use crate::quiz::scoring::{GradedAttempt, grade_attempt};
use crate::quiz::signal::InterruptReason;

/// 会话错误
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// 测验没有题目，无法开始
    NoQuestions,
    /// 当前状态不允许该操作
    InvalidPhase,
    /// 只有停在最后一题时才能显式交卷
    NotAtLastQuestion,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::NoQuestions => write!(f, "Assessment has no questions"),
            SessionError::InvalidPhase => write!(f, "Operation not allowed in current phase"),
            SessionError::NotAtLastQuestion => {
                write!(f, "Submit is only available on the last question")
            }
        }
    }
}

/// 会话阶段（对外观察用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Instructions,
    InProgress,
    Submitted,
    /// 失焦硬终止，未产生成绩
    SignedOut,
}

/// 交卷方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// 最后一题显式交卷
    Manual,
    /// 倒计时归零自动交卷
    TimeExpired,
}

#[derive(Debug)]
enum State {
    Instructions,
    InProgress {
        current: usize,
        answers: HashMap<u32, String>,
        deadline: DateTime<Utc>,
    },
    Submitted {
        result: GradedAttempt,
        termination: Termination,
    },
    SignedOut,
}

#[derive(Debug)]
pub struct QuizSession {
    assessment: Assessment,
    state: State,
}

impl QuizSession {
    /// 从已获取的测验定义创建会话，初始停在说明页
    pub fn new(assessment: Assessment) -> Result<Self, SessionError> {
        if assessment.questions.is_empty() {
            return Err(SessionError::NoQuestions);
        }
        Ok(Self {
            assessment,
            state: State::Instructions,
        })
    }

    pub fn assessment(&self) -> &Assessment {
        &self.assessment
    }

    pub fn phase(&self) -> SessionPhase {
        match self.state {
            State::Instructions => SessionPhase::Instructions,
            State::InProgress { .. } => SessionPhase::InProgress,
            State::Submitted { .. } => SessionPhase::Submitted,
            State::SignedOut => SessionPhase::SignedOut,
        }
    }

    /// 从说明页开始答题，倒计时以测验时长为准
    pub fn start(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        match self.state {
            State::Instructions => {
                self.state = State::InProgress {
                    current: 0,
                    answers: HashMap::new(),
                    deadline: now + Duration::minutes(self.assessment.duration_minutes as i64),
                };
                Ok(())
            }
            _ => Err(SessionError::InvalidPhase),
        }
    }

    /// 当前题目下标与内容
    pub fn current_question(&self) -> Option<(usize, &crate::models::assessments::entities::Question)> {
        match &self.state {
            State::InProgress { current, .. } => {
                self.assessment.questions.get(*current).map(|q| (*current, q))
            }
            _ => None,
        }
    }

    /// 为当前题目选择选项，重复选择直接覆盖
    pub fn select_answer(&mut self, option_text: impl Into<String>) -> Result<(), SessionError> {
        match &mut self.state {
            State::InProgress {
                current, answers, ..
            } => {
                answers.insert(*current as u32, option_text.into());
                Ok(())
            }
            _ => Err(SessionError::InvalidPhase),
        }
    }

    /// 下一题，停在末尾不越界
    pub fn next_question(&mut self) -> Result<usize, SessionError> {
        let total = self.assessment.questions.len();
        match &mut self.state {
            State::InProgress { current, .. } => {
                if *current + 1 < total {
                    *current += 1;
                }
                Ok(*current)
            }
            _ => Err(SessionError::InvalidPhase),
        }
    }

    /// 上一题，停在开头不越界
    pub fn previous_question(&mut self) -> Result<usize, SessionError> {
        match &mut self.state {
            State::InProgress { current, .. } => {
                *current = current.saturating_sub(1);
                Ok(*current)
            }
            _ => Err(SessionError::InvalidPhase),
        }
    }

    /// 剩余时间，已过期返回零
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        match &self.state {
            State::InProgress { deadline, .. } => (*deadline - now).max(Duration::zero()),
            _ => Duration::zero(),
        }
    }

    /// 每秒时钟滴答：到期则自动交卷并返回成绩
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<&GradedAttempt> {
        if let State::InProgress { deadline, .. } = &self.state
            && now >= *deadline
        {
            self.finalize(Termination::TimeExpired);
        }
        self.result()
    }

    /// 最后一题显式交卷；截止时间已过的交卷按超时处理
    pub fn submit(&mut self, now: DateTime<Utc>) -> Result<&GradedAttempt, SessionError> {
        match &self.state {
            State::InProgress {
                current, deadline, ..
            } => {
                if *current + 1 != self.assessment.questions.len() {
                    return Err(SessionError::NotAtLastQuestion);
                }
                let termination = if now >= *deadline {
                    Termination::TimeExpired
                } else {
                    Termination::Manual
                };
                self.finalize(termination);
                Ok(self.result().expect("submitted session has a result"))
            }
            _ => Err(SessionError::InvalidPhase),
        }
    }

    /// 投递中断信号
    ///
    /// 对同一会话重复投递是空操作；只有 InProgress 状态会被打断。
    /// 倒计时归零走自动交卷，失焦直接硬终止、不产生成绩。
    pub fn interrupt(&mut self, reason: InterruptReason) -> SessionPhase {
        if let State::InProgress { .. } = self.state {
            match reason {
                InterruptReason::TimeExpired => self.finalize(Termination::TimeExpired),
                InterruptReason::FocusLost => self.state = State::SignedOut,
            }
        }
        self.phase()
    }

    /// 交卷后的评分结果
    pub fn result(&self) -> Option<&GradedAttempt> {
        match &self.state {
            State::Submitted { result, .. } => Some(result),
            _ => None,
        }
    }

    /// 交卷方式
    pub fn termination(&self) -> Option<Termination> {
        match &self.state {
            State::Submitted { termination, .. } => Some(*termination),
            _ => None,
        }
    }

    /// 已作答的题目映射
    pub fn answers(&self) -> HashMap<u32, String> {
        match &self.state {
            State::InProgress { answers, .. } => answers.clone(),
            _ => HashMap::new(),
        }
    }

    fn finalize(&mut self, termination: Termination) {
        if let State::InProgress { answers, .. } = &self.state {
            let result = grade_attempt(
                &self.assessment.questions,
                self.assessment.passing_percentage,
                answers,
            );
            self.state = State::Submitted {
                result,
                termination,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessments::entities::Question;
    use crate::models::submissions::entities::SubmissionStatus;
    use chrono::TimeZone;

    fn assessment() -> Assessment {
        Assessment {
            id: 1,
            course_id: 1,
            created_by: 1,
            title: "Sample".to_string(),
            description: None,
            duration_minutes: 15,
            total_marks: 6,
            passing_percentage: 50,
            questions: (0..3)
                .map(|i| Question {
                    text: format!("Q{i}"),
                    options: vec![
                        "A".to_string(),
                        "B".to_string(),
                        "C".to_string(),
                        "D".to_string(),
                    ],
                    correct_answer: "B".to_string(),
                })
                .collect(),
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_session_requires_questions() {
        let mut empty = assessment();
        empty.questions.clear();
        assert_eq!(QuizSession::new(empty).unwrap_err(), SessionError::NoQuestions);
    }

    #[test]
    fn test_happy_path_manual_submit() {
        let mut session = QuizSession::new(assessment()).unwrap();
        assert_eq!(session.phase(), SessionPhase::Instructions);

        session.start(t0()).unwrap();
        assert_eq!(session.phase(), SessionPhase::InProgress);

        session.select_answer("B").unwrap();
        session.next_question().unwrap();
        session.select_answer("B").unwrap();
        session.next_question().unwrap();
        session.select_answer("B").unwrap();

        let result = session.submit(t0() + Duration::minutes(5)).unwrap().clone();
        assert_eq!(result.score, 3);
        assert_eq!(result.status, SubmissionStatus::Pass);
        assert_eq!(session.termination(), Some(Termination::Manual));
    }

    #[test]
    fn test_submit_requires_last_question() {
        let mut session = QuizSession::new(assessment()).unwrap();
        session.start(t0()).unwrap();
        assert_eq!(
            session.submit(t0()).unwrap_err(),
            SessionError::NotAtLastQuestion
        );
    }

    #[test]
    fn test_navigation_is_bounded() {
        let mut session = QuizSession::new(assessment()).unwrap();
        session.start(t0()).unwrap();

        assert_eq!(session.previous_question().unwrap(), 0);
        assert_eq!(session.next_question().unwrap(), 1);
        assert_eq!(session.next_question().unwrap(), 2);
        assert_eq!(session.next_question().unwrap(), 2); // 停在末尾
    }

    #[test]
    fn test_reselecting_answer_overwrites() {
        let mut session = QuizSession::new(assessment()).unwrap();
        session.start(t0()).unwrap();

        session.select_answer("A").unwrap();
        session.select_answer("B").unwrap();

        let answers = session.answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers.get(&0).map(String::as_str), Some("B"));
    }

    #[test]
    fn test_timer_expiry_auto_submits() {
        let mut session = QuizSession::new(assessment()).unwrap();
        session.start(t0()).unwrap();
        session.select_answer("B").unwrap();

        // 未到期的滴答不交卷
        assert!(session.tick(t0() + Duration::minutes(14)).is_none());

        let result = session
            .tick(t0() + Duration::minutes(15))
            .expect("deadline tick must submit")
            .clone();
        assert_eq!(result.score, 1);
        assert_eq!(session.termination(), Some(Termination::TimeExpired));
        // 未作答的两题计为错
        assert_eq!(result.percentage, 33);
    }

    #[test]
    fn test_focus_lost_is_hard_termination() {
        let mut session = QuizSession::new(assessment()).unwrap();
        session.start(t0()).unwrap();
        session.select_answer("B").unwrap();

        let phase = session.interrupt(InterruptReason::FocusLost);
        assert_eq!(phase, SessionPhase::SignedOut);
        // 硬终止不产生成绩
        assert!(session.result().is_none());
    }

    #[test]
    fn test_duplicate_interrupts_are_idempotent() {
        let mut session = QuizSession::new(assessment()).unwrap();
        session.start(t0()).unwrap();

        assert_eq!(
            session.interrupt(InterruptReason::TimeExpired),
            SessionPhase::Submitted
        );
        let first = session.result().cloned();

        // blur 和 visibility-change 同时触发的重复信号不改变终态
        assert_eq!(
            session.interrupt(InterruptReason::FocusLost),
            SessionPhase::Submitted
        );
        assert_eq!(session.result().cloned(), first);
    }

    #[test]
    fn test_remaining_time_clamped_to_zero() {
        let mut session = QuizSession::new(assessment()).unwrap();
        session.start(t0()).unwrap();

        assert_eq!(
            session.remaining(t0() + Duration::minutes(10)),
            Duration::minutes(5)
        );
        assert_eq!(
            session.remaining(t0() + Duration::minutes(20)),
            Duration::zero()
        );
    }
}
