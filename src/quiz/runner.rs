//! 测验会话驱动器
//!
//! 把状态机接到真实时钟上：每秒一次滴答检查倒计时，
//! 同时监听外部中断信号（失焦上报、倒计时兜底）。

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::quiz::scoring::GradedAttempt;
use crate::quiz::session::{QuizSession, SessionPhase};
use crate::quiz::signal::{InterruptReason, InterruptSignal};

/// 会话终态
#[derive(Debug, Clone, PartialEq)]
pub enum RunnerOutcome {
    /// 产生了成绩（显式交卷或倒计时自动交卷）
    Submitted(GradedAttempt),
    /// 失焦硬终止，调用方应强制登出
    SignedOut,
}

pub struct QuizRunner {
    session: QuizSession,
    signal: Arc<InterruptSignal>,
}

impl QuizRunner {
    pub fn new(session: QuizSession, signal: Arc<InterruptSignal>) -> Self {
        Self { session, signal }
    }

    /// 驱动进行中的会话直到终态
    ///
    /// 调用前会话须已 start；内部以 1 秒间隔滴答，
    /// 中断信号到达时立即打断当前等待。
    pub async fn run(mut self) -> RunnerOutcome {
        debug_assert_eq!(self.session.phase(), SessionPhase::InProgress);

        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if self.session.tick(chrono::Utc::now()).is_some() {
                        info!("Quiz session auto-submitted on timer expiry");
                    }
                }
                reason = self.signal.triggered() => {
                    self.session.interrupt(reason);
                    if reason == InterruptReason::FocusLost {
                        info!("Quiz session terminated: focus lost");
                    }
                }
            }

            match self.session.phase() {
                SessionPhase::Submitted => {
                    let result = self
                        .session
                        .result()
                        .expect("submitted session has a result")
                        .clone();
                    return RunnerOutcome::Submitted(result);
                }
                SessionPhase::SignedOut => return RunnerOutcome::SignedOut,
                _ => continue,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assessments::entities::{Assessment, Question};
    use crate::models::submissions::entities::SubmissionStatus;

    fn in_progress_session() -> QuizSession {
        let assessment = Assessment {
            id: 1,
            course_id: 1,
            created_by: 1,
            title: "Sample".to_string(),
            description: None,
            duration_minutes: 15,
            total_marks: 4,
            passing_percentage: 50,
            questions: (0..2)
                .map(|i| Question {
                    text: format!("Q{i}"),
                    options: vec![
                        "A".to_string(),
                        "B".to_string(),
                        "C".to_string(),
                        "D".to_string(),
                    ],
                    correct_answer: "A".to_string(),
                })
                .collect(),
            is_active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };
        let mut session = QuizSession::new(assessment).unwrap();
        session.start(chrono::Utc::now()).unwrap();
        session
    }

    #[tokio::test]
    async fn test_focus_lost_signal_terminates_run() {
        let signal = Arc::new(InterruptSignal::new());
        let runner = QuizRunner::new(in_progress_session(), signal.clone());

        let handle = tokio::spawn(runner.run());
        signal.trigger(InterruptReason::FocusLost);

        assert_eq!(handle.await.unwrap(), RunnerOutcome::SignedOut);
    }

    #[tokio::test]
    async fn test_time_expired_signal_submits() {
        let mut session = in_progress_session();
        session.select_answer("A").unwrap();

        let signal = Arc::new(InterruptSignal::new());
        let runner = QuizRunner::new(session, signal.clone());

        let handle = tokio::spawn(runner.run());
        signal.trigger(InterruptReason::TimeExpired);

        match handle.await.unwrap() {
            RunnerOutcome::Submitted(result) => {
                assert_eq!(result.score, 1);
                assert_eq!(result.status, SubmissionStatus::Pass);
            }
            other => panic!("expected submitted outcome, got {other:?}"),
        }
    }
}
