//! 测验运行时
//!
//! 客户端测验会话的核心逻辑：纯函数计分、倒计时会话状态机、
//! 防作弊中断信号。服务端提交接口复用同一套计分函数，
//! 两侧对同一份作答必然得出同一结果。

pub mod runner;
pub mod scoring;
pub mod session;
pub mod signal;

pub use runner::{QuizRunner, RunnerOutcome};
pub use scoring::{GradedAttempt, grade_attempt};
pub use session::{QuizSession, SessionError, SessionPhase};
pub use signal::{InterruptReason, InterruptSignal};
