//! 测验中断信号
//!
//! 倒计时归零与页面失焦都会请求终止进行中的会话，
//! 且浏览器的 visibility-change 和 blur 可能同时触发。
//! 信号只接受第一次触发，后续触发是无害的空操作。

use std::sync::OnceLock;

use tokio::sync::Notify;

/// 中断原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptReason {
    /// 倒计时归零，走自动交卷
    TimeExpired,
    /// 页面失焦/切换标签页，视为作弊信号，强制登出
    FocusLost,
}

/// 一次性中断信号
pub struct InterruptSignal {
    reason: OnceLock<InterruptReason>,
    notify: Notify,
}

impl InterruptSignal {
    pub fn new() -> Self {
        Self {
            reason: OnceLock::new(),
            notify: Notify::new(),
        }
    }

    /// 触发中断，返回本次触发是否为首次生效
    pub fn trigger(&self, reason: InterruptReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        if first {
            self.notify.notify_waiters();
        }
        first
    }

    /// 已生效的中断原因
    pub fn reason(&self) -> Option<InterruptReason> {
        self.reason.get().copied()
    }

    /// 等待中断触发；已触发时立即返回
    pub async fn triggered(&self) -> InterruptReason {
        loop {
            let notified = self.notify.notified();
            if let Some(reason) = self.reason.get() {
                return *reason;
            }
            notified.await;
        }
    }
}

impl Default for InterruptSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_trigger_wins() {
        let signal = InterruptSignal::new();
        assert!(signal.trigger(InterruptReason::FocusLost));
        // visibility-change 和 blur 同时触发时，第二个是空操作
        assert!(!signal.trigger(InterruptReason::TimeExpired));
        assert_eq!(signal.reason(), Some(InterruptReason::FocusLost));
    }

    #[tokio::test]
    async fn test_triggered_resolves_after_fire() {
        let signal = std::sync::Arc::new(InterruptSignal::new());

        let waiter = {
            let signal = signal.clone();
            tokio::spawn(async move { signal.triggered().await })
        };

        signal.trigger(InterruptReason::TimeExpired);
        assert_eq!(waiter.await.unwrap(), InterruptReason::TimeExpired);
    }

    #[tokio::test]
    async fn test_triggered_returns_immediately_when_already_fired() {
        let signal = InterruptSignal::new();
        signal.trigger(InterruptReason::FocusLost);
        assert_eq!(signal.triggered().await, InterruptReason::FocusLost);
    }
}
