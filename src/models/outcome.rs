//! 各阶段的结果类型
//!
//! 用带标签的结果代替异常来表达控制流：
//! 登录 → 提交 → 整次尝试 → 一次运行。

/// 登录结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// 服务器接受了登录请求（2xx）
    LoggedIn,
    /// 验证码解析耗尽重试次数，本次登录放弃
    TokenUnavailable,
    /// 登录请求在重试上限内始终失败
    Exhausted,
}

/// 提交结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 今天已经提交过（code == 1）
    AlreadySubmittedToday,
    /// 本次提交成功（code == 0）
    Submitted,
    /// 重试上限内未得到终止代码
    Exhausted,
}

/// 一次完整尝试（新会话 → 登录 → 提交）的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    AlreadySubmittedToday,
    Submitted,
    /// 可以用新会话再试一次
    TransientFailure,
    /// 再试也无济于事（例如无法建立 HTTP 会话）
    PermanentFailure,
}

impl AttemptOutcome {
    pub fn is_success(self) -> bool {
        matches!(
            self,
            AttemptOutcome::AlreadySubmittedToday | AttemptOutcome::Submitted
        )
    }
}

impl From<SubmitOutcome> for AttemptOutcome {
    fn from(outcome: SubmitOutcome) -> Self {
        match outcome {
            SubmitOutcome::AlreadySubmittedToday => AttemptOutcome::AlreadySubmittedToday,
            SubmitOutcome::Submitted => AttemptOutcome::Submitted,
            SubmitOutcome::Exhausted => AttemptOutcome::TransientFailure,
        }
    }
}

/// 一次调度运行的汇总
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    /// 实际进行的尝试次数
    pub attempts: u32,
    /// 最后一次尝试的结果
    pub outcome: AttemptOutcome,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}
