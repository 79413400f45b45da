//! 会话客户端 - 流程层
//!
//! 核心职责：在一个独占的 HTTP 会话上完成"登录 → 打卡"
//!
//! 状态流转：
//! 1. 登录：每次重试都重新获取 token + 验证码，验证码失败直接放弃本次登录
//! 2. 打卡：code == 1 已打卡 / code == 0 打卡成功 / 其他代码原地重试提交

use std::sync::Arc;

use serde_json::Value;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::clients::{PortalClient, TextRecognizer};
use crate::config::{Config, RetryPolicy};
use crate::error::{ClockInError, ClockInResult};
use crate::models::{
    clock_in_payload, login_payload, Credentials, LocationProfile, LoginOutcome, SubmitOutcome,
};
use crate::services::VerificationResolver;
use crate::utils::logging::truncate_text;

/// 会话客户端
///
/// - 独占一个门户会话，登录状态只属于本次尝试
/// - 不负责整次尝试的重试（那是编排层的事）
pub struct SessionClient {
    portal: PortalClient,
    resolver: VerificationResolver,
    credentials: Credentials,
    location: LocationProfile,
    policy: RetryPolicy,
}

impl SessionClient {
    /// 新建会话客户端（同时新建 HTTP 会话）
    pub fn new(config: &Config, recognizer: Arc<dyn TextRecognizer>) -> ClockInResult<Self> {
        Ok(Self {
            portal: PortalClient::new(&config.portal_base_url)?,
            resolver: VerificationResolver::new(recognizer, config.step_retry),
            credentials: config.credentials.clone(),
            location: config.location.clone(),
            policy: config.step_retry,
        })
    }

    /// 登录门户
    pub async fn login(&self) -> LoginOutcome {
        info!("🔑 正在尝试登录系统，获取 Token...");

        for attempt in 1..=self.policy.max_attempts {
            let verification = match self.resolver.resolve(&self.portal).await {
                Ok(v) => v,
                Err(e) => {
                    error!("❌ {}，放弃本次登录", e);
                    return LoginOutcome::TokenUnavailable;
                }
            };

            let payload = login_payload(&self.credentials, &verification);
            match self.portal.login(&payload).await {
                Ok(()) => {
                    info!("✓ 登录成功");
                    return LoginOutcome::LoggedIn;
                }
                Err(e) => {
                    warn!(
                        "登录错误 (尝试 {}/{}): {}",
                        attempt, self.policy.max_attempts, e
                    );
                }
            }

            if self.policy.has_next(attempt) {
                info!("{} 秒后重新尝试登录", self.policy.delay.as_secs_f64());
                sleep(self.policy.delay).await;
            }
        }

        error!("❌ 登录失败，已重试 {} 次", self.policy.max_attempts);
        LoginOutcome::Exhausted
    }

    /// 提交打卡信息
    pub async fn submit(&self) -> SubmitOutcome {
        info!("📤 正在打卡...");
        let payload = clock_in_payload(&self.location);

        for attempt in 1..=self.policy.max_attempts {
            let result = match self.portal.add_clock_in(&payload).await {
                Ok(body) => interpret_submission(&body),
                Err(e) => Err(e),
            };

            match result {
                Ok(SubmitOutcome::AlreadySubmittedToday) => {
                    info!("🦄 您今天已经提交过打卡信息");
                    return SubmitOutcome::AlreadySubmittedToday;
                }
                Ok(SubmitOutcome::Submitted) => {
                    info!("🦄 打卡成功！");
                    return SubmitOutcome::Submitted;
                }
                Ok(SubmitOutcome::Exhausted) => {
                    warn!(
                        "打卡响应没有给出结果 (尝试 {}/{})",
                        attempt, self.policy.max_attempts
                    );
                }
                Err(e @ ClockInError::MalformedResponse { .. }) => {
                    warn!(
                        "打卡响应格式异常 (尝试 {}/{}): {}",
                        attempt, self.policy.max_attempts, e
                    );
                }
                Err(e) => {
                    warn!(
                        "提交信息错误 (尝试 {}/{}): {}",
                        attempt, self.policy.max_attempts, e
                    );
                }
            }

            if self.policy.has_next(attempt) {
                info!("{} 秒后重新打卡", self.policy.delay.as_secs_f64());
                sleep(self.policy.delay).await;
            }
        }

        error!("❌ 打卡失败，已重试 {} 次", self.policy.max_attempts);
        SubmitOutcome::Exhausted
    }
}

/// 解析打卡响应
///
/// `code == 1` 今天已打卡，`code == 0` 打卡成功，其余都视为提交错误
pub fn interpret_submission(body: &str) -> ClockInResult<SubmitOutcome> {
    let value: Value =
        serde_json::from_str(body).map_err(|_| ClockInError::MalformedResponse {
            body: truncate_text(body, 120),
        })?;

    match value.get("code").and_then(Value::as_i64) {
        Some(1) => Ok(SubmitOutcome::AlreadySubmittedToday),
        Some(0) => Ok(SubmitOutcome::Submitted),
        code => Err(ClockInError::Submission { code }),
    }
}
