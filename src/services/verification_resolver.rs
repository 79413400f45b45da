//! 验证码解析服务 - 业务能力层
//!
//! 只负责"拿到一对可用的 token + 验证码"，不关心登录流程

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{info, warn};

use crate::clients::{PortalClient, TextRecognizer};
use crate::config::RetryPolicy;
use crate::error::{ClockInError, ClockInResult};
use crate::models::Verification;

/// 验证码解析服务
///
/// 每一轮都重新申请 token：token 与识别结果一一对应，识别失败的 token 不再复用。
pub struct VerificationResolver {
    recognizer: Arc<dyn TextRecognizer>,
    policy: RetryPolicy,
}

impl VerificationResolver {
    pub fn new(recognizer: Arc<dyn TextRecognizer>, policy: RetryPolicy) -> Self {
        Self { recognizer, policy }
    }

    /// 获取 token 并识别验证码
    ///
    /// 在重试上限内没有得到纯数字结果时返回 `ClockInError::Token`
    pub async fn resolve(&self, portal: &PortalClient) -> ClockInResult<Verification> {
        for attempt in 1..=self.policy.max_attempts {
            match self.fetch_token(portal).await {
                Some(token) => {
                    let image_url = portal.image_url(&token);
                    let candidate = self.recognize(&image_url).await;

                    match candidate {
                        Some(code) if is_numeric_code(&code) => {
                            info!("✓ 获取 token {} 和验证码 {}", token, code);
                            return Ok(Verification { token, code });
                        }
                        other => {
                            warn!(
                                "Token: {}, 验证码识别为: {:?}, 不是纯数字 (尝试 {}/{})",
                                token, other, attempt, self.policy.max_attempts
                            );
                        }
                    }
                }
                None => {
                    warn!(
                        "Token 获取失败 (尝试 {}/{})",
                        attempt, self.policy.max_attempts
                    );
                }
            }

            if self.policy.has_next(attempt) {
                sleep(self.policy.delay).await;
            }
        }

        Err(ClockInError::Token {
            attempts: self.policy.max_attempts,
        })
    }

    /// 申请 token（带重试），全部失败时返回 None
    async fn fetch_token(&self, portal: &PortalClient) -> Option<String> {
        for attempt in 1..=self.policy.max_attempts {
            match portal.fetch_token().await {
                Ok(token) => return Some(token),
                Err(e) => {
                    warn!(
                        "获取 token 失败 (尝试 {}/{}): {}",
                        attempt, self.policy.max_attempts, e
                    );
                }
            }

            if self.policy.has_next(attempt) {
                sleep(self.policy.delay).await;
            }
        }
        None
    }

    /// 识别验证码图片，取第一个文字片段
    ///
    /// OCR 调用失败与识别为空一样返回 None
    async fn recognize(&self, image_url: &str) -> Option<String> {
        match self.recognizer.recognize(image_url).await {
            Ok(texts) => texts.into_iter().next().map(|t| t.trim().to_string()),
            Err(e) => {
                warn!("OCR 调用失败: {}", e);
                None
            }
        }
    }
}

/// 验证码必须是非空的十进制数字串
pub fn is_numeric_code(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c.is_ascii_digit())
}
