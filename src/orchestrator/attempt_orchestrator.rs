//! 尝试编排器 - 编排层
//!
//! 一次运行 = 最多 N 次完整尝试；一次尝试 = 新会话 → 登录 → 打卡。
//! 失败的尝试不会从中间恢复，而是等待后用全新的会话重来。

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::clients::TextRecognizer;
use crate::config::Config;
use crate::models::{AttemptOutcome, LoginOutcome, RunReport};
use crate::utils::logging;
use crate::workflow::SessionClient;

/// 打卡编排器
pub struct ClockInOrchestrator {
    config: Config,
    recognizer: Arc<dyn TextRecognizer>,
}

impl ClockInOrchestrator {
    pub fn new(config: Config, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { config, recognizer }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 执行一次完整的每日打卡运行
    ///
    /// 打卡成功（含"今天已打卡"）立即停止；尝试次数用尽后只记录日志，不向上返回错误
    pub async fn run_daily(&self) -> RunReport {
        logging::log_run_start();

        let policy = self.config.attempt_retry;
        let mut report = RunReport {
            attempts: 0,
            outcome: AttemptOutcome::TransientFailure,
        };

        for attempt in 1..=policy.max_attempts {
            logging::log_attempt_start(attempt, policy.max_attempts);

            report.attempts = attempt;
            report.outcome = self.run_attempt().await;

            match report.outcome {
                AttemptOutcome::AlreadySubmittedToday | AttemptOutcome::Submitted => break,
                AttemptOutcome::PermanentFailure => {
                    error!("❌ 本次运行无法继续，等待下一次调度");
                    break;
                }
                AttemptOutcome::TransientFailure => {
                    if policy.has_next(attempt) {
                        warn!(
                            "打卡失败，{} 秒后自动重新尝试",
                            policy.delay.as_secs_f64()
                        );
                        sleep(policy.delay).await;
                    }
                }
            }
        }

        logging::log_run_summary(&report);
        report
    }

    /// 单次尝试：新会话 → 登录 → 打卡
    async fn run_attempt(&self) -> AttemptOutcome {
        let session = match SessionClient::new(&self.config, self.recognizer.clone()) {
            Ok(session) => session,
            Err(e) => {
                error!("❌ 无法创建打卡会话: {}", e);
                return AttemptOutcome::PermanentFailure;
            }
        };
        info!("✓ 已新建打卡会话");

        match session.login().await {
            LoginOutcome::LoggedIn => {}
            LoginOutcome::TokenUnavailable | LoginOutcome::Exhausted => {
                return AttemptOutcome::TransientFailure;
            }
        }

        session.submit().await.into()
    }
}
