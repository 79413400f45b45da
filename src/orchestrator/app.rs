//! 应用生命周期
//!
//! 启动后立即打卡一次，然后每天在配置的时间再打卡，直到收到 Ctrl+C。

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::clients::{TencentOcrClient, TextRecognizer};
use crate::config::Config;
use crate::error::ClockInResult;
use crate::orchestrator::{ClockInOrchestrator, DailySchedule};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    orchestrator: ClockInOrchestrator,
    schedule: DailySchedule,
}

impl App {
    /// 使用腾讯云 OCR 初始化应用
    pub fn initialize(config: Config) -> ClockInResult<Self> {
        let recognizer = Arc::new(TencentOcrClient::from_config(&config)?);
        Ok(Self::with_recognizer(config, recognizer))
    }

    /// 使用自定义的文字识别实现初始化应用
    pub fn with_recognizer(config: Config, recognizer: Arc<dyn TextRecognizer>) -> Self {
        let schedule = DailySchedule::new(config.schedule);
        Self {
            orchestrator: ClockInOrchestrator::new(config, recognizer),
            schedule,
        }
    }

    /// 运行应用主逻辑，直到收到 Ctrl+C
    pub async fn run(&self) -> Result<()> {
        self.run_with_shutdown(shutdown_signal()).await
    }

    /// 运行应用主逻辑，直到 `shutdown` 完成
    ///
    /// 启动时的首次打卡与之后的定时打卡都会响应退出信号
    pub async fn run_with_shutdown<S>(&self, shutdown: S) -> Result<()>
    where
        S: Future<Output = ()>,
    {
        logging::log_startup(self.orchestrator.config());
        tokio::pin!(shutdown);

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("👋 收到退出信号，首次打卡已中止");
                return Ok(());
            }
            _ = self.orchestrator.run_daily() => {}
        }

        logging::log_schedule(self.schedule.time());

        let orchestrator = &self.orchestrator;
        self.schedule
            .run_until(
                move || async move {
                    orchestrator.run_daily().await;
                },
                &mut shutdown,
            )
            .await;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
}
