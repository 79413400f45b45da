//! # HNU Clock-In
//!
//! 湖南大学疫情防控平台每日自动打卡
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 会话），只暴露能力
//! - `HttpSession` - 每次尝试独占一个带 cookie 的客户端
//!
//! ### ② 外部接口层（Clients）
//! - `PortalClient` - 门户的取 token / 登录 / 打卡接口
//! - `TextRecognizer` / `TencentOcrClient` - 验证码文字识别
//!
//! ### ③ 业务能力层（Services）
//! - `VerificationResolver` - 获取 token 并识别出纯数字验证码
//!
//! ### ④ 流程层（Workflow）
//! - `SessionClient` - 登录 → 打卡，各自带重试
//!
//! ### ⑤ 编排层（Orchestration）
//! - `ClockInOrchestrator` - 一次运行内的多次完整尝试
//! - `DailySchedule` / `App` - 启动即运行，然后每日定时运行
//!
//! ## 模块结构

pub mod cli;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use cli::CliArgs;
pub use clients::{PortalClient, TencentOcrClient, TextRecognizer};
pub use config::{Config, ConfigSource, RetryPolicy, ScheduleTime};
pub use error::{ClockInError, ClockInResult, ConfigError};
pub use models::{AttemptOutcome, LoginOutcome, RunReport, SubmitOutcome};
pub use orchestrator::{App, ClockInOrchestrator, DailySchedule};
pub use services::VerificationResolver;
pub use workflow::SessionClient;
