//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `attempt_orchestrator` - 尝试编排
//! - 一次运行最多进行若干次完整尝试
//! - 每次尝试都新建会话（新 cookie、新 token）
//! - 根据提交结果决定停止还是等待后重来
//!
//! ### `scheduler` - 每日调度
//! - 计算下一次触发时间（本机时区）
//! - 阻塞等待，收到退出信号时干净退出
//!
//! ### `app` - 应用生命周期
//! - 启动时立即运行一次，然后进入每日调度
//!
//! ## 层次关系
//!
//! ```text
//! app (启动 + 调度)
//!     ↓
//! attempt_orchestrator (一次运行 = 多次尝试)
//!     ↓
//! workflow::SessionClient (一次尝试 = 登录 + 打卡)
//!     ↓
//! services::VerificationResolver (token + 验证码)
//!     ↓
//! clients / infrastructure (门户接口、OCR、HTTP 会话)
//! ```

pub mod app;
pub mod attempt_orchestrator;
pub mod scheduler;

pub use app::App;
pub use attempt_orchestrator::ClockInOrchestrator;
pub use scheduler::DailySchedule;
