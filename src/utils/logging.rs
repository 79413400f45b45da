/// 日志工具模块
///
/// 提供打卡流程中各阶段的日志输出
use chrono::{FixedOffset, Local, Utc};
use tracing::{error, info};

use crate::config::{Config, ScheduleTime};
use crate::models::{AttemptOutcome, RunReport};

/// 展示用时区（北京时间）
const DISPLAY_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 湖南大学每日打卡");
    info!("👤 学号: {}", config.credentials.student_id);
    info!(
        "📍 地址: {} {} {} {}",
        config.location.province,
        config.location.city,
        config.location.county,
        config.location.address
    );
    info!("{}", "=".repeat(60));
}

/// 记录定时任务启动信息
pub fn log_schedule(time: ScheduleTime) {
    info!(
        "⏰ 已启动定时程序，每天 {:02}:{:02}（本机时间）为您打卡",
        time.hour(),
        time.minute()
    );
    info!("Press Ctrl+C to exit");
}

/// 记录一次运行的开始
pub fn log_run_start() {
    let now = match FixedOffset::east_opt(DISPLAY_UTC_OFFSET_SECS) {
        Some(offset) => Utc::now().with_timezone(&offset).to_rfc3339(),
        None => Local::now().to_rfc3339(),
    };
    info!("[Time] {}", now);
    info!("🚌 打卡任务启动");
}

/// 记录一次尝试的开始
pub fn log_attempt_start(attempt: u32, max_attempts: u32) {
    info!("\n{}", "─".repeat(60));
    info!("第 {}/{} 次尝试为您打卡", attempt, max_attempts);
}

/// 记录一次运行的结果
pub fn log_run_summary(report: &RunReport) {
    info!("{}", "─".repeat(60));
    match report.outcome {
        AttemptOutcome::AlreadySubmittedToday => {
            info!("✅ 今日已打卡（共尝试 {} 次）", report.attempts)
        }
        AttemptOutcome::Submitted => info!("✅ 打卡完成（共尝试 {} 次）", report.attempts),
        AttemptOutcome::TransientFailure | AttemptOutcome::PermanentFailure => {
            error!("❌ 今日打卡失败（共尝试 {} 次），等待下一次调度", report.attempts)
        }
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
