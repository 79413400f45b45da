//! 每日调度
//!
//! 在本机时区的固定时刻触发任务。任务执行期间不会开始新的一轮，
//! 执行完毕后才计算下一次触发时间。

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Local, NaiveTime, TimeZone};
use tokio::time::sleep;
use tracing::info;

use crate::config::ScheduleTime;

/// 每日定时器
#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    time: ScheduleTime,
    at: NaiveTime,
}

impl DailySchedule {
    pub fn new(time: ScheduleTime) -> Self {
        let at = time.as_naive_time();
        Self { time, at }
    }

    pub fn time(&self) -> ScheduleTime {
        self.time
    }

    /// 严格晚于 `now` 的下一次触发时间
    ///
    /// 触发时刻落在夏令时空档内时，顺延一小时
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateTime<Tz> {
        let tz = now.timezone();
        let mut date = now.date_naive();

        for _ in 0..3 {
            let candidate = date.and_time(self.at);
            let resolved = tz
                .from_local_datetime(&candidate)
                .earliest()
                .or_else(|| {
                    tz.from_local_datetime(&(candidate + chrono::Duration::hours(1)))
                        .earliest()
                });

            if let Some(at) = resolved {
                if at > *now {
                    return at;
                }
            }

            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }

        now.clone() + chrono::Duration::days(1)
    }

    /// 距离下一次触发还要等待多久
    pub fn wait_duration<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Duration {
        self.next_after(now)
            .signed_duration_since(now.clone())
            .to_std()
            .unwrap_or(Duration::ZERO)
    }

    /// 每天触发一次 `job`，直到 `shutdown` 完成
    ///
    /// 等待期间和任务执行期间都会响应退出信号
    pub async fn run_until<F, Fut, S>(&self, mut job: F, shutdown: S)
    where
        F: FnMut() -> Fut,
        Fut: Future,
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            let now = Local::now();
            let next = self.next_after(&now);
            info!("⏰ 下次打卡时间: {}", next.format("%Y-%m-%d %H:%M:%S"));

            tokio::select! {
                _ = &mut shutdown => break,
                _ = sleep(self.wait_duration(&now)) => {}
            }

            tokio::select! {
                _ = &mut shutdown => break,
                _ = job() => {}
            }
        }

        info!("👋 已停止定时程序");
    }
}
