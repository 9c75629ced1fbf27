// 畫面節拍器 - 讓每一幀對齊實際時間 (約 59.54 Hz)

use std::time::{Duration, Instant};

/// 機台 8080 的時脈
pub const CPU_CLOCK_HZ: f64 = 1_996_800.0;
/// 機台螢幕的垂直更新率
pub const REFRESH_HZ: f64 = 59.541985;
/// 每幀可用的 CPU 週期 (約 33536.0)
pub const CYCLES_PER_FRAME: f64 = CPU_CLOCK_HZ / REFRESH_HZ;

pub fn frame_period() -> Duration {
    Duration::from_secs_f64(1.0 / REFRESH_HZ)
}

/// 讓模擬的每一幀與實際時間同步
#[derive(Debug)]
pub struct FramePacer {
    period: Duration,
    mark: Instant,
    throttle: bool,
}

impl FramePacer {
    pub fn new() -> Self {
        Self::with_period(frame_period())
    }

    pub fn with_period(period: Duration) -> Self {
        FramePacer {
            period,
            mark: Instant::now(),
            throttle: true,
        }
    }

    /// 不限速執行，仍然回報超時
    pub fn unthrottled() -> Self {
        FramePacer {
            throttle: false,
            ..Self::new()
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// 等到距上次標記滿一個週期為止；若這幀已經超時則不等待，直接回傳經過的時間
    pub fn wait(&mut self) -> Option<Duration> {
        let elapsed = self.mark.elapsed();
        let overrun = if elapsed > self.period {
            Some(elapsed)
        } else {
            if self.throttle {
                spin_sleep::sleep(self.period - elapsed);
            }
            None
        };
        self.mark = Instant::now();
        overrun
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new()
    }
}
