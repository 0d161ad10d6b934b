// crates/dm_engine/src/waves.rs

//! 波浪气候参数与来波角统计
//!
//! 持有外部可设的波浪强迫参数（波高、周期、来波角分布参数）以及
//! 内核回写的瞬时来波角和增量统计。来波角随机过程模型本身是外部
//! 协作者，这里只保存其产出。

use serde::{Deserialize, Serialize};

use dm_foundation::error::{DmError, DmResult};
use dm_foundation::ensure;

/// 波浪气候状态
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveClimate {
    /// 波高 [m]
    height: f64,
    /// 波周期 [s]
    period: f64,
    /// 来波角分布的高角占比参数 [0, 1]
    angle_highness: f64,
    /// 来波角分布的不对称参数 [0, 1]
    angle_asymmetry: f64,
    /// 瞬时来波角 [rad]
    angle: f64,
    /// 记录过的来波角增量统计
    angle_min: f64,
    angle_max: f64,
    angle_sum: f64,
    n_samples: u64,
}

impl Default for WaveClimate {
    fn default() -> Self {
        Self {
            height: 2.0,
            period: 7.0,
            angle_highness: 0.2,
            angle_asymmetry: 0.5,
            angle: 0.0,
            angle_min: 0.0,
            angle_max: 0.0,
            angle_sum: 0.0,
            n_samples: 0,
        }
    }
}

impl WaveClimate {
    /// 按给定强迫参数创建
    pub fn new(
        height: f64,
        period: f64,
        angle_highness: f64,
        angle_asymmetry: f64,
    ) -> DmResult<Self> {
        let mut climate = Self::default();
        climate.set_height(height)?;
        climate.set_period(period)?;
        climate.set_angle_highness(angle_highness)?;
        climate.set_angle_asymmetry(angle_asymmetry)?;
        Ok(climate)
    }

    /// 波高 [m]
    #[inline]
    pub fn height(&self) -> f64 {
        self.height
    }

    /// 波周期 [s]
    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// 高角占比参数
    #[inline]
    pub fn angle_highness(&self) -> f64 {
        self.angle_highness
    }

    /// 不对称参数
    #[inline]
    pub fn angle_asymmetry(&self) -> f64 {
        self.angle_asymmetry
    }

    /// 瞬时来波角 [rad]
    #[inline]
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// 设置波高 [m]
    pub fn set_height(&mut self, height: f64) -> DmResult<()> {
        ensure!(
            height > 0.0 && height.is_finite(),
            DmError::invalid_input(format!("波高必须为正有限值: {height}"))
        );
        self.height = height;
        Ok(())
    }

    /// 设置波周期 [s]
    pub fn set_period(&mut self, period: f64) -> DmResult<()> {
        ensure!(
            period > 0.0 && period.is_finite(),
            DmError::invalid_input(format!("波周期必须为正有限值: {period}"))
        );
        self.period = period;
        Ok(())
    }

    /// 设置高角占比参数 [0, 1]
    pub fn set_angle_highness(&mut self, value: f64) -> DmResult<()> {
        ensure!(
            (0.0..=1.0).contains(&value),
            DmError::invalid_input(format!("高角占比参数超出 [0, 1]: {value}"))
        );
        self.angle_highness = value;
        Ok(())
    }

    /// 设置不对称参数 [0, 1]
    pub fn set_angle_asymmetry(&mut self, value: f64) -> DmResult<()> {
        ensure!(
            (0.0..=1.0).contains(&value),
            DmError::invalid_input(format!("不对称参数超出 [0, 1]: {value}"))
        );
        self.angle_asymmetry = value;
        Ok(())
    }

    /// 内核回写一次来波角采样 [rad]
    pub fn record_angle(&mut self, angle: f64) {
        if self.n_samples == 0 {
            self.angle_min = angle;
            self.angle_max = angle;
        } else {
            self.angle_min = self.angle_min.min(angle);
            self.angle_max = self.angle_max.max(angle);
        }
        self.angle = angle;
        self.angle_sum += angle;
        self.n_samples += 1;
    }

    /// 记录过的最小来波角 [rad]
    #[inline]
    pub fn angle_min(&self) -> f64 {
        self.angle_min
    }

    /// 记录过的最大来波角 [rad]
    #[inline]
    pub fn angle_max(&self) -> f64 {
        self.angle_max
    }

    /// 记录过的平均来波角 [rad]（无采样时为 0）
    pub fn angle_mean(&self) -> f64 {
        if self.n_samples == 0 {
            0.0
        } else {
            self.angle_sum / self.n_samples as f64
        }
    }
}
