// crates/dm_engine/src/engine/stepper.rs

//! 时间步进控制器
//!
//! 把外部请求的连续时间推进分解为整数个完整内核步加一次分数步。
//! 模型时间 = 整步计数 × 固定的步日换算因子，分数步**不**推进整步
//! 计数器。
//!
//! # 分解算术
//!
//! 设 `now = current_step * day_per_step`，`dt = day_per_step`：
//!
//! - `n_steps = trunc((target - now) / dt)`（向零截断）
//! - `remainder = (target - now) / dt - n_steps`
//!
//! 先依次执行 `n_steps` 个整步（每步成功后计数器 +1），任一步失败
//! 立即中止并进入 [`StepPhase::Failed`]，后续步不再尝试；全部成功后
//! 恰好执行一次分数步（`remainder` 为 0 时也调用，内核侧为空操作）。
//! 目标早于当前时间是调用方错误，显式返回而非静默截断。

use dm_foundation::error::{DmError, DmResult};
use dm_foundation::ensure;

use crate::engine::kernel::MorphologyKernel;
use crate::state::GridStore;
use crate::waves::WaveClimate;

/// 控制器状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPhase {
    /// 空闲（初始与成功终态）
    Idle,
    /// 正在推进
    Advancing,
    /// 上一次推进因内核失败而中止
    Failed,
}

/// 时间步进控制器
#[derive(Debug, Clone)]
pub struct StepController {
    current_step: u64,
    /// 步日换算因子 [d/步]
    day_per_step: f64,
    phase: StepPhase,
}

impl StepController {
    /// 创建控制器
    pub fn new(day_per_step: f64) -> DmResult<Self> {
        ensure!(
            day_per_step > 0.0 && day_per_step.is_finite(),
            DmError::invalid_input(format!("步日换算因子必须为正有限值: {day_per_step}"))
        );
        Ok(Self {
            current_step: 0,
            day_per_step,
            phase: StepPhase::Idle,
        })
    }

    /// 当前整步计数
    #[inline]
    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    /// 当前模型时间 [d]
    #[inline]
    pub fn current_time(&self) -> f64 {
        self.current_step as f64 * self.day_per_step
    }

    /// 单步时长 [d]
    #[inline]
    pub fn time_step(&self) -> f64 {
        self.day_per_step
    }

    /// 控制器状态
    #[inline]
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// 推进到目标时间 [d]
    ///
    /// 目标早于当前时间返回 [`DmError::TimeTargetInPast`]。内核失败时
    /// 立即中止，控制器停在 [`StepPhase::Failed`]；后续调用可重新发起
    /// 推进（瞬时内核故障允许重试）。
    pub fn advance_to<K: MorphologyKernel + ?Sized>(
        &mut self,
        kernel: &mut K,
        store: &mut GridStore,
        waves: &mut WaveClimate,
        target_day: f64,
    ) -> DmResult<()> {
        let now = self.current_time();
        ensure!(
            target_day >= now,
            DmError::TimeTargetInPast {
                target: target_day,
                now,
            }
        );

        let span = (target_day - now) / self.day_per_step;
        let n_steps = span as u64;
        let remainder = span - n_steps as f64;
        tracing::debug!(target_day, n_steps, remainder, "分解时间推进请求");

        self.phase = StepPhase::Advancing;
        for _ in 0..n_steps {
            if let Err(err) = kernel.advance_step(store, waves) {
                self.phase = StepPhase::Failed;
                return Err(DmError::kernel_step(self.current_step, err.to_string()));
            }
            self.current_step += 1;
        }

        // remainder 为 0 时也调用一次，内核侧保证空操作
        if let Err(err) = kernel.advance_fraction(store, waves, remainder) {
            self.phase = StepPhase::Failed;
            return Err(DmError::kernel_step(self.current_step, err.to_string()));
        }

        self.phase = StepPhase::Idle;
        Ok(())
    }

    /// 推进恰好一个完整步（从不执行分数步）
    pub fn advance_one_step<K: MorphologyKernel + ?Sized>(
        &mut self,
        kernel: &mut K,
        store: &mut GridStore,
        waves: &mut WaveClimate,
    ) -> DmResult<()> {
        self.phase = StepPhase::Advancing;
        if let Err(err) = kernel.advance_step(store, waves) {
            self.phase = StepPhase::Failed;
            return Err(DmError::kernel_step(self.current_step, err.to_string()));
        }
        self.current_step += 1;
        self.phase = StepPhase::Idle;
        Ok(())
    }

    /// 推进一个步长的分数倍（不推进整步计数器）
    pub fn advance_fraction<K: MorphologyKernel + ?Sized>(
        &mut self,
        kernel: &mut K,
        store: &mut GridStore,
        waves: &mut WaveClimate,
        fraction: f64,
    ) -> DmResult<()> {
        ensure!(
            fraction >= 0.0 && fraction.is_finite(),
            DmError::invalid_input(format!("分数步必须为非负有限值: {fraction}"))
        );

        self.phase = StepPhase::Advancing;
        if let Err(err) = kernel.advance_fraction(store, waves, fraction) {
            self.phase = StepPhase::Failed;
            return Err(DmError::kernel_step(self.current_step, err.to_string()));
        }
        self.phase = StepPhase::Idle;
        Ok(())
    }
}
