// crates/dm_engine/src/engine/kernel.rs

//! 外部物理内核契约
//!
//! 岸线演变物理（波致输沙、岸线角更新）由外部内核实现，本层只定义
//! 调用契约：整步推进与分数步推进，二者都同步执行并返回显式结果。

use dm_foundation::error::DmResult;

use crate::state::GridStore;
use crate::waves::WaveClimate;

/// 形态演变内核契约
///
/// 实现方约定：
/// - `advance_step` 将状态推进一个完整模型步
/// - `advance_fraction` 推进一个步长的 `fraction` 倍；
///   `fraction == 0.0` 必须是无害的空操作
pub trait MorphologyKernel {
    /// 推进一个完整模型步
    fn advance_step(&mut self, store: &mut GridStore, waves: &mut WaveClimate) -> DmResult<()>;

    /// 推进一个步长的分数倍
    fn advance_fraction(
        &mut self,
        store: &mut GridStore,
        waves: &mut WaveClimate,
        fraction: f64,
    ) -> DmResult<()>;
}

/// 空置内核
///
/// 不改变任何状态的占位实现，用于演示运行和契约测试。
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleKernel;

impl MorphologyKernel for IdleKernel {
    fn advance_step(&mut self, _store: &mut GridStore, _waves: &mut WaveClimate) -> DmResult<()> {
        Ok(())
    }

    fn advance_fraction(
        &mut self,
        _store: &mut GridStore,
        _waves: &mut WaveClimate,
        _fraction: f64,
    ) -> DmResult<()> {
        Ok(())
    }
}
