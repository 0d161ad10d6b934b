// crates/dm_engine/src/window.rs

//! 活动窗口提取
//!
//! 对外只暴露全网格在 `ny_full` 轴中央的子矩形
//! `[ny_full/4, ny_full/4 + ny_full/2)`，`nx` 轴全量暴露。两侧各 1/4 的
//! 边界缓冲区对外隐藏，避免内核边界处理的伪影泄露给耦合方。
//!
//! 提取结果始终是**新分配的独立拷贝**，外部写入不会触碰内部存储，
//! 窗口的边界隐藏不变量不会被破坏。
//!
//! # 线性化顺序
//!
//! 外层循环沿 `nx` 轴（0‥nx-1），内层循环沿窗口相对的 `ny` 轴
//! （0‥窗口高-1），即 x 主序、y 次序。

use rayon::prelude::*;

use dm_foundation::error::{DmError, DmResult};
use dm_foundation::grid::GridShape;

/// 活动窗口视图（形状 + 间距，不持有数据）
#[derive(Debug, Clone, Copy)]
pub struct ActiveWindow {
    shape: GridShape,
    cell_width: f64,
}

impl ActiveWindow {
    /// 由网格形状和单元宽度构造
    #[inline]
    pub fn new(shape: GridShape, cell_width: f64) -> Self {
        Self { shape, cell_width }
    }

    /// 对外报告的维度 `[窗口高, nx, 1]`
    #[inline]
    pub fn dimen(&self) -> [usize; 3] {
        [self.shape.window_height(), self.shape.nx(), 1]
    }

    /// 对外报告的分辨率 `[dy, dx, 1]`（两轴共用同一间距）
    #[inline]
    pub fn resolution(&self) -> [f64; 3] {
        [self.cell_width, self.cell_width, 1.0]
    }

    /// 窗口单元总数
    #[inline]
    pub fn len(&self) -> usize {
        self.shape.window_len()
    }

    /// 窗口是否为空（退化情形）
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 提取窗口内的值（恒等变换）
    pub fn extract(&self, data: &[f64]) -> DmResult<Vec<f64>> {
        self.extract_map(data, |v| v)
    }

    /// 提取窗口内的值并逐元素变换
    ///
    /// 输入必须是全网格大小的行主序数组。按行并行收集，
    /// 输出顺序为 x 主序、y 次序。
    pub fn extract_map<F>(&self, data: &[f64], f: F) -> DmResult<Vec<f64>>
    where
        F: Fn(f64) -> f64 + Sync,
    {
        DmError::check_size("窗口提取输入", self.shape.len(), data.len())?;

        let lower = self.shape.window_lower();
        let upper = self.shape.window_upper();
        let stride = self.shape.stride();

        let rows: Vec<Vec<f64>> = (0..self.shape.nx())
            .into_par_iter()
            .map(|x| {
                let row = &data[x * stride..x * stride + stride];
                row[lower..upper].iter().map(|&v| f(v)).collect()
            })
            .collect();

        Ok(rows.concat())
    }
}
