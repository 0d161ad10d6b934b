// crates/dm_foundation/src/grid.rs

//! 网格形状与线性寻址
//!
//! 全项目唯一的网格寻址定义处：所有 `(x, y) -> 偏移` 换算、半宽约定和
//! 活动窗口算术都从这里引用。
//!
//! # 坐标约定
//!
//! - `x` 沿 `nx` 轴（行），`y` 沿 `ny_full` 轴（列）
//! - 每个物理量数组为单块连续存储，行 `x` 起始偏移为 `x * stride`，
//!   `stride == ny_full`
//! - 内部存储半宽 `ny_half = ny_full / 2`（截断），对外报告
//!   `ny_full = ny_half * 2`；因此奇数宽度在构造时向下取整为偶数，
//!   后续所有整除/取余运算保持一致
//!
//! # 活动窗口
//!
//! 对外只暴露 `ny_full` 轴中央的子矩形 `[ny_full/4, ny_full/4 + ny_full/2)`，
//! 两侧各保留 1/4 的边界缓冲区不对外可见。`ny_full < 4` 时窗口退化
//! （高度 0 或 1），这是受支持的显式边界情形。

use serde::{Deserialize, Serialize};

/// 网格形状（不可变尺寸 + 寻址算术）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    nx: usize,
    ny_half: usize,
}

impl GridShape {
    /// 空形状（未分配状态）
    pub const EMPTY: Self = Self { nx: 0, ny_half: 0 };

    /// 从请求的 `(nx, ny_full)` 创建
    ///
    /// 内部只保留 `ny_full / 2`，奇数宽度截断为偶数。
    #[inline]
    pub const fn new(nx: usize, ny_full: usize) -> Self {
        Self {
            nx,
            ny_half: ny_full / 2,
        }
    }

    /// `nx` 轴长度（行数）
    #[inline]
    pub const fn nx(&self) -> usize {
        self.nx
    }

    /// 内部存储的半宽
    #[inline]
    pub const fn ny_half(&self) -> usize {
        self.ny_half
    }

    /// 对外报告的 `ny_full` 轴长度（恒为偶数）
    #[inline]
    pub const fn ny_full(&self) -> usize {
        self.ny_half * 2
    }

    /// 行步长（等于 `ny_full`，所有物理量数组一致）
    #[inline]
    pub const fn stride(&self) -> usize {
        self.ny_full()
    }

    /// 全网格单元总数
    #[inline]
    pub const fn len(&self) -> usize {
        self.nx * self.ny_full()
    }

    /// 是否为空（未分配）
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.nx == 0 && self.ny_half == 0
    }

    /// `(x, y)` 的线性偏移
    #[inline]
    pub const fn offset(&self, x: usize, y: usize) -> usize {
        x * self.stride() + y
    }

    /// `(x, y)` 是否落在全网格内
    #[inline]
    pub const fn contains(&self, x: usize, y: usize) -> bool {
        x < self.nx && y < self.ny_full()
    }

    // ===== 活动窗口算术 =====

    /// 窗口在 `ny_full` 轴上的下界（含）
    #[inline]
    pub const fn window_lower(&self) -> usize {
        self.ny_full() / 4
    }

    /// 窗口高度（`ny_full / 2`，与提取结果的行宽一致）
    #[inline]
    pub const fn window_height(&self) -> usize {
        self.ny_full() / 2
    }

    /// 窗口在 `ny_full` 轴上的上界（不含）
    ///
    /// 定义为 `lower + height` 而非 `3*ny_full/4`，保证任意宽度下
    /// 窗口高度与 [`Self::window_height`] 严格一致。
    #[inline]
    pub const fn window_upper(&self) -> usize {
        self.window_lower() + self.window_height()
    }

    /// 窗口单元总数
    #[inline]
    pub const fn window_len(&self) -> usize {
        self.nx * self.window_height()
    }
}

impl Default for GridShape {
    fn default() -> Self {
        Self::EMPTY
    }
}
