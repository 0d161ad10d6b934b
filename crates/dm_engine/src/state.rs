// crates/dm_engine/src/state.rs

//! 模拟状态网格（SoA 布局）
//!
//! 每个物理量一块连续的 `Vec` 存储，行 `x` 起始偏移为 `x * ny_full`，
//! 所有数组共享同一 [`GridShape`]。
//!
//! # 生命周期
//!
//! - 形状只设置一次：已分配实例上的再次分配请求是**静默无操作**
//!   （刻意的幂等语义，不是疏漏）
//! - [`GridStore::release`] 幂等，释放后再次释放无副作用

use serde::{Deserialize, Serialize};

use dm_foundation::error::{DmError, DmResult};
use dm_foundation::grid::GridShape;
use dm_foundation::ensure;

use crate::window::ActiveWindow;

/// 模拟状态网格
///
/// 深度、填充率等量为 `f64`；滩面、阴影、上风标志为 `bool`；
/// 单元年龄为 `i32`。数值数组零初始化，滩面掩码默认非滩。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridStore {
    shape: GridShape,
    /// 单元宽度 [m]，两个轴共用同一间距
    cell_width: f64,

    /// 当前水深 [m]
    pub depth: Vec<f64>,
    /// 初始水深 [m]（外部播种，内核只读）
    pub init_depth: Vec<f64>,
    /// 单元填充率 [0, 1]
    pub percent_full: Vec<f64>,
    /// 岸线角 [rad]
    pub shoreline_angle: Vec<f64>,
    /// 环绕角 [rad]
    pub surrounding_angle: Vec<f64>,
    /// 入流沉积体积 [m³]
    pub volume_in: Vec<f64>,
    /// 出流沉积体积 [m³]
    pub volume_out: Vec<f64>,
    /// 单元年龄 [步]
    pub age: Vec<i32>,
    /// 滩面掩码（true = 全滩单元）
    pub beach: Vec<bool>,
    /// 阴影标志
    pub in_shadow: Vec<bool>,
    /// 上风标志
    pub up_wind: Vec<bool>,
}

/// 带失败检查的 `f64` 数组分配
fn alloc_f64(what: &'static str, len: usize) -> DmResult<Vec<f64>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| DmError::allocation(what, len))?;
    v.resize(len, 0.0);
    Ok(v)
}

/// 带失败检查的 `bool` 数组分配
fn alloc_bool(what: &'static str, len: usize) -> DmResult<Vec<bool>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| DmError::allocation(what, len))?;
    v.resize(len, false);
    Ok(v)
}

/// 带失败检查的 `i32` 数组分配
fn alloc_i32(what: &'static str, len: usize) -> DmResult<Vec<i32>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| DmError::allocation(what, len))?;
    v.resize(len, 0);
    Ok(v)
}

impl GridStore {
    /// 创建未分配的空状态
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配所有状态数组
    ///
    /// 两个维度都必须非零。已分配的实例上再次调用是静默无操作，
    /// 永不重新分配。奇数 `ny_full` 向下取整为偶数（见 [`GridShape`]）。
    pub fn allocate(&mut self, nx: usize, ny_full: usize) -> DmResult<()> {
        if !self.shape.is_empty() {
            tracing::debug!(
                nx = self.shape.nx(),
                ny_full = self.shape.ny_full(),
                "网格已分配，忽略再次分配请求"
            );
            return Ok(());
        }
        ensure!(
            nx > 0 && ny_full > 0,
            DmError::invalid_input(format!("网格尺寸必须为正: ({nx}, {ny_full})"))
        );

        let shape = GridShape::new(nx, ny_full);
        ensure!(
            shape.len() > 0,
            DmError::invalid_input(format!("网格宽度 {ny_full} 截断后为空"))
        );
        let len = shape.len();

        self.depth = alloc_f64("depth", len)?;
        self.init_depth = alloc_f64("init_depth", len)?;
        self.percent_full = alloc_f64("percent_full", len)?;
        self.shoreline_angle = alloc_f64("shoreline_angle", len)?;
        self.surrounding_angle = alloc_f64("surrounding_angle", len)?;
        self.volume_in = alloc_f64("volume_in", len)?;
        self.volume_out = alloc_f64("volume_out", len)?;
        self.age = alloc_i32("age", len)?;
        self.beach = alloc_bool("beach", len)?;
        self.in_shadow = alloc_bool("in_shadow", len)?;
        self.up_wind = alloc_bool("up_wind", len)?;

        self.shape = shape;
        tracing::info!(nx, ny_full = shape.ny_full(), cells = len, "状态网格已分配");
        Ok(())
    }

    /// 播种初始水深（行主序拷贝到 `init_depth`）
    pub fn seed_depth(&mut self, values: &[f64]) -> DmResult<()> {
        ensure!(!self.shape.is_empty(), DmError::NotInitialized);
        DmError::check_size("init_depth", self.shape.len(), values.len())?;
        self.init_depth.copy_from_slice(values);
        Ok(())
    }

    /// 释放所有数组并将形状归零
    ///
    /// 幂等：重复调用无副作用。
    pub fn release(&mut self) {
        self.depth = Vec::new();
        self.init_depth = Vec::new();
        self.percent_full = Vec::new();
        self.shoreline_angle = Vec::new();
        self.surrounding_angle = Vec::new();
        self.volume_in = Vec::new();
        self.volume_out = Vec::new();
        self.age = Vec::new();
        self.beach = Vec::new();
        self.in_shadow = Vec::new();
        self.up_wind = Vec::new();
        self.shape = GridShape::EMPTY;
    }

    /// 网格形状
    #[inline]
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// 是否已分配
    #[inline]
    pub fn is_allocated(&self) -> bool {
        !self.shape.is_empty()
    }

    /// 单元宽度 [m]
    #[inline]
    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    /// 设置单元宽度 [m]
    pub fn set_cell_width(&mut self, dx: f64) -> DmResult<()> {
        ensure!(
            dx > 0.0 && dx.is_finite(),
            DmError::invalid_input(format!("单元宽度必须为正有限值: {dx}"))
        );
        self.cell_width = dx;
        Ok(())
    }

    /// 活动窗口视图
    #[inline]
    pub fn window(&self) -> ActiveWindow {
        ActiveWindow::new(self.shape, self.cell_width)
    }

    // ===== 单元访问 =====

    /// 当前水深 [m]
    #[inline]
    pub fn depth_at(&self, x: usize, y: usize) -> f64 {
        self.depth[self.shape.offset(x, y)]
    }

    /// 滩面掩码
    #[inline]
    pub fn is_beach(&self, x: usize, y: usize) -> bool {
        self.beach[self.shape.offset(x, y)]
    }

    /// 设置滩面掩码
    #[inline]
    pub fn set_beach(&mut self, x: usize, y: usize, flag: bool) {
        let i = self.shape.offset(x, y);
        self.beach[i] = flag;
    }

    /// 验证状态有效性（深度与填充率必须为有限值）
    pub fn validate(&self) -> DmResult<()> {
        for i in 0..self.shape.len() {
            if !self.depth[i].is_finite() {
                return Err(DmError::invalid_input(format!(
                    "水深异常 (NaN/Inf) 在单元 {i}"
                )));
            }
            if !self.percent_full[i].is_finite() {
                return Err(DmError::invalid_input(format!(
                    "填充率异常 (NaN/Inf) 在单元 {i}"
                )));
            }
        }
        Ok(())
    }
}
