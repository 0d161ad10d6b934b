// crates/dm_engine/src/river.rs

//! 河流系统
//!
//! 维护有界的河口列表（位置 + 输沙通量），支持：
//! - 河口列扫描定位
//! - 改道（河口重定位 + 单点通量脉冲）
//! - 稠密通量网格与稀疏河口列表的双向互译
//!
//! # 互译约定
//!
//! 稠密通量网格采用**全网格坐标系**：长度 `nx * ny_full`，行步长
//! `ny_full`，零边距偏移，与对外报告的网格步长一致。线性化顺序与
//! 窗口提取相同（x 主序、y 次序）。
//!
//! 改道脉冲是唯一的例外：其输出缓冲是窗口大小（`nx * ny_full/2`），
//! 河口的横向位置被重心化到活动窗口坐标系，这是改道交换量的
//! 既定外部形状。

use serde::{Deserialize, Serialize};

use dm_foundation::error::{DmError, DmResult};
use dm_foundation::grid::GridShape;
use dm_foundation::ensure;

use crate::state::GridStore;

/// 单个河口（全网格坐标）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiverMouth {
    /// `nx` 轴坐标
    pub x: usize,
    /// `ny_full` 轴坐标
    pub y: usize,
    /// 输沙通量 [kg/s]
    pub flux: f64,
}

/// 河流系统：有界河口列表 + 入流列配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiverSystem {
    mouths: Vec<RiverMouth>,
    capacity: usize,
    /// 河口搜索的固定入流列（`ny_full` 轴坐标）
    stream_spot: usize,
}

impl RiverSystem {
    /// 创建河流系统
    ///
    /// 初始包含一个位于 `(0, stream_spot)`、零通量的河口。
    /// 容量通常取网格单元总数。
    pub fn new(capacity: usize, stream_spot: usize) -> DmResult<Self> {
        ensure!(
            capacity > 0,
            DmError::invalid_input("河流容量必须为正".to_string())
        );
        Ok(Self {
            mouths: vec![RiverMouth {
                x: 0,
                y: stream_spot,
                flux: 0.0,
            }],
            capacity,
            stream_spot,
        })
    }

    /// 活动河口数
    #[inline]
    pub fn n_rivers(&self) -> usize {
        self.mouths.len()
    }

    /// 河口列表容量
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 入流列
    #[inline]
    pub fn stream_spot(&self) -> usize {
        self.stream_spot
    }

    /// 设置入流列
    pub fn set_stream_spot(&mut self, column: usize) {
        self.stream_spot = column;
    }

    /// 河口列表
    #[inline]
    pub fn mouths(&self) -> &[RiverMouth] {
        &self.mouths
    }

    /// 设置第 `n` 条河的河口位置
    pub fn set_mouth(&mut self, n: usize, x: usize, y: usize, shape: &GridShape) -> DmResult<()> {
        DmError::check_index("river", n, self.mouths.len())?;
        ensure!(
            shape.contains(x, y),
            DmError::invalid_input(format!("河口位置 ({x}, {y}) 超出网格"))
        );
        self.mouths[n].x = x;
        self.mouths[n].y = y;
        Ok(())
    }

    /// 设置第 `n` 条河的输沙通量 [kg/s]
    pub fn set_flux(&mut self, n: usize, flux: f64) -> DmResult<()> {
        DmError::check_index("river", n, self.mouths.len())?;
        self.mouths[n].flux = flux;
        Ok(())
    }

    /// 定位第 `n` 条河的河口
    ///
    /// 从 `x = 0` 起沿 `y = stream_spot` 列向海扫描，跳过全滩单元，
    /// 返回第一个非全滩单元并写回河口位置。整列扫完仍未找到时返回
    /// [`DmError::NoRiverMouthFound`]，不会越界读取。
    pub fn find_mouth(&mut self, store: &GridStore, n: usize) -> DmResult<(usize, usize)> {
        DmError::check_index("river", n, self.mouths.len())?;
        let shape = store.shape();
        ensure!(!shape.is_empty(), DmError::NotInitialized);
        let y = self.stream_spot;
        DmError::check_index("stream_spot", y, shape.ny_full())?;

        for x in 0..shape.nx() {
            if !store.is_beach(x, y) {
                self.mouths[n].x = x;
                self.mouths[n].y = y;
                return Ok((x, y));
            }
        }
        Err(DmError::no_river_mouth(y, shape.nx()))
    }

    /// 改道：重定位第 `n` 条河并生成单点通量脉冲
    ///
    /// 先经 [`Self::find_mouth`] 定位河口，再在窗口大小的零缓冲中，
    /// 把 `flux` 放到重心化后的单点 `(x, y')`，其中
    /// `y' = (y mod ny_full) - ny_full/4`。河口记录更新为新位置与
    /// 新通量。
    pub fn avulse(&mut self, store: &GridStore, n: usize, flux: f64) -> DmResult<Vec<f64>> {
        let (x, y) = self.find_mouth(store, n)?;
        let shape = store.shape();
        let height = shape.window_height();

        // 重心化到窗口坐标系，越界即失败而非越界写
        let recentered = (y % shape.ny_full()) as isize - shape.window_lower() as isize;
        ensure!(
            recentered >= 0 && (recentered as usize) < height,
            DmError::index_out_of_bounds("窗口内河口列", y, shape.ny_full())
        );
        let y_win = recentered as usize;

        let mut qs = vec![0.0; shape.window_len()];
        qs[x * height + y_win] = flux;

        self.mouths[n].flux = flux;
        tracing::debug!(river = n, x, y, flux, "河流改道");
        Ok(qs)
    }

    /// 稠密通量网格 → 河口列表
    ///
    /// 按 x 主序遍历全网格大小的稠密网格，每个严格为正的单元生成
    /// 一个河口：`x = i / stride`，`y = i mod stride`，通量为单元值。
    /// 替换整个河口列表（计数可为 0）。正单元数超过容量时返回
    /// [`DmError::TooManyRivers`]。
    pub fn set_flux_grid(&mut self, qs: &[f64], shape: &GridShape) -> DmResult<()> {
        ensure!(!shape.is_empty(), DmError::NotInitialized);
        DmError::check_size("通量网格", shape.len(), qs.len())?;

        let stride = shape.stride();
        let mut mouths = Vec::new();
        for (i, &q) in qs.iter().enumerate() {
            if q > 0.0 {
                if mouths.len() == self.capacity {
                    return Err(DmError::too_many_rivers(
                        qs[i..].iter().filter(|&&v| v > 0.0).count() + mouths.len(),
                        self.capacity,
                    ));
                }
                let mouth = RiverMouth {
                    x: i / stride,
                    y: i % stride,
                    flux: q,
                };
                tracing::debug!(x = mouth.x, y = mouth.y, flux = q, "登记河口");
                mouths.push(mouth);
            }
        }

        tracing::info!(n_rivers = mouths.len(), "通量网格翻译完成");
        self.mouths = mouths;
        Ok(())
    }

    /// 河口列表 → 稠密通量网格（其余单元为零）
    pub fn to_flux_grid(&self, shape: &GridShape) -> DmResult<Vec<f64>> {
        ensure!(!shape.is_empty(), DmError::NotInitialized);
        let mut qs = vec![0.0; shape.len()];
        for mouth in &self.mouths {
            ensure!(
                shape.contains(mouth.x, mouth.y),
                DmError::invalid_input(format!(
                    "河口位置 ({}, {}) 超出网格",
                    mouth.x, mouth.y
                ))
            );
            qs[shape.offset(mouth.x, mouth.y)] = mouth.flux;
        }
        Ok(qs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 已分配的测试网格
    fn store(nx: usize, ny_full: usize) -> GridStore {
        let mut s = GridStore::new();
        s.allocate(nx, ny_full).unwrap();
        s
    }

    #[test]
    fn test_new_starts_with_one_river() {
        let rivers = RiverSystem::new(32, 4).unwrap();
        assert_eq!(rivers.n_rivers(), 1);
        assert_eq!(rivers.mouths()[0], RiverMouth { x: 0, y: 4, flux: 0.0 });
    }

    #[test]
    fn test_find_mouth_skips_beach() {
        let mut s = store(6, 8);
        let mut rivers = RiverSystem::new(48, 4).unwrap();
        // 列顶部三个单元为滩
        s.set_beach(0, 4, true);
        s.set_beach(1, 4, true);
        s.set_beach(2, 4, true);

        let (x, y) = rivers.find_mouth(&s, 0).unwrap();
        assert_eq!((x, y), (3, 4));
        assert_eq!(rivers.mouths()[0].x, 3);
        assert_eq!(rivers.mouths()[0].y, 4);
    }

    #[test]
    fn test_find_mouth_entire_column_beach() {
        let mut s = store(5, 8);
        let mut rivers = RiverSystem::new(40, 2).unwrap();
        for x in 0..5 {
            s.set_beach(x, 2, true);
        }

        let err = rivers.find_mouth(&s, 0).unwrap_err();
        assert!(matches!(
            err,
            DmError::NoRiverMouthFound { column: 2, nx: 5 }
        ));
    }

    #[test]
    fn test_find_mouth_bad_stream_spot() {
        let s = store(4, 8);
        let mut rivers = RiverSystem::new(32, 9).unwrap();
        assert!(matches!(
            rivers.find_mouth(&s, 0),
            Err(DmError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_avulse_places_single_impulse() {
        let mut s = store(4, 8);
        let mut rivers = RiverSystem::new(32, 4).unwrap();
        s.set_beach(0, 4, true);
        s.set_beach(1, 4, true);

        let qs = rivers.avulse(&s, 0, 12.5).unwrap();
        // 窗口大小缓冲，窗口高 4
        assert_eq!(qs.len(), 16);
        // 河口 (2, 4)，窗口内 y' = 4 - 2 = 2
        let idx = 2 * 4 + 2;
        assert_eq!(qs[idx], 12.5);
        assert_eq!(qs.iter().filter(|&&v| v != 0.0).count(), 1);
        assert_eq!(rivers.mouths()[0], RiverMouth { x: 2, y: 4, flux: 12.5 });
    }

    #[test]
    fn test_avulse_outside_window_fails() {
        // 入流列落在边界缓冲区内，重心化为负，必须显式失败
        let s = store(4, 8);
        let mut rivers = RiverSystem::new(32, 1).unwrap();
        assert!(matches!(
            rivers.avulse(&s, 0, 1.0),
            Err(DmError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_flux_grid_roundtrip() {
        let s = store(3, 8);
        let shape = s.shape();
        let mut rivers = RiverSystem::new(24, 4).unwrap();

        let mut qs = vec![0.0; shape.len()];
        qs[shape.offset(0, 3)] = 2.0;
        qs[shape.offset(1, 5)] = 7.5;
        qs[shape.offset(2, 0)] = 0.25;

        rivers.set_flux_grid(&qs, &shape).unwrap();
        assert_eq!(rivers.n_rivers(), 3);
        assert_eq!(rivers.mouths()[0], RiverMouth { x: 0, y: 3, flux: 2.0 });
        assert_eq!(rivers.mouths()[1], RiverMouth { x: 1, y: 5, flux: 7.5 });
        assert_eq!(rivers.mouths()[2], RiverMouth { x: 2, y: 0, flux: 0.25 });

        // 往返重建与原网格逐元素一致
        let rebuilt = rivers.to_flux_grid(&shape).unwrap();
        assert_eq!(rebuilt, qs);
    }

    #[test]
    fn test_flux_grid_replaces_list() {
        let s = store(2, 4);
        let shape = s.shape();
        let mut rivers = RiverSystem::new(8, 2).unwrap();
        assert_eq!(rivers.n_rivers(), 1);

        // 全零网格清空河口列表
        rivers.set_flux_grid(&vec![0.0; shape.len()], &shape).unwrap();
        assert_eq!(rivers.n_rivers(), 0);
    }

    #[test]
    fn test_flux_grid_ignores_nonpositive() {
        let s = store(2, 4);
        let shape = s.shape();
        let mut rivers = RiverSystem::new(8, 2).unwrap();

        let mut qs = vec![0.0; shape.len()];
        qs[0] = -4.0;
        qs[3] = 1.5;
        rivers.set_flux_grid(&qs, &shape).unwrap();
        assert_eq!(rivers.n_rivers(), 1);
        assert_eq!(rivers.mouths()[0], RiverMouth { x: 0, y: 3, flux: 1.5 });
    }

    #[test]
    fn test_flux_grid_too_many_rivers() {
        let s = store(2, 4);
        let shape = s.shape();
        let mut rivers = RiverSystem::new(2, 2).unwrap();

        let qs = vec![1.0; shape.len()];
        let err = rivers.set_flux_grid(&qs, &shape).unwrap_err();
        assert!(matches!(
            err,
            DmError::TooManyRivers {
                found: 8,
                capacity: 2
            }
        ));
        // 失败时原列表不变
        assert_eq!(rivers.n_rivers(), 1);
    }

    #[test]
    fn test_flux_grid_shape_mismatch() {
        let s = store(2, 4);
        let mut rivers = RiverSystem::new(8, 2).unwrap();
        assert!(matches!(
            rivers.set_flux_grid(&[1.0; 3], &s.shape()),
            Err(DmError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_setters() {
        let s = store(4, 8);
        let shape = s.shape();
        let mut rivers = RiverSystem::new(32, 4).unwrap();

        rivers.set_mouth(0, 2, 5, &shape).unwrap();
        rivers.set_flux(0, 9.0).unwrap();
        assert_eq!(rivers.mouths()[0], RiverMouth { x: 2, y: 5, flux: 9.0 });

        assert!(rivers.set_mouth(0, 4, 0, &shape).is_err());
        assert!(rivers.set_mouth(1, 0, 0, &shape).is_err());
        assert!(rivers.set_flux(1, 1.0).is_err());
    }
}
