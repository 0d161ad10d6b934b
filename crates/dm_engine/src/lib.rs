// crates/dm_engine/src/lib.rs

//! DeltaMorph 引擎层
//!
//! 海岸三角洲形态模拟的状态与步进控制，包括：
//! - 状态网格管理 (state) - 每个物理量一块连续存储
//! - 活动窗口 (window) - 对外只暴露网格中央子矩形
//! - 河流系统 (river) - 河口列表、改道与通量网格互译
//! - 波浪气候 (waves) - 波浪参数与来波角统计
//! - 引擎核心 (engine) - 内核契约与时间步进控制
//!
//! 物理内核本身（岸线演变方程的求解）是外部协作者，本层只通过
//! [`MorphologyKernel`] 契约调用它。
//!
//! # 并发模型
//!
//! 全同步单线程：单个实例的操作不可并发调用；多个实例彼此独立，
//! 无跨实例共享状态。

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;
pub mod river;
pub mod state;
pub mod waves;
pub mod window;

// 重导出常用类型
pub use engine::{IdleKernel, MorphologyKernel, StepController, StepPhase};
pub use river::{RiverMouth, RiverSystem};
pub use state::GridStore;
pub use waves::WaveClimate;
pub use window::ActiveWindow;
