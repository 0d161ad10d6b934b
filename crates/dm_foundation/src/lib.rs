// crates/dm_foundation/src/lib.rs

//! DeltaMorph Foundation Layer
//!
//! 基础层，提供整个项目的基础抽象。
//!
//! # 模块概览
//!
//! - [`error`]: 统一错误类型
//! - [`grid`]: 网格形状与线性寻址（含活动窗口算术）
//!
//! # 设计原则
//!
//! 1. **零外部依赖**: 仅依赖 serde 和 thiserror
//! 2. **单一寻址来源**: 所有 `(x, y) -> 偏移` 换算只在 [`grid`] 中定义
//! 3. **显式失败**: 所有可失败操作返回 [`error::DmResult`]，不使用 panic

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod grid;

// 重导出常用类型
pub use error::{DmError, DmResult};
pub use grid::GridShape;

/// Prelude 模块，包含常用类型
pub mod prelude {
    pub use crate::ensure;
    pub use crate::error::{DmError, DmResult};
    pub use crate::grid::GridShape;
}
